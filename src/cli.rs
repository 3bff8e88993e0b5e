use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tagaudit")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Audit cloud resource tag compliance and cost attribution", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Snapshot overview: record counts, missing values, tagged vs untagged
    Summary(QueryArgs),

    /// Cost visibility: tagged/untagged split and grouped breakdowns
    Costs(CostsArgs),

    /// Tag completeness scores, lowest-ranked resources, missing fields
    Compliance(ComplianceArgs),

    /// List untagged resources sorted by cost, optionally export them
    Untagged(UntaggedArgs),

    /// Apply an edit plan and compare compliance before and after
    Remediate(RemediateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Shared query arguments
// ============================================================================

#[derive(Parser)]
pub struct QueryArgs {
    /// Path to the inventory CSV
    #[arg(short, long, env = "TAGAUDIT_INPUT", value_name = "FILE")]
    pub input: PathBuf,

    /// Restrict to selected values, e.g. "Service=EC2,S3" (repeatable;
    /// selecting "All" leaves a field unrestricted)
    #[arg(short, long, value_name = "FIELD=V1,V2")]
    pub filter: Vec<String>,
}

// ============================================================================
// Costs
// ============================================================================

#[derive(Parser)]
pub struct CostsArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Field to group cost breakdowns by
    #[arg(short, long, default_value = "Department")]
    pub group_by: String,

    /// Maximum rows per grouped table
    #[arg(short, long, default_value = "10")]
    pub top: usize,
}

// ============================================================================
// Compliance
// ============================================================================

#[derive(Parser)]
pub struct ComplianceArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Number of lowest-scoring resources to show
    #[arg(short, long, default_value = "5")]
    pub lowest: usize,
}

// ============================================================================
// Untagged
// ============================================================================

#[derive(Parser)]
pub struct UntaggedArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Export the untagged resources to this CSV file
    #[arg(short, long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

// ============================================================================
// Remediate
// ============================================================================

#[derive(Parser)]
pub struct RemediateArgs {
    /// Path to the inventory CSV
    #[arg(short, long, env = "TAGAUDIT_INPUT", value_name = "FILE")]
    pub input: PathBuf,

    /// JSON edit plan with tag-field assignments per resource
    #[arg(short, long, value_name = "FILE")]
    pub edits: PathBuf,

    /// Write the full remediated dataset to this CSV file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the still-untagged remainder to this CSV file
    #[arg(long, value_name = "FILE")]
    pub export_untagged: Option<PathBuf>,

    /// Print the comparison report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
