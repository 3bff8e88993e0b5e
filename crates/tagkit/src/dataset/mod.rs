//! Dataset parsing and generation for the quoted-CSV inventory format.
//!
//! This module provides functions for reading and writing resource
//! inventory files.

pub mod parser;
pub mod writer;

pub use parser::{parse_file, parse_string};
pub use writer::{write_file, write_string};
