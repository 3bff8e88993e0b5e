//! Progress indicators for the tagaudit CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner with the given message.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Stop a spinner and replace it with a success line.
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    crate::ui::success(msg);
}

/// Stop a spinner without leaving output behind.
pub fn finish_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
