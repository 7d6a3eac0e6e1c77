//! Colored output and progress reporting
//!
//! Uses owo-colors for terminal colors and indicatif for spinners.
//! Status lines go to stdout unless [`status_to_stderr`] was called, which
//! keeps stdout free for data (e.g. a patched recipe).

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static STATUS_TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Send all status lines to stderr from now on.
pub fn status_to_stderr() {
    STATUS_TO_STDERR.store(true, Ordering::Relaxed);
}

fn status(line: String) {
    if STATUS_TO_STDERR.load(Ordering::Relaxed) {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// Print an action header (blue, bold)
/// Example: "==> Resolving checksums for jetify-com/devbox 0.16.0"
pub fn action(message: &str) {
    status(format!("{} {}", "==>".blue().bold(), message.bold()));
}

/// Print a detail line (dimmed prefix)
/// Example: "     trying https://.../checksums.txt"
pub fn detail(message: &str) {
    status(format!("     {}", message.dimmed()));
}

/// Print a success message (green)
pub fn success(message: &str) {
    status(format!("{} {}", "==>".green().bold(), message.green()));
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    status(format!("{} {}", "::".cyan(), message));
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}

/// Print one `filename: checksum` row of a resolved checksum table
pub fn checksum_row(filename: &str, checksum: &str) {
    status(format!("  {} {}", format!("{}:", filename).bold(), checksum.dimmed()));
}

/// Create a simple spinner for network operations
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("     {spinner:.cyan} {msg}")
        .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success message
pub fn progress_success(pb: ProgressBar, message: &str) {
    pb.finish_with_message(format!("{}", message.green()));
}

/// Finish a spinner with a failure message
pub fn progress_fail(pb: ProgressBar, message: &str) {
    pb.finish_with_message(format!("{}", message.red()));
}
