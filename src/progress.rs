//! Progress notifications for long-running provisioning

use indicatif::{ProgressBar, ProgressStyle};

/// Receives `(count, total, message)` updates while provisioning runs.
///
/// Notifications are fire-and-forget; a reporter cannot fail the run.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, count: u32, total: u32, message: &str);
}

impl<F> ProgressReporter for F
where
    F: Fn(u32, u32, &str) + Send + Sync,
{
    fn report(&self, count: u32, total: u32, message: &str) {
        self(count, total, message)
    }
}

/// Terminal progress bar for the CLI
pub struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    /// A bar that draws nothing, for non-interactive output formats
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressBarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn report(&self, count: u32, total: u32, message: &str) {
        self.bar.set_length(u64::from(total));
        self.bar.set_position(u64::from(count));
        self.bar.set_message(message.to_string());
    }
}
