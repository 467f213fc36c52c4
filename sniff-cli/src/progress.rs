use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown on stderr while a scan runs.
pub struct ScanProgress {
    spinner: ProgressBar,
}

impl ScanProgress {
    /// Creates the spinner; a hidden one when `visible` is false.
    pub fn new(visible: bool) -> Self {
        if !visible {
            return Self {
                spinner: ProgressBar::hidden(),
            };
        }

        let spinner = ProgressBar::new_spinner();
        match ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            Ok(style) => spinner.set_style(style),
            Err(e) => tracing::debug!("Falling back to default spinner style: {}", e),
        }
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self { spinner }
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.spinner.set_message(status.into());
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}
