use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const THINKING_LABEL: &str = "🤔 Thinking...";
pub const FIXING_JSON_LABEL: &str = "😅 Trying to fix JSON...";

/// Console spinner shown for the duration of one provider call. Cleared on
/// drop; draws to stderr and stays hidden when disabled.
pub struct StatusSpinner {
    bar: ProgressBar,
}

impl StatusSpinner {
    pub fn start(label: &str, enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }
}

impl Drop for StatusSpinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
