use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reposcout::{NetworkState, NetworkStatus};

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    pub fn status(&self, query: &str, state: &NetworkState) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());

        match state.status {
            NetworkStatus::Loading => {
                let pb = spinner.get_or_insert_with(|| {
                    let bar = ProgressBar::new_spinner();
                    bar.set_style(Self::spinner_style());
                    bar.set_prefix("search");
                    bar.enable_steady_tick(Duration::from_millis(100));
                    bar
                });
                pb.set_message(format!("Searching \"{}\"...", query));
            }
            NetworkStatus::Success | NetworkStatus::Idle => {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
            }
            NetworkStatus::NotFound => {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
                if let Some(message) = &state.message {
                    eprintln!("{}", style(message).yellow());
                }
            }
            NetworkStatus::Error => {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
                if let Some(message) = &state.message {
                    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
                }
            }
        }
    }

    pub fn page_loaded(&self, page: usize, count: usize, total: usize) {
        let spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = spinner.as_ref() {
            pb.set_message(format!("Page {} ({} results, {} shown)", page, count, total));
        }
    }

    pub fn finish(&self) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }
}
