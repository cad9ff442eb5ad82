//! Renders a streamed answer on the console.

use colored::Colorize;
use hiremate_application::{ChatError, StreamObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tracing::debug;

/// Prints fragments as they arrive, with a spinner until the first one.
pub struct ConsoleObserver {
    spinner: Option<ProgressBar>,
    printed: bool,
}

impl ConsoleObserver {
    pub fn new(show_progress: bool) -> Self {
        let spinner = show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Coach is thinking...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self {
            spinner,
            printed: false,
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl StreamObserver for ConsoleObserver {
    fn on_chunk(&mut self, fragment: &str, _running_total: &str) {
        self.clear_spinner();
        if !self.printed {
            print!("{} ", "coach>".green().bold());
            self.printed = true;
        }
        print!("{}", fragment);
        let _ = std::io::stdout().flush();
    }

    fn on_complete(&mut self, full_text: &str) {
        self.clear_spinner();
        if self.printed {
            println!();
        } else if full_text.is_empty() {
            println!("{}", "(the coach had nothing to add)".dimmed());
        }
        println!();
    }

    fn on_error(&mut self, error: &ChatError) {
        self.clear_spinner();
        if self.printed {
            println!();
        }
        debug!("Chat error: {}", error.reason());
        eprintln!("{} {}", "!".red().bold(), error.user_message().red());
        println!();
    }
}

impl Drop for ConsoleObserver {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
