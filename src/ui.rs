//! Terminal loading indicator for the CLI front end.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    pub fn new(mode: UiMode, is_tty: bool) -> Self {
        Self { mode, is_tty }
    }

    pub fn from_flag(ui_flag: Option<&str>, is_tty: bool) -> Self {
        let mode = match ui_flag {
            Some("plain") => UiMode::Plain,
            Some("pretty") => UiMode::Pretty,
            _ => UiMode::Auto,
        };
        Self::new(mode, is_tty)
    }

    /// Show a loader for the duration of a stage; dropped when the stage
    /// completes (mirrors the loading indicator that clears in `finally`).
    pub fn loading(&self, message: &str) -> Loader {
        let use_pretty = match self.mode {
            UiMode::Pretty => true,
            UiMode::Plain => false,
            UiMode::Auto => self.is_tty,
        };

        if use_pretty {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(message.to_string());
            Loader::new(message.to_string(), Some(spinner))
        } else {
            eprintln!("==> {}", message);
            Loader::new(message.to_string(), None)
        }
    }
}

pub struct Loader {
    message: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl Loader {
    fn new(message: String, spinner: Option<ProgressBar>) -> Self {
        Self {
            message,
            start: Instant::now(),
            spinner,
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let done = format!("{} ({:.1}s)", self.message, elapsed.as_secs_f64());
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(done);
        } else {
            eprintln!("==> done: {}", done);
        }
    }
}
