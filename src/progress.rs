/// Loading indicator for dashboard fetches.
///
/// Shows an animated spinner on stderr while panels load. When stderr is not a
/// terminal nothing is drawn and the final message is printed as plain text.
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

#[derive(Clone)]
pub struct LoadProgress {
    spinner: Option<ProgressBar>,
}

impl LoadProgress {
    /// Starts a spinner labelled `message` if stderr is a TTY.
    pub fn start(message: &str) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} ({elapsed})")
        {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self {
            spinner: Some(spinner),
        }
    }

    /// No spinner, output only through [`LoadProgress::finish`].
    pub fn hidden() -> Self {
        Self { spinner: None }
    }

    pub fn is_visible(&self) -> bool {
        self.spinner.is_some()
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Clears the spinner and prints `message` on stderr.
    pub fn finish(&self, message: &str) {
        match self.spinner {
            Some(ref spinner) => {
                spinner.finish_and_clear();
                eprintln!("{}", message);
            }
            None => eprintln!("{}", message),
        }
    }
}
