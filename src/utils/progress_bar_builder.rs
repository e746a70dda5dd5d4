use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    tick: Option<Duration>,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} {msg}",
            message: message.into(),
            tick: None,
        }
    }

    pub(crate) fn with_template(mut self, template: &'static str) -> Self {
        self.style_template = template;
        self
    }

    pub(crate) fn with_tick(mut self, interval: Duration) -> Self {
        self.tick = Some(interval);
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template(self.style_template)?);
        pb.set_message(self.message);

        if let Some(interval) = self.tick {
            pb.enable_steady_tick(interval);
        }

        Ok(pb)
    }
}

/// Runs one pipeline step behind a spinner. On success the spinner ends
/// with `summary(&value)`; on failure it is abandoned with the step message.
pub(crate) fn run_stage<T, F, S>(message: &str, step: F, summary: S) -> Result<T>
where
    F: FnOnce() -> Result<T>,
    S: FnOnce(&T) -> String,
{
    let progress = ProgressBarBuilder::new(message)
        .with_template("{spinner:.green} [{elapsed}] {msg}")
        .with_tick(Duration::from_millis(100))
        .build()?;

    match step() {
        Ok(value) => {
            progress.finish_with_message(summary(&value));
            Ok(value)
        }
        Err(e) => {
            progress.abandon_with_message(format!("{} failed", message.trim_end_matches("...")));
            Err(e)
        }
    }
}
