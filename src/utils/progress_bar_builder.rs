use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::error::Stage;

pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    tick: Option<Duration>,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} [{elapsed_precise}] {msg}",
            message: message.into(),
            tick: None,
        }
    }

    /// Spinner shown while a stage's external tool runs.
    pub(crate) fn for_stage(stage: Stage, detail: &str) -> Self {
        Self::new(format!("Running {} ({}): {}", stage, stage.tool(), detail))
            .with_tick(Duration::from_millis(200))
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
