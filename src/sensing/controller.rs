use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{SessionOutcome, SessionRunner};
use super::source::{FrameSource, JsonlFrameSource};

/// Owns one frame source and the blocking task analyzing it.
///
/// The source moves into the task on construction and is dropped when the
/// task returns. Dropping the controller cancels an unfinished analysis.
pub struct AnalysisController {
    handle: Option<JoinHandle<SessionOutcome>>,
    cancel_token: CancellationToken,
}

impl AnalysisController {
    /// Must be called from within a tokio runtime.
    pub fn start(source: Box<dyn FrameSource>, runner: SessionRunner) -> Self {
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let mut source = source;
            runner.run(source.as_mut(), &token_clone)
        });

        Self {
            handle: Some(handle),
            cancel_token,
        }
    }

    /// Opens a JSONL pose export and starts analyzing it.
    pub fn open(path: &Path, runner: SessionRunner) -> Result<Self> {
        let source = JsonlFrameSource::open(path)?;
        info!("analyzing {}", path.display());
        Ok(Self::start(Box::new(source), runner))
    }

    /// Asks the analysis to stop at the next frame boundary.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Waits for the analysis to end and returns its outcome.
    pub async fn finish(mut self) -> Result<SessionOutcome> {
        match self.handle.take() {
            Some(handle) => handle.await.context("swing analysis task failed to join"),
            None => anyhow::bail!("swing analysis already finished"),
        }
    }
}

impl Drop for AnalysisController {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel_token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::detectors::test_support::base_landmarks;
    use crate::analysis::DetectionConfig;
    use crate::sensing::source::MemoryFrameSource;

    #[tokio::test]
    async fn finishes_a_full_session() {
        let source = MemoryFrameSource::from_frames(vec![Some(base_landmarks()); 50]);
        let controller =
            AnalysisController::start(Box::new(source), SessionRunner::new(DetectionConfig::default()));
        let outcome = controller.finish().await.unwrap();

        assert_eq!(outcome.metrics.total_frames, 50);
        assert!(!outcome.metrics.aborted);
    }

    #[tokio::test]
    async fn missing_file_is_an_open_error() {
        let result = AnalysisController::open(
            Path::new("/definitely/not/here.jsonl"),
            SessionRunner::new(DetectionConfig::default()),
        );
        assert!(result.is_err());
    }
}
