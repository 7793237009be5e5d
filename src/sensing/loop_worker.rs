use std::collections::VecDeque;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::analysis::{DetectionConfig, FrameAnalysis, SwingSession};
use crate::metrics::SessionMetrics;

use super::source::{FrameSource, PoseSample};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const DEFAULT_PROGRESS_LOG_EVERY: usize = 30;

/// Final report plus the per-frame records it was built from.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub metrics: SessionMetrics,
    pub frames: Vec<FrameAnalysis>,
}

/// Drives one source through a [`SwingSession`] frame by frame.
#[derive(Debug, Clone)]
pub struct SessionRunner {
    config: DetectionConfig,
    progress_log_every: usize,
}

impl SessionRunner {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            progress_log_every: DEFAULT_PROGRESS_LOG_EVERY,
        }
    }

    /// Zero disables progress logging.
    pub fn with_progress_log_every(mut self, frames: usize) -> Self {
        self.progress_log_every = frames;
        self
    }

    /// Runs the source to its end, or until `cancel` fires or a read fails.
    ///
    /// Cancellation is checked between frames only. A stopped run reports
    /// over the frames consumed before the stop and is marked aborted.
    pub fn run(&self, source: &mut dyn FrameSource, cancel: &CancellationToken) -> SessionOutcome {
        let started = Instant::now();
        let mut aborted = false;

        let (total_frames, mut buffered) = match source.total_frames() {
            Some(total) => (total, None),
            None => {
                let (samples, complete) = drain(source, cancel);
                aborted = !complete;
                (samples.len(), Some(samples))
            }
        };
        log_info!("swing analysis started: {} frames", total_frames);

        let mut session = SwingSession::new(self.config.clone(), total_frames);
        let mut warned_gap = false;

        loop {
            if cancel.is_cancelled() {
                log_info!("swing analysis cancelled after {} frames", session.frames_seen());
                aborted = true;
                break;
            }

            let next = match buffered.as_mut() {
                Some(samples) => Ok(samples.pop_front()),
                None => source.next_sample(),
            };
            let sample = match next {
                Ok(Some(sample)) => sample,
                Ok(None) => break,
                Err(err) => {
                    log_warn!(
                        "frame source failed after {} frames: {err:#}",
                        session.frames_seen()
                    );
                    aborted = true;
                    break;
                }
            };

            if sample.index != session.frames_seen() && !warned_gap {
                log_warn!(
                    "source frame {} arrived as frame {}; using arrival order",
                    sample.index,
                    session.frames_seen()
                );
                warned_gap = true;
            }
            session.process_frame(sample.landmarks);

            let seen = session.frames_seen();
            if self.progress_log_every > 0 && seen % self.progress_log_every == 0 {
                log_info!("processed {}/{} frames", seen, total_frames);
            }
        }

        let metrics = if aborted {
            session.finish_early()
        } else {
            session.finish()
        };
        log_info!(
            "swing analysis finished in {}ms: {} frames, {} with a body, score {:.1}{}",
            started.elapsed().as_millis(),
            metrics.total_frames,
            metrics.processed_frames,
            metrics.overall_score,
            if aborted { " (aborted)" } else { "" }
        );

        SessionOutcome {
            metrics,
            frames: session.analyses().to_vec(),
        }
    }
}

/// Convenience wrapper for [`SessionRunner::run`] with default logging.
pub fn analyze_source(
    source: &mut dyn FrameSource,
    config: &DetectionConfig,
    cancel: &CancellationToken,
) -> SessionMetrics {
    SessionRunner::new(config.clone()).run(source, cancel).metrics
}

/// Reads every sample so the frame count is known before analysis starts.
/// The flag is false when the read stopped early.
fn drain(source: &mut dyn FrameSource, cancel: &CancellationToken) -> (VecDeque<PoseSample>, bool) {
    let mut samples = VecDeque::new();
    loop {
        if cancel.is_cancelled() {
            return (samples, false);
        }
        match source.next_sample() {
            Ok(Some(sample)) => samples.push_back(sample),
            Ok(None) => return (samples, true),
            Err(err) => {
                log_warn!("frame source failed while counting frames: {err:#}");
                return (samples, false);
            }
        }
    }
}
