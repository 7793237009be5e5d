use super::config::DetectionConfig;
use super::frame::{FaultCounters, FrameAnalysis, FrameAnalyzer};
use super::history::HistoryBuffer;
use super::phase::classify_phase;
use crate::metrics::{aggregate, SessionMetrics};
use crate::models::{frame_progress, LandmarkFrame, Landmarks};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Mutable state of one swing analysis: history, counters and the per-frame
/// records, fed one frame at a time in source order.
pub struct SwingSession {
    analyzer: FrameAnalyzer,
    total_frames: usize,
    history: HistoryBuffer,
    counters: FaultCounters,
    analyses: Vec<FrameAnalysis>,
    processed_frames: usize,
}

impl SwingSession {
    pub fn new(config: DetectionConfig, total_frames: usize) -> Self {
        Self::with_analyzer(FrameAnalyzer::new(config), total_frames)
    }

    pub fn with_analyzer(analyzer: FrameAnalyzer, total_frames: usize) -> Self {
        Self {
            analyzer,
            total_frames,
            history: HistoryBuffer::new(),
            counters: FaultCounters::new(),
            analyses: Vec::with_capacity(total_frames),
            processed_frames: 0,
        }
    }

    /// Analyzes the next frame. The frame index is the number of frames
    /// consumed so far; `None` means no body was detected.
    pub fn process_frame(&mut self, landmarks: Option<Landmarks>) -> &FrameAnalysis {
        let index = self.analyses.len();
        let progress = frame_progress(index, self.total_frames);
        let phase = classify_phase(progress_percent(index, self.total_frames));

        let analysis = match landmarks {
            Some(landmarks) => {
                let frame = LandmarkFrame {
                    index,
                    progress,
                    landmarks,
                };
                self.history.append(frame.clone());
                let analysis = self.analyzer.analyze(&frame, &self.history, phase);
                self.counters.record(&analysis);
                self.processed_frames += 1;
                analysis
            }
            None => {
                log_debug!("frame {}: no body detected", index);
                FrameAnalysis::absent(index, progress, phase)
            }
        };

        self.analyses.push(analysis);
        &self.analyses[index]
    }

    pub fn frames_seen(&self) -> usize {
        self.analyses.len()
    }

    pub fn processed_frames(&self) -> usize {
        self.processed_frames
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn analyses(&self) -> &[FrameAnalysis] {
        &self.analyses
    }

    /// Report over the declared frame count, or over the frames consumed when
    /// the stream ran past the declared count.
    pub fn finish(&self) -> SessionMetrics {
        let seen = self.analyses.len();
        if seen > self.total_frames {
            log_warn!(
                "stream delivered {} frames but declared {}; reporting over {}",
                seen,
                self.total_frames,
                seen
            );
        }
        aggregate(
            self.total_frames.max(seen),
            &self.counters,
            self.processed_frames,
            &self.analyses,
        )
    }

    /// Report over the frames consumed so far, marked as aborted.
    pub fn finish_early(&self) -> SessionMetrics {
        let mut metrics = aggregate(
            self.analyses.len(),
            &self.counters,
            self.processed_frames,
            &self.analyses,
        );
        metrics.aborted = true;
        metrics
    }
}

/// Percent computed from integers so range boundaries land exactly.
fn progress_percent(index: usize, total_frames: usize) -> f64 {
    if total_frames == 0 {
        100.0
    } else {
        index as f64 * 100.0 / total_frames as f64
    }
}
