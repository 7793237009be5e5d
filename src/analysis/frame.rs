use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::DetectionConfig;
use super::detectors::{default_detectors, DetectionContext, DetectionError, FaultDetector};
use super::history::HistoryBuffer;
use crate::models::{FaultKind, FaultResult, LandmarkFrame, SwingPhase};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Detector results for one frame. Frames without a detected body carry an
/// empty result map but still have a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalysis {
    pub index: usize,
    pub progress: f64,
    pub phase: SwingPhase,
    pub body_detected: bool,
    pub fault_results: BTreeMap<FaultKind, FaultResult>,
}

impl FrameAnalysis {
    pub fn absent(index: usize, progress: f64, phase: SwingPhase) -> Self {
        Self {
            index,
            progress,
            phase,
            body_detected: false,
            fault_results: BTreeMap::new(),
        }
    }

    /// Kinds flagged on this frame, in enumeration order.
    pub fn detected_faults(&self) -> Vec<FaultKind> {
        self.fault_results
            .iter()
            .filter(|(_, result)| result.detected)
            .map(|(kind, _)| *kind)
            .collect()
    }
}

/// Runs every detector against one frame.
pub struct FrameAnalyzer {
    detectors: Vec<Box<dyn FaultDetector>>,
    config: DetectionConfig,
}

impl FrameAnalyzer {
    pub fn new(config: DetectionConfig) -> Self {
        Self::with_detectors(config, default_detectors())
    }

    pub fn with_detectors(config: DetectionConfig, detectors: Vec<Box<dyn FaultDetector>>) -> Self {
        Self { detectors, config }
    }

    /// `history` must already contain `frame`.
    pub fn analyze(
        &self,
        frame: &LandmarkFrame,
        history: &HistoryBuffer,
        phase: SwingPhase,
    ) -> FrameAnalysis {
        let ctx = DetectionContext {
            frame,
            history,
            phase,
            config: &self.config,
        };

        let fault_results = self
            .detectors
            .iter()
            .map(|detector| {
                let kind = detector.kind();
                let result = match detector.detect(&ctx) {
                    Ok(result) => result,
                    Err(DetectionError::InsufficientHistory { .. }) => FaultResult::inactive(),
                    Err(err) => {
                        log_debug!("frame {}: {} not measured: {}", frame.index, kind, err);
                        FaultResult::neutral()
                    }
                };
                (kind, result)
            })
            .collect();

        FrameAnalysis {
            index: frame.index,
            progress: frame.progress,
            phase,
            body_detected: true,
            fault_results,
        }
    }
}

/// Per-kind count of frames on which a fault was detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultCounters {
    counts: [u64; FaultKind::COUNT],
}

impl FaultCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one for every detected fault in a completed frame analysis.
    pub fn record(&mut self, analysis: &FrameAnalysis) {
        for kind in analysis.detected_faults() {
            self.counts[kind.ordinal()] += 1;
        }
    }

    pub fn get(&self, kind: FaultKind) -> u64 {
        self.counts[kind.ordinal()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FaultKind, u64)> + '_ {
        FaultKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::detectors::test_support::{base_landmarks, frame, history_with};
    use crate::analysis::detectors::DetectionResult;
    use crate::models::{LandmarkName, Severity};

    struct AlwaysDegenerate;

    impl FaultDetector for AlwaysDegenerate {
        fn kind(&self) -> FaultKind {
            FaultKind::Sway
        }

        fn detect(&self, _ctx: &DetectionContext<'_>) -> DetectionResult {
            Err(DetectionError::Degenerate("test"))
        }
    }

    #[test]
    fn every_kind_gets_a_result() {
        let analyzer = FrameAnalyzer::new(DetectionConfig::default());
        let current = frame(40, base_landmarks());
        let history = history_with(20, Some(&current));

        let analysis = analyzer.analyze(&current, &history, SwingPhase::Backswing);
        assert!(analysis.body_detected);
        assert_eq!(analysis.fault_results.len(), FaultKind::COUNT);
        assert!(analysis.detected_faults().is_empty());
    }

    #[test]
    fn short_history_reads_as_inactive() {
        let analyzer = FrameAnalyzer::new(DetectionConfig::default());
        let current = frame(1, base_landmarks());
        let history = history_with(1, Some(&current));

        let analysis = analyzer.analyze(&current, &history, SwingPhase::Address);
        let sway = &analysis.fault_results[&FaultKind::Sway];
        assert_eq!(sway, &FaultResult::inactive());
        assert_eq!(sway.severity, Severity::None);
    }

    #[test]
    fn missing_landmark_reads_as_neutral() {
        let analyzer = FrameAnalyzer::new(DetectionConfig::default());
        let mut landmarks = base_landmarks();
        landmarks.remove(&LandmarkName::RightElbow);
        let current = frame(40, landmarks);
        let history = history_with(0, Some(&current));

        let analysis = analyzer.analyze(&current, &history, SwingPhase::Backswing);
        let arm = &analysis.fault_results[&FaultKind::TrailArmCollapse];
        assert_eq!(arm.severity, Severity::Unknown);
        assert!(!arm.detected);
    }

    #[test]
    fn degenerate_geometry_reads_as_neutral() {
        let analyzer =
            FrameAnalyzer::with_detectors(DetectionConfig::default(), vec![Box::new(AlwaysDegenerate)]);
        let current = frame(40, base_landmarks());
        let history = history_with(0, Some(&current));

        let analysis = analyzer.analyze(&current, &history, SwingPhase::Backswing);
        assert_eq!(analysis.fault_results[&FaultKind::Sway], FaultResult::neutral());
    }

    #[test]
    fn counters_only_count_detections() {
        let mut analysis = FrameAnalysis::absent(3, 0.03, SwingPhase::Address);
        analysis
            .fault_results
            .insert(FaultKind::Sway, FaultResult::measured(true, 0.8));
        analysis
            .fault_results
            .insert(FaultKind::HeadMovement, FaultResult::measured(false, 0.0));

        let mut counters = FaultCounters::new();
        counters.record(&analysis);
        counters.record(&analysis);
        counters.record(&FrameAnalysis::absent(4, 0.04, SwingPhase::Address));

        assert_eq!(counters.get(FaultKind::Sway), 2);
        assert_eq!(counters.get(FaultKind::HeadMovement), 0);
        assert_eq!(counters.iter().count(), FaultKind::COUNT);
    }
}
