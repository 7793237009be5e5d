//! Reduction of per-frame analyses into a session report.

mod types;

pub use types::{PrimaryIssue, SessionMetrics};

use std::collections::BTreeMap;

use crate::analysis::{FaultCounters, FrameAnalysis};
use crate::models::{FaultKind, SwingPhase};

const MAX_PRIMARY_ISSUES: usize = 3;
const PRIMARY_ISSUE_MIN_PERCENT: f64 = 10.0;
const RECOMMENDATION_COUNT: usize = 2;

/// Builds the session report.
///
/// `total_frames` is the divisor for every percentage and includes frames
/// without a detected body. Zero frames yields the error record.
pub fn aggregate(
    total_frames: usize,
    counters: &FaultCounters,
    processed_frames: usize,
    analyses: &[FrameAnalysis],
) -> SessionMetrics {
    if total_frames == 0 {
        return SessionMetrics::error("No frames processed");
    }

    let fault_percentages: BTreeMap<FaultKind, f64> = counters
        .iter()
        .map(|(kind, count)| (kind, count as f64 / total_frames as f64 * 100.0))
        .collect();

    let primary_issues = primary_issues(&fault_percentages);
    let recommendation_priority = primary_issues
        .iter()
        .take(RECOMMENDATION_COUNT)
        .map(|issue| issue.fault)
        .collect();

    let total_impact: f64 = fault_percentages.values().sum();
    let overall_score = (100.0 - total_impact / FaultKind::COUNT as f64).max(0.0);

    SessionMetrics {
        total_frames,
        processed_frames,
        fault_percentages,
        primary_issues,
        overall_score: round_to_tenth(overall_score),
        swing_phases: phase_distribution(analyses),
        recommendation_priority,
        error: None,
        aborted: false,
    }
}

/// Top three by percentage, then anything at or below 10% dropped.
/// Ties keep enumeration order.
fn primary_issues(fault_percentages: &BTreeMap<FaultKind, f64>) -> Vec<PrimaryIssue> {
    let mut ranked: Vec<(FaultKind, f64)> =
        fault_percentages.iter().map(|(kind, pct)| (*kind, *pct)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(MAX_PRIMARY_ISSUES)
        .filter(|(_, pct)| *pct > PRIMARY_ISSUE_MIN_PERCENT)
        .map(|(fault, percentage)| PrimaryIssue { fault, percentage })
        .collect()
}

fn phase_distribution(analyses: &[FrameAnalysis]) -> BTreeMap<SwingPhase, Vec<FaultKind>> {
    let mut phases: BTreeMap<_, Vec<FaultKind>> = BTreeMap::new();
    for analysis in analyses {
        phases
            .entry(analysis.phase)
            .or_default()
            .extend(analysis.detected_faults());
    }
    phases
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FaultResult;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn analysis_with(index: usize, phase: SwingPhase, detected: &[FaultKind]) -> FrameAnalysis {
        let mut analysis = FrameAnalysis::absent(index, index as f64 / 100.0, phase);
        analysis.body_detected = true;
        for kind in FaultKind::ALL {
            let result = if detected.contains(&kind) {
                FaultResult::measured(true, 0.9)
            } else {
                FaultResult::inactive()
            };
            analysis.fault_results.insert(kind, result);
        }
        analysis
    }

    fn counters_for(analyses: &[FrameAnalysis]) -> FaultCounters {
        let mut counters = FaultCounters::new();
        for analysis in analyses {
            counters.record(analysis);
        }
        counters
    }

    #[test]
    fn zero_frames_is_the_error_record() {
        let metrics = aggregate(0, &FaultCounters::new(), 0, &[]);
        assert_eq!(metrics.error.as_deref(), Some("No frames processed"));
        assert_eq!(metrics.overall_score, 0.0);
        assert!(metrics.fault_percentages.is_empty());
        assert!(metrics.primary_issues.is_empty());
    }

    #[test]
    fn percentages_use_total_frames() {
        let mut analyses: Vec<FrameAnalysis> = (0..5)
            .map(|i| analysis_with(i, SwingPhase::Address, &[FaultKind::Sway]))
            .collect();
        analyses.extend((5..20).map(|i| FrameAnalysis::absent(i, i as f64 / 20.0, SwingPhase::Takeaway)));
        let counters = counters_for(&analyses);

        let metrics = aggregate(20, &counters, 5, &analyses);
        assert_abs_diff_eq!(metrics.percentage(FaultKind::Sway), 25.0, epsilon = 1e-9);
        assert_eq!(metrics.processed_frames, 5);
        // 100 - 25 / 7 = 96.428...
        assert_eq!(metrics.overall_score, 96.4);
    }

    #[test]
    fn primary_issues_drop_small_faults_after_ranking() {
        // 50%, 40%, 30%, 5%: the fourth is cut by rank, not by the threshold.
        let mut analyses = Vec::new();
        for i in 0..20 {
            let mut detected = Vec::new();
            if i < 10 {
                detected.push(FaultKind::HeadMovement);
            }
            if i < 8 {
                detected.push(FaultKind::Sway);
            }
            if i < 6 {
                detected.push(FaultKind::WeightShift);
            }
            if i < 1 {
                detected.push(FaultKind::TrailArmCollapse);
            }
            analyses.push(analysis_with(i, SwingPhase::Backswing, &detected));
        }
        let metrics = aggregate(20, &counters_for(&analyses), 20, &analyses);

        let faults: Vec<FaultKind> = metrics.primary_issues.iter().map(|i| i.fault).collect();
        assert_eq!(
            faults,
            vec![FaultKind::HeadMovement, FaultKind::Sway, FaultKind::WeightShift]
        );
        assert_eq!(
            metrics.recommendation_priority,
            vec![FaultKind::HeadMovement, FaultKind::Sway]
        );
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let analyses: Vec<FrameAnalysis> = (0..10)
            .map(|i| {
                analysis_with(
                    i,
                    SwingPhase::Downswing,
                    &[FaultKind::WeightShift, FaultKind::EarlyExtension],
                )
            })
            .collect();
        let metrics = aggregate(10, &counters_for(&analyses), 10, &analyses);
        assert_eq!(metrics.primary_issues[0].fault, FaultKind::EarlyExtension);
        assert_eq!(metrics.primary_issues[1].fault, FaultKind::WeightShift);
    }

    #[test]
    fn phase_map_keeps_duplicates_and_empty_phases() {
        let analyses = vec![
            analysis_with(0, SwingPhase::Address, &[]),
            analysis_with(1, SwingPhase::Backswing, &[FaultKind::Sway]),
            analysis_with(2, SwingPhase::Backswing, &[FaultKind::Sway]),
            FrameAnalysis::absent(3, 0.9, SwingPhase::FollowThrough),
        ];
        let metrics = aggregate(4, &counters_for(&analyses), 3, &analyses);

        assert_eq!(metrics.swing_phases[&SwingPhase::Address], Vec::<FaultKind>::new());
        assert_eq!(
            metrics.swing_phases[&SwingPhase::Backswing],
            vec![FaultKind::Sway, FaultKind::Sway]
        );
        assert!(metrics.swing_phases.contains_key(&SwingPhase::FollowThrough));
        assert!(!metrics.swing_phases.contains_key(&SwingPhase::Impact));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let analyses = vec![analysis_with(0, SwingPhase::Address, &[FaultKind::Sway])];
        let metrics = aggregate(1, &counters_for(&analyses), 1, &analyses);
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["totalFrames"], 1);
        assert_eq!(json["faultPercentages"]["sway"], 100.0);
        assert_eq!(json["primaryIssues"][0]["fault"], "sway");
        assert!(json.get("error").is_none());
        assert!(json.get("aborted").is_none());
    }

    proptest! {
        #[test]
        fn report_stays_in_bounds(
            detections in prop::collection::vec(prop::collection::vec(any::<bool>(), 7), 1..60),
            absent in 0usize..20,
        ) {
            let mut analyses = Vec::new();
            for (i, flags) in detections.iter().enumerate() {
                let detected: Vec<FaultKind> = FaultKind::ALL
                    .iter()
                    .zip(flags)
                    .filter(|(_, on)| **on)
                    .map(|(kind, _)| *kind)
                    .collect();
                analyses.push(analysis_with(i, SwingPhase::Backswing, &detected));
            }
            let processed = analyses.len();
            let total = processed + absent;
            let metrics = aggregate(total, &counters_for(&analyses), processed, &analyses);

            prop_assert!(metrics.overall_score >= 0.0 && metrics.overall_score <= 100.0);
            for pct in metrics.fault_percentages.values() {
                prop_assert!(*pct >= 0.0 && *pct <= 100.0);
            }
            prop_assert!(metrics.primary_issues.len() <= 3);
            for pair in metrics.primary_issues.windows(2) {
                prop_assert!(pair[0].percentage >= pair[1].percentage);
            }
            for issue in &metrics.primary_issues {
                prop_assert!(issue.percentage > 10.0);
            }
            prop_assert!(metrics.recommendation_priority.len() <= 2);
        }
    }
}
