//! Swing-over-swing comparison of stored analyses.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::db::{Database, StoredAnalysis};
use crate::models::FaultKind;

/// Percentage-point change in a fault that counts as real movement.
const FAULT_CHANGE_THRESHOLD: f64 = 5.0;
/// Score change that moves the trend off `stable`.
const SCORE_CHANGE_THRESHOLD: f64 = 2.0;
/// Least-squares slope (score points per swing) for the long-run trend.
const SLOPE_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

impl Trend {
    fn from_change(change: f64, threshold: f64) -> Self {
        if change > threshold {
            Trend::Improving
        } else if change < -threshold {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultChange {
    pub fault: FaultKind,
    /// Absolute change in percentage points.
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingComparison {
    pub comparison_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latest_score: f64,
    pub previous_score: f64,
    pub score_change: f64,
    pub improvements: Vec<FaultChange>,
    pub regressions: Vec<FaultChange>,
    pub overall_trend: Trend,
    /// Slope-based trend over every analysis considered, oldest to newest.
    pub long_term_trend: Trend,
    pub swing_count: usize,
}

impl SwingComparison {
    fn unavailable(swing_count: usize) -> Self {
        Self {
            comparison_available: false,
            message: Some("Need at least 2 swings to compare".to_string()),
            latest_score: 0.0,
            previous_score: 0.0,
            score_change: 0.0,
            improvements: Vec::new(),
            regressions: Vec::new(),
            overall_trend: Trend::InsufficientData,
            long_term_trend: Trend::InsufficientData,
            swing_count,
        }
    }
}

/// Compares the latest analysis with the one before it.
///
/// Faults are walked in the latest analysis; a fault missing from the
/// previous one counts as 0%.
pub fn compare_swings(latest: &StoredAnalysis, previous: &StoredAnalysis) -> SwingComparison {
    let mut improvements = Vec::new();
    let mut regressions = Vec::new();

    for (fault, latest_pct) in &latest.fault_percentages {
        let difference = previous.percentage(*fault) - latest_pct;
        if difference > FAULT_CHANGE_THRESHOLD {
            improvements.push(FaultChange {
                fault: *fault,
                change: difference,
            });
        } else if difference < -FAULT_CHANGE_THRESHOLD {
            regressions.push(FaultChange {
                fault: *fault,
                change: difference.abs(),
            });
        }
    }

    let score_change = latest.overall_score - previous.overall_score;

    SwingComparison {
        comparison_available: true,
        message: None,
        latest_score: latest.overall_score,
        previous_score: previous.overall_score,
        score_change,
        improvements,
        regressions,
        overall_trend: Trend::from_change(score_change, SCORE_CHANGE_THRESHOLD),
        long_term_trend: Trend::InsufficientData,
        swing_count: 2,
    }
}

/// Least-squares trend of scores ordered oldest to newest. Needs three.
pub fn score_trend(scores: &[f64]) -> Trend {
    if scores.len() < 3 {
        return Trend::InsufficientData;
    }

    let n = scores.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = scores.iter().sum::<f64>() / n;
    let (mut covariance, mut variance) = (0.0, 0.0);
    for (i, score) in scores.iter().enumerate() {
        let dx = i as f64 - mean_x;
        covariance += dx * (score - mean_y);
        variance += dx * dx;
    }

    Trend::from_change(covariance / variance, SLOPE_THRESHOLD)
}

/// Compares the two newest stored analyses out of the last `limit`.
pub async fn compare_recent(db: &Database, limit: usize) -> Result<SwingComparison> {
    let analyses = db.recent_analyses(limit.max(2)).await?;
    let [latest, previous, ..] = analyses.as_slice() else {
        return Ok(SwingComparison::unavailable(analyses.len()));
    };

    let mut comparison = compare_swings(latest, previous);
    let oldest_first: Vec<f64> = analyses.iter().rev().map(|a| a.overall_score).collect();
    comparison.long_term_trend = score_trend(&oldest_first);
    comparison.swing_count = analyses.len();
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn stored(score: f64, faults: &[(FaultKind, f64)]) -> StoredAnalysis {
        StoredAnalysis {
            id: "test".into(),
            label: None,
            analyzed_at: Utc::now(),
            total_frames: 100,
            processed_frames: 100,
            overall_score: score,
            aborted: false,
            fault_percentages: faults.iter().copied().collect(),
            primary_issues: Vec::new(),
            swing_phases: BTreeMap::new(),
        }
    }

    #[test]
    fn reports_improvements_and_regressions() {
        let previous = stored(80.0, &[(FaultKind::Sway, 40.0), (FaultKind::HeadMovement, 10.0)]);
        let latest = stored(
            85.0,
            &[
                (FaultKind::Sway, 20.0),
                (FaultKind::HeadMovement, 25.0),
                (FaultKind::WeightShift, 3.0),
            ],
        );

        let comparison = compare_swings(&latest, &previous);
        assert!(comparison.comparison_available);
        assert_eq!(
            comparison.improvements,
            vec![FaultChange {
                fault: FaultKind::Sway,
                change: 20.0
            }]
        );
        assert_eq!(
            comparison.regressions,
            vec![FaultChange {
                fault: FaultKind::HeadMovement,
                change: 15.0
            }]
        );
        assert_eq!(comparison.score_change, 5.0);
        assert_eq!(comparison.overall_trend, Trend::Improving);
    }

    #[test]
    fn small_moves_are_stable() {
        let previous = stored(80.0, &[(FaultKind::Sway, 12.0)]);
        let latest = stored(78.5, &[(FaultKind::Sway, 15.0)]);

        let comparison = compare_swings(&latest, &previous);
        assert!(comparison.improvements.is_empty());
        assert!(comparison.regressions.is_empty());
        assert_eq!(comparison.overall_trend, Trend::Stable);
    }

    #[test]
    fn slope_trend_needs_three_scores() {
        assert_eq!(score_trend(&[50.0, 90.0]), Trend::InsufficientData);
        assert_eq!(score_trend(&[50.0, 60.0, 70.0]), Trend::Improving);
        assert_eq!(score_trend(&[70.0, 70.5, 70.0]), Trend::Stable);
        assert_eq!(score_trend(&[90.0, 80.0, 60.0]), Trend::Declining);
    }
}
