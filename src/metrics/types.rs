use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{FaultKind, SwingPhase};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryIssue {
    pub fault: FaultKind,
    pub percentage: f64,
}

/// Session-level report produced once the frame stream ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub total_frames: usize,
    pub processed_frames: usize,
    #[serde(default)]
    pub fault_percentages: BTreeMap<FaultKind, f64>,
    #[serde(default)]
    pub primary_issues: Vec<PrimaryIssue>,
    pub overall_score: f64,
    /// Faults detected in each phase, one entry per detecting frame.
    #[serde(default)]
    pub swing_phases: BTreeMap<SwingPhase, Vec<FaultKind>>,
    #[serde(default)]
    pub recommendation_priority: Vec<FaultKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The stream stopped early; figures cover the frames read before the stop.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub aborted: bool,
}

impl SessionMetrics {
    /// The record returned when no analysis could run at all.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            total_frames: 0,
            processed_frames: 0,
            fault_percentages: BTreeMap::new(),
            primary_issues: Vec::new(),
            overall_score: 0.0,
            swing_phases: BTreeMap::new(),
            recommendation_priority: Vec::new(),
            error: Some(message.into()),
            aborted: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn percentage(&self, kind: FaultKind) -> f64 {
        self.fault_percentages.get(&kind).copied().unwrap_or(0.0)
    }
}
