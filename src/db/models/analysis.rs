use std::collections::BTreeMap;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::{PrimaryIssue, SessionMetrics};
use crate::models::{FaultKind, SwingPhase};

/// A finished analysis as kept in the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub id: String,
    pub label: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    pub total_frames: usize,
    pub processed_frames: usize,
    pub overall_score: f64,
    pub aborted: bool,
    pub fault_percentages: BTreeMap<FaultKind, f64>,
    pub primary_issues: Vec<PrimaryIssue>,
    pub swing_phases: BTreeMap<SwingPhase, Vec<FaultKind>>,
}

impl StoredAnalysis {
    /// Error-shaped reports carry no figures and are rejected.
    pub fn from_metrics(
        metrics: &SessionMetrics,
        label: Option<String>,
        analyzed_at: DateTime<Utc>,
    ) -> Result<Self> {
        if let Some(error) = &metrics.error {
            bail!("refusing to store failed analysis: {error}");
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            label,
            analyzed_at,
            total_frames: metrics.total_frames,
            processed_frames: metrics.processed_frames,
            overall_score: metrics.overall_score,
            aborted: metrics.aborted,
            fault_percentages: metrics.fault_percentages.clone(),
            primary_issues: metrics.primary_issues.clone(),
            swing_phases: metrics.swing_phases.clone(),
        })
    }

    pub fn percentage(&self, kind: FaultKind) -> f64 {
        self.fault_percentages.get(&kind).copied().unwrap_or(0.0)
    }
}
