use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Biomechanical faults the analyzer can flag.
///
/// Variant order is the tie-break order used when ranking primary issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    TrailArmCollapse,
    EarlyExtension,
    OverTheTop,
    Sway,
    ReversePivot,
    HeadMovement,
    WeightShift,
}

impl FaultKind {
    pub const ALL: [FaultKind; 7] = [
        FaultKind::TrailArmCollapse,
        FaultKind::EarlyExtension,
        FaultKind::OverTheTop,
        FaultKind::Sway,
        FaultKind::ReversePivot,
        FaultKind::HeadMovement,
        FaultKind::WeightShift,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::TrailArmCollapse => "trail_arm_collapse",
            FaultKind::EarlyExtension => "early_extension",
            FaultKind::OverTheTop => "over_the_top",
            FaultKind::Sway => "sway",
            FaultKind::ReversePivot => "reverse_pivot",
            FaultKind::HeadMovement => "head_movement",
            FaultKind::WeightShift => "weight_shift",
        }
    }

    /// Position in `ALL`, used to index fixed-size counter arrays.
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    High,
    /// The measurement could not be taken for this frame.
    Unknown,
}

impl Severity {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.7 {
            Severity::High
        } else if confidence > 0.4 {
            Severity::Moderate
        } else if confidence > 0.1 {
            Severity::Mild
        } else {
            Severity::None
        }
    }
}

/// Outcome of one detector on one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultResult {
    pub detected: bool,
    pub confidence: f64,
    pub severity: Severity,
    /// Raw measurements behind the decision, e.g. `elbow_angle` in degrees.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub measurements: BTreeMap<String, f64>,
}

impl FaultResult {
    pub fn measured(detected: bool, confidence: f64) -> Self {
        Self {
            detected,
            confidence,
            severity: Severity::from_confidence(confidence),
            measurements: BTreeMap::new(),
        }
    }

    /// Not detected with zero confidence: history not ready or phase not evaluated.
    pub fn inactive() -> Self {
        Self::measured(false, 0.0)
    }

    /// The detector could not take its measurement.
    pub fn neutral() -> Self {
        Self {
            detected: false,
            confidence: 0.0,
            severity: Severity::Unknown,
            measurements: BTreeMap::new(),
        }
    }

    pub fn with_measurement(mut self, name: &str, value: f64) -> Self {
        self.measurements.insert(name.to_string(), value);
        self
    }

    pub fn measurement(&self, name: &str) -> Option<f64> {
        self.measurements.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bands_are_exclusive_at_the_edges() {
        assert_eq!(Severity::from_confidence(0.71), Severity::High);
        assert_eq!(Severity::from_confidence(0.7), Severity::Moderate);
        assert_eq!(Severity::from_confidence(0.4), Severity::Mild);
        assert_eq!(Severity::from_confidence(0.1), Severity::None);
        assert_eq!(Severity::from_confidence(0.0), Severity::None);
    }

    #[test]
    fn neutral_result_is_unknown() {
        let result = FaultResult::neutral();
        assert!(!result.detected);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.severity, Severity::Unknown);
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        for (i, kind) in FaultKind::ALL.iter().enumerate() {
            assert_eq!(kind.ordinal(), i);
        }
        assert_eq!(FaultKind::COUNT, 7);
    }

    #[test]
    fn fault_kind_serializes_as_fault_name() {
        let json = serde_json::to_string(&FaultKind::OverTheTop).unwrap();
        assert_eq!(json, "\"over_the_top\"");
    }
}
