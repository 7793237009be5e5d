use serde::{Deserialize, Serialize};

/// Ordered temporal segments of a golf swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingPhase {
    Address,
    Takeaway,
    Backswing,
    Transition,
    Downswing,
    Impact,
    FollowThrough,
}

impl SwingPhase {
    pub const ALL: [SwingPhase; 7] = [
        SwingPhase::Address,
        SwingPhase::Takeaway,
        SwingPhase::Backswing,
        SwingPhase::Transition,
        SwingPhase::Downswing,
        SwingPhase::Impact,
        SwingPhase::FollowThrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SwingPhase::Address => "address",
            SwingPhase::Takeaway => "takeaway",
            SwingPhase::Backswing => "backswing",
            SwingPhase::Transition => "transition",
            SwingPhase::Downswing => "downswing",
            SwingPhase::Impact => "impact",
            SwingPhase::FollowThrough => "follow_through",
        }
    }

    /// Progress-percent range `[start, end)` covered by this phase.
    pub fn progress_range(&self) -> (f64, f64) {
        match self {
            SwingPhase::Address => (0.0, 10.0),
            SwingPhase::Takeaway => (10.0, 30.0),
            SwingPhase::Backswing => (30.0, 50.0),
            SwingPhase::Transition => (50.0, 60.0),
            SwingPhase::Downswing => (60.0, 80.0),
            SwingPhase::Impact => (80.0, 85.0),
            SwingPhase::FollowThrough => (85.0, 100.0),
        }
    }

    pub fn is_one_of(&self, phases: &[SwingPhase]) -> bool {
        phases.contains(self)
    }
}

impl std::fmt::Display for SwingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
