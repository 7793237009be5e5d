//! Pose landmark data model.
//!
//! Landmarks are produced by an external pose estimator and consumed here as
//! normalized frame coordinates: `x` grows to the right, `y` grows downward,
//! both in `[0, 1]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The closed set of body points the fault detectors read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftAnkle,
    RightAnkle,
}

impl LandmarkName {
    pub const ALL: [LandmarkName; 11] = [
        LandmarkName::Nose,
        LandmarkName::LeftShoulder,
        LandmarkName::RightShoulder,
        LandmarkName::LeftElbow,
        LandmarkName::RightElbow,
        LandmarkName::LeftWrist,
        LandmarkName::RightWrist,
        LandmarkName::LeftHip,
        LandmarkName::RightHip,
        LandmarkName::LeftAnkle,
        LandmarkName::RightAnkle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LandmarkName::Nose => "nose",
            LandmarkName::LeftShoulder => "left_shoulder",
            LandmarkName::RightShoulder => "right_shoulder",
            LandmarkName::LeftElbow => "left_elbow",
            LandmarkName::RightElbow => "right_elbow",
            LandmarkName::LeftWrist => "left_wrist",
            LandmarkName::RightWrist => "right_wrist",
            LandmarkName::LeftHip => "left_hip",
            LandmarkName::RightHip => "right_hip",
            LandmarkName::LeftAnkle => "left_ankle",
            LandmarkName::RightAnkle => "right_ankle",
        }
    }

    /// Looks up a name as written by the pose estimator export.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|known| known.as_str() == name)
    }
}

impl std::fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the body trails the target. A right-handed golfer's trail
/// side is the right side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    Left,
    #[default]
    Right,
}

impl BodySide {
    pub fn shoulder(&self) -> LandmarkName {
        match self {
            BodySide::Left => LandmarkName::LeftShoulder,
            BodySide::Right => LandmarkName::RightShoulder,
        }
    }

    pub fn elbow(&self) -> LandmarkName {
        match self {
            BodySide::Left => LandmarkName::LeftElbow,
            BodySide::Right => LandmarkName::RightElbow,
        }
    }

    pub fn wrist(&self) -> LandmarkName {
        match self {
            BodySide::Left => LandmarkName::LeftWrist,
            BodySide::Right => LandmarkName::RightWrist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default = "full_visibility")]
    pub visibility: f64,
}

fn full_visibility() -> f64 {
    1.0
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: 1.0,
        }
    }
}

/// Named points for one frame, as delivered by the pose estimator.
pub type Landmarks = BTreeMap<LandmarkName, LandmarkPoint>;

/// Fraction of the session elapsed at `index`. Frames past a zero or
/// undersized total land at or beyond 1.0.
pub fn frame_progress(index: usize, total_frames: usize) -> f64 {
    if total_frames == 0 {
        1.0
    } else {
        index as f64 / total_frames as f64
    }
}

/// One frame with a detected body, tagged with its position in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkFrame {
    pub index: usize,
    /// `index / total_frames`, in `[0, 1)` for frames inside the declared total.
    pub progress: f64,
    pub landmarks: Landmarks,
}

impl LandmarkFrame {
    pub fn new(index: usize, total_frames: usize, landmarks: Landmarks) -> Self {
        Self {
            index,
            progress: frame_progress(index, total_frames),
            landmarks,
        }
    }

    pub fn point(&self, name: LandmarkName) -> Option<&LandmarkPoint> {
        self.landmarks.get(&name)
    }
}
