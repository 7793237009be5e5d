use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::models::{LandmarkName, LandmarkPoint, Landmarks};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// One frame as delivered by the pose estimator. `landmarks` is `None` when
/// no body was found in the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSample {
    pub index: usize,
    pub landmarks: Option<Landmarks>,
}

/// Ordered stream of pose samples for one recorded swing.
pub trait FrameSource: Send {
    /// Frame count declared by the source, if it knows it up front.
    fn total_frames(&self) -> Option<usize>;

    /// Next sample in source order; `Ok(None)` at end of stream.
    fn next_sample(&mut self) -> Result<Option<PoseSample>>;
}

/// Samples held in memory.
pub struct MemoryFrameSource {
    samples: VecDeque<PoseSample>,
    total_frames: Option<usize>,
}

impl MemoryFrameSource {
    pub fn new(samples: Vec<PoseSample>) -> Self {
        let total = samples.len();
        Self {
            samples: samples.into(),
            total_frames: Some(total),
        }
    }

    /// A source that does not declare its length.
    pub fn undeclared(samples: Vec<PoseSample>) -> Self {
        Self {
            samples: samples.into(),
            total_frames: None,
        }
    }

    /// Overrides the declared total, e.g. to mimic stale container metadata.
    pub fn with_declared_total(mut self, total_frames: usize) -> Self {
        self.total_frames = Some(total_frames);
        self
    }

    /// Builds samples with contiguous indices from per-frame landmarks.
    pub fn from_frames(frames: Vec<Option<Landmarks>>) -> Self {
        Self::new(
            frames
                .into_iter()
                .enumerate()
                .map(|(index, landmarks)| PoseSample { index, landmarks })
                .collect(),
        )
    }
}

impl FrameSource for MemoryFrameSource {
    fn total_frames(&self) -> Option<usize> {
        self.total_frames
    }

    fn next_sample(&mut self) -> Result<Option<PoseSample>> {
        Ok(self.samples.pop_front())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Header {
    total_frames: usize,
}

#[derive(Debug, Deserialize)]
struct SampleLine {
    frame: usize,
    #[serde(default)]
    landmarks: Option<BTreeMap<String, LandmarkPoint>>,
}

/// Line-delimited JSON export of a pose estimator run.
///
/// An optional first line `{"totalFrames": N}` declares the frame count.
/// Every other non-blank line is `{"frame": i, "landmarks": {...} | null}`
/// with landmarks keyed by snake_case body-point name. Points the detectors
/// do not use are ignored. A line that does not parse is read as a frame
/// without a body.
pub struct JsonlFrameSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    total_frames: Option<usize>,
    pending: Option<String>,
    line_number: usize,
    frames_read: usize,
}

impl JsonlFrameSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("failed to open pose file {}", path.display()))?;
        let mut source = Self {
            path,
            lines: BufReader::new(file).lines(),
            total_frames: None,
            pending: None,
            line_number: 0,
            frames_read: 0,
        };
        source.read_header()?;
        Ok(source)
    }

    fn read_header(&mut self) -> Result<()> {
        let Some(first) = self.next_line()? else {
            return Ok(());
        };
        match serde_json::from_str::<Header>(&first) {
            Ok(header) => self.total_frames = Some(header.total_frames),
            Err(_) => self.pending = Some(first),
        }
        Ok(())
    }

    /// Next non-blank line, trimmed.
    fn next_line(&mut self) -> Result<Option<String>> {
        for line in self.lines.by_ref() {
            self.line_number += 1;
            let line = line.with_context(|| {
                format!(
                    "failed to read line {} of {}",
                    self.line_number,
                    self.path.display()
                )
            })?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        Ok(None)
    }

    fn parse_sample(&self, line: &str) -> PoseSample {
        match serde_json::from_str::<SampleLine>(line) {
            Ok(sample) => PoseSample {
                index: sample.frame,
                landmarks: sample.landmarks.map(known_landmarks),
            },
            Err(err) => {
                log_warn!(
                    "{}:{}: unreadable frame, counting it as no body: {}",
                    self.path.display(),
                    self.line_number,
                    err
                );
                PoseSample {
                    index: self.frames_read,
                    landmarks: None,
                }
            }
        }
    }
}

fn known_landmarks(raw: BTreeMap<String, LandmarkPoint>) -> Landmarks {
    raw.into_iter()
        .filter_map(|(name, point)| match LandmarkName::parse(&name) {
            Some(known) => Some((known, point)),
            None => {
                log_debug!("ignoring landmark {}", name);
                None
            }
        })
        .collect()
}

impl FrameSource for JsonlFrameSource {
    fn total_frames(&self) -> Option<usize> {
        self.total_frames
    }

    fn next_sample(&mut self) -> Result<Option<PoseSample>> {
        let line = match self.pending.take() {
            Some(line) => line,
            None => match self.next_line()? {
                Some(line) => line,
                None => return Ok(None),
            },
        };
        let sample = self.parse_sample(&line);
        self.frames_read += 1;
        Ok(Some(sample))
    }
}
