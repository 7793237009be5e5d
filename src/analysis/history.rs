use crate::models::LandmarkFrame;

/// Every frame with a detected body seen so far in the session, in arrival order.
///
/// Append-only. Window reads return fewer frames than asked for while the
/// session is young; detectors treat that as insufficient history.
#[derive(Debug, Default, Clone)]
pub struct HistoryBuffer {
    frames: Vec<LandmarkFrame>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn append(&mut self, frame: LandmarkFrame) {
        self.frames.push(frame);
    }

    pub fn all(&self) -> &[LandmarkFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn latest(&self) -> Option<&LandmarkFrame> {
        self.frames.last()
    }

    /// The oldest `k` frames (fewer if the buffer is shorter).
    pub fn first_k(&self, k: usize) -> &[LandmarkFrame] {
        &self.frames[..k.min(self.frames.len())]
    }

    /// The newest `k` frames in chronological order (fewer if the buffer is shorter).
    pub fn last_k(&self, k: usize) -> &[LandmarkFrame] {
        let start = self.frames.len().saturating_sub(k);
        &self.frames[start..]
    }
}
