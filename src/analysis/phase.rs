use crate::models::SwingPhase;

/// Phase for a frame at `progress_percent` of the session.
///
/// Ranges are closed at the start and open at the end; anything past the
/// last range (including exactly 100) is follow-through.
pub fn classify_phase(progress_percent: f64) -> SwingPhase {
    SwingPhase::ALL
        .iter()
        .copied()
        .find(|phase| {
            let (start, end) = phase.progress_range();
            start <= progress_percent && progress_percent < end
        })
        .unwrap_or(SwingPhase::FollowThrough)
}
