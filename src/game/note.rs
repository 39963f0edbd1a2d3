use super::Judgment;

/// Resolution state of a live note. Judgments are write-once: a resolved
/// note is never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Pending,
    Resolved {
        judgment: Judgment,
        /// Elapsed time at which the note was resolved, in ms.
        resolved_at_ms: u64,
    },
}

impl NoteState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// A note currently in the live set.
#[derive(Debug, Clone, Copy)]
pub struct BeatNote {
    /// Index into the track beatmap.
    pub index: usize,
    /// Target tap time in ms, track offset already applied.
    pub target_time_ms: f64,
    pub state: NoteState,
    /// Direction the note approaches from, in degrees. Assigned at spawn
    /// so clustered notes can share a direction.
    pub spawn_angle_deg: f32,
}

impl BeatNote {
    pub fn new(index: usize, target_time_ms: f64, spawn_angle_deg: f32) -> Self {
        Self {
            index,
            target_time_ms,
            state: NoteState::Pending,
            spawn_angle_deg,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn judgment(&self) -> Option<Judgment> {
        match self.state {
            NoteState::Pending => None,
            NoteState::Resolved { judgment, .. } => Some(judgment),
        }
    }

    /// Resolve the note. Returns false (and changes nothing) if it was
    /// already resolved.
    pub fn resolve(&mut self, judgment: Judgment, elapsed_ms: f64) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = NoteState::Resolved {
            judgment,
            resolved_at_ms: elapsed_ms.max(0.0) as u64,
        };
        true
    }
}
