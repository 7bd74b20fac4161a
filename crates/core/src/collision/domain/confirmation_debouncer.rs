/// Debounced state after one observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceState {
    pub streak: u32,
    pub confirmed: bool,
    /// True only on the observation where `confirmed` went false -> true.
    pub rising_edge: bool,
}

/// Turns a per-frame boolean into a stable "confirmed" signal.
///
/// `confirmed` is recomputed every frame from the streak, never stored on
/// its own, so a single negative frame always clears it.
pub struct ConfirmationDebouncer {
    confirm_frames: u32,
    streak: u32,
    previous_confirmed: bool,
}

impl ConfirmationDebouncer {
    /// `confirm_frames` of 0 is treated as 1.
    pub fn new(confirm_frames: u32) -> Self {
        Self {
            confirm_frames: confirm_frames.max(1),
            streak: 0,
            previous_confirmed: false,
        }
    }

    pub fn observe(&mut self, positive: bool) -> DebounceState {
        self.streak = if positive {
            self.streak.saturating_add(1)
        } else {
            0
        };
        let confirmed = self.streak >= self.confirm_frames;
        let rising_edge = confirmed && !self.previous_confirmed;
        self.previous_confirmed = confirmed;
        DebounceState {
            streak: self.streak,
            confirmed,
            rising_edge,
        }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn confirm_frames(&self) -> u32 {
        self.confirm_frames
    }

    pub fn reset(&mut self) {
        self.streak = 0;
        self.previous_confirmed = false;
    }
}
