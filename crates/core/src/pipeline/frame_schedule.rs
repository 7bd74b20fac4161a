/// Which frames are handed to the face-mesh detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FrameSchedule {
    /// Evaluate every frame the source delivers.
    #[default]
    EveryFrame,
    /// Evaluate frames `0, n, 2n, ...`; used when the source is faster
    /// than detection can keep up with. `n == 0` behaves like `1`.
    EveryNth(usize),
}

impl FrameSchedule {
    pub fn selects(&self, frame_index: usize) -> bool {
        match *self {
            FrameSchedule::EveryFrame => true,
            FrameSchedule::EveryNth(n) => frame_index % n.max(1) == 0,
        }
    }

    /// Builds a schedule from a CLI-style interval, where 1 means every frame.
    pub fn from_interval(n: usize) -> Self {
        if n <= 1 {
            FrameSchedule::EveryFrame
        } else {
            FrameSchedule::EveryNth(n)
        }
    }
}
