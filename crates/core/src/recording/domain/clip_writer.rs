use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

/// Everything needed to persist one collision clip.
#[derive(Clone, Debug)]
pub struct ClipRequest {
    /// Episode number this clip belongs to.
    pub episode: usize,
    /// Wall-clock time of the episode, used to name the clip.
    pub captured_at: DateTime<Local>,
    /// Pre-event frames, oldest first.
    pub frames: Vec<Frame>,
    pub metadata: StreamMetadata,
}

impl ClipRequest {
    /// `collision_<YYYYmmdd_HHMMSS>`.
    pub fn clip_name(&self) -> String {
        format!("collision_{}", self.captured_at.format("%Y%m%d_%H%M%S"))
    }
}

/// Persists collision clips. Runs on the recorder's worker thread.
pub trait ClipWriter: Send {
    /// Writes the clip and returns where it was stored.
    fn write_clip(
        &mut self,
        request: &ClipRequest,
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>>;
}
