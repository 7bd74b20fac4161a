use std::path::PathBuf;

use crate::recording::domain::clip_writer::ClipRequest;

/// What happened to a [`ClipRecorder::trigger`] request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Handed to the recorder.
    Queued,
    /// A save was already in flight; this request was dropped.
    Coalesced,
    /// The recorder is no longer running.
    Unavailable,
}

/// Receives "episode started" clip requests from the frame loop.
///
/// `trigger` must return immediately; saving happens elsewhere.
pub trait ClipRecorder: Send {
    fn trigger(&mut self, request: ClipRequest) -> TriggerOutcome;

    /// Waits for outstanding saves and returns every clip location written.
    fn finish(&mut self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>;
}
