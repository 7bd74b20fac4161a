use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Sender, TrySendError};

use crate::recording::domain::clip_recorder::{ClipRecorder, TriggerOutcome};
use crate::recording::domain::clip_writer::{ClipRequest, ClipWriter};

/// Saves clips on a dedicated worker thread.
///
/// At most one save is in flight. Triggers that arrive while one is pending
/// are coalesced into it, so a burst of episodes produces a single export.
pub struct BackgroundClipRecorder {
    sender: Option<Sender<ClipRequest>>,
    pending: Arc<AtomicBool>,
    handle: Option<JoinHandle<Vec<PathBuf>>>,
}

impl BackgroundClipRecorder {
    pub fn new(writer: Box<dyn ClipWriter>) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded::<ClipRequest>(1);
        let pending = Arc::new(AtomicBool::new(false));
        let handle = spawn_worker(writer, receiver, pending.clone());
        Self {
            sender: Some(sender),
            pending,
            handle: Some(handle),
        }
    }

    /// Fire-and-forget. Never blocks the caller.
    pub fn trigger(&self, request: ClipRequest) -> TriggerOutcome {
        let Some(sender) = &self.sender else {
            return TriggerOutcome::Unavailable;
        };
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Clip save already pending, coalescing episode #{}", request.episode);
            return TriggerOutcome::Coalesced;
        }
        match sender.try_send(request) {
            Ok(()) => TriggerOutcome::Queued,
            Err(TrySendError::Full(request)) => {
                // Worker has not picked up the previous request yet.
                log::debug!("Clip queue full, coalescing episode #{}", request.episode);
                TriggerOutcome::Coalesced
            }
            Err(TrySendError::Disconnected(request)) => {
                self.pending.store(false, Ordering::Release);
                log::error!("Clip recorder is not running, dropping episode #{}", request.episode);
                TriggerOutcome::Unavailable
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Lets the worker finish whatever is queued, then joins it.
    /// Returns the locations of every clip written during the session.
    pub fn shutdown(&mut self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        self.sender.take();
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| "Clip recorder thread panicked".into()),
            None => Ok(Vec::new()),
        }
    }
}

impl ClipRecorder for BackgroundClipRecorder {
    fn trigger(&mut self, request: ClipRequest) -> TriggerOutcome {
        BackgroundClipRecorder::trigger(self, request)
    }

    fn finish(&mut self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        self.shutdown()
    }
}

impl Drop for BackgroundClipRecorder {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn spawn_worker(
    mut writer: Box<dyn ClipWriter>,
    receiver: crossbeam_channel::Receiver<ClipRequest>,
    pending: Arc<AtomicBool>,
) -> JoinHandle<Vec<PathBuf>> {
    std::thread::spawn(move || {
        let mut saved = Vec::new();
        for request in receiver {
            match writer.write_clip(&request) {
                Ok(path) => saved.push(path),
                Err(e) => log::error!("Failed to save clip for episode #{}: {e}", request.episode),
            }
            pending.store(false, Ordering::Release);
        }
        saved
    })
}
