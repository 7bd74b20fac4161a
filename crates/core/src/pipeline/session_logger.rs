use std::time::Instant;

use crate::collision::domain::frame_verdict::CollisionEpisode;
use crate::pipeline::monitor_collisions_use_case::SessionSummary;

/// Cross-cutting logger for monitoring-session events.
///
/// Keeps the use case independent of how progress is surfaced (CLI log
/// lines, tests, or nothing at all).
pub trait SessionLogger: Send {
    /// Report frame-level progress. `total` is 0 for open-ended sources.
    fn progress(&mut self, current: usize, total: usize);

    /// A confirmed episode started.
    fn episode(&mut self, episode: &CollisionEpisode);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self, _summary: &SessionSummary) {}
}

/// Silent logger that discards all events.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn episode(&mut self, _episode: &CollisionEpisode) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger backed by the `log` crate.
///
/// Progress output is throttled to every `throttle_frames` frames.
pub struct LogSessionLogger {
    throttle_frames: usize,
    start_time: Instant,
    episode_times: Vec<f64>,
}

impl LogSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            start_time: Instant::now(),
            episode_times: Vec::new(),
        }
    }

    pub fn summary_string(&self, summary: &SessionSummary) -> String {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![
            format!(
                "Session summary ({} frames, {elapsed:.1}s wall time):",
                summary.frames_read
            ),
            format!("  evaluated     : {}", summary.frames_evaluated),
            format!("  collision now : {}", summary.collision_frames),
            format!("  episodes      : {}", summary.episodes),
            format!(
                "  clips         : {} queued, {} coalesced, {} saved",
                summary.clips_queued,
                summary.clips_coalesced,
                summary.clips_saved.len()
            ),
        ];
        if !self.episode_times.is_empty() {
            let times: Vec<String> =
                self.episode_times.iter().map(|t| format!("{t:.2}s")).collect();
            lines.push(format!("  episode starts: {}", times.join(", ")));
        }
        if summary.cancelled {
            lines.push("  (cancelled before end of stream)".to_string());
        }
        lines.join("\n")
    }
}

impl Default for LogSessionLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl SessionLogger for LogSessionLogger {
    fn progress(&mut self, current: usize, total: usize) {
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Monitoring: {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Monitoring: {current} frames");
        }
    }

    fn episode(&mut self, episode: &CollisionEpisode) {
        self.episode_times.push(episode.timestamp);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self, summary: &SessionSummary) {
        log::info!("\n\n{}", self.summary_string(summary));
    }
}
