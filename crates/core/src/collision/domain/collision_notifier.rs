use crate::collision::domain::frame_verdict::CollisionEpisode;

/// Receives one call per confirmed collision episode.
///
/// Called synchronously from frame processing, so implementations must
/// return quickly and hand any slow work off elsewhere.
pub trait CollisionNotifier: Send {
    fn episode_started(&mut self, episode: &CollisionEpisode);
}
