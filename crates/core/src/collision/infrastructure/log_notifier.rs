use crate::collision::domain::collision_notifier::CollisionNotifier;
use crate::collision::domain::frame_verdict::CollisionEpisode;

/// Reports episodes through the `log` crate at warn level.
pub struct LogNotifier {
    label: String,
}

impl LogNotifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn message(&self, episode: &CollisionEpisode) -> String {
        let mut msg = format!(
            "{}: collision #{} at {:.2}s",
            self.label, episode.number, episode.timestamp
        );
        if let Some(m) = &episode.metrics {
            msg.push_str(&format!(
                " (iou {:.2}, depth diff {:.1}, 3D distance {:.1}, size ratio {:.2})",
                m.iou, m.depth_diff, m.distance_3d, m.size_ratio
            ));
        }
        msg
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new("Collision detector")
    }
}

impl CollisionNotifier for LogNotifier {
    fn episode_started(&mut self, episode: &CollisionEpisode) {
        log::warn!("{}", self.message(episode));
    }
}
