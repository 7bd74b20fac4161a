use std::fmt;

use crate::collision::domain::collision_classifier::PairMetrics;
use crate::collision::domain::face_summary::FaceSummary;
use crate::pose::domain::head_pose_tracker::FaceMotion;

/// Everything the detector concluded about one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameVerdict {
    pub timestamp: f64,
    pub collision_now: bool,
    pub confirmed: bool,
    pub rising_edge: bool,
    pub streak: u32,
    /// Episodes confirmed so far in this session, including this frame's.
    pub episodes: usize,
    pub metrics: Option<PairMetrics>,
    pub faces: Vec<FaceSummary>,
    /// Head pose of every face with a full mesh.
    pub poses: Vec<FaceMotion>,
}

impl FrameVerdict {
    /// The episode that started on this frame, if any.
    pub fn episode(&self) -> Option<CollisionEpisode> {
        self.rising_edge.then(|| CollisionEpisode {
            number: self.episodes,
            timestamp: self.timestamp,
            metrics: self.metrics,
        })
    }

    /// Rotation and translation alerts raised on this frame.
    pub fn pose_alerts(&self) -> Vec<String> {
        self.poses.iter().flat_map(FaceMotion::alerts).collect()
    }

    pub fn status_text(&self) -> &'static str {
        if self.collision_now {
            "Collision: YES"
        } else {
            "Collision: NO"
        }
    }

    pub fn counter_text(&self) -> String {
        format!("Collisions: {}", self.episodes)
    }

    /// One-line metrics readout for the on-screen overlay and debug logs.
    pub fn debug_text(&self) -> String {
        match &self.metrics {
            Some(m) => format!(
                "faces={} iou={:.3} dz={:.1} d2={:.1} d3={:.1} size={:.2} streak={}",
                self.faces.len(),
                m.iou,
                m.depth_diff,
                m.distance_2d,
                m.distance_3d,
                m.size_ratio,
                self.streak
            ),
            None => format!("faces={} streak={}", self.faces.len(), self.streak),
        }
    }
}

impl fmt::Display for FrameVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.3} {} | {} | {}",
            self.timestamp,
            self.status_text(),
            self.counter_text(),
            self.debug_text()
        )?;
        for alert in self.pose_alerts() {
            write!(f, " | {alert}")?;
        }
        if self.rising_edge {
            write!(f, " | EPISODE STARTED")?;
        }
        Ok(())
    }
}

/// A confirmed collision, reported once when it begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionEpisode {
    /// 1-based count of episodes in the session.
    pub number: usize,
    pub timestamp: f64,
    pub metrics: Option<PairMetrics>,
}
