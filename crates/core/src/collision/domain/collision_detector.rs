use crate::collision::domain::collision_classifier::CollisionClassifier;
use crate::collision::domain::collision_thresholds::CollisionThresholds;
use crate::collision::domain::confirmation_debouncer::ConfirmationDebouncer;
use crate::collision::domain::face_summary::FaceSummary;
use crate::collision::domain::frame_verdict::FrameVerdict;
use crate::detection::domain::face_landmarks::FaceObservation;
use crate::pose::domain::head_pose_tracker::HeadPoseTracker;
use crate::pose::domain::pose_thresholds::PoseThresholds;

/// Per-session collision detector.
///
/// Owns all mutable session state (overlap streak, previous confirmed
/// flag, episode count, last pose per face). Call [`process`](Self::process) once per frame,
/// in order; it is not reentrant and must not be shared between sessions.
pub struct CollisionDetector {
    classifier: CollisionClassifier,
    debouncer: ConfirmationDebouncer,
    poses: HeadPoseTracker,
    episodes: usize,
    last_timestamp: Option<f64>,
}

impl CollisionDetector {
    pub fn new(thresholds: CollisionThresholds) -> Self {
        let debouncer = ConfirmationDebouncer::new(thresholds.confirm_frames);
        Self {
            classifier: CollisionClassifier::new(thresholds),
            debouncer,
            poses: HeadPoseTracker::default(),
            episodes: 0,
            last_timestamp: None,
        }
    }

    pub fn with_pose_thresholds(mut self, thresholds: PoseThresholds) -> Self {
        self.poses = HeadPoseTracker::new(thresholds);
        self
    }

    pub fn thresholds(&self) -> &CollisionThresholds {
        self.classifier.thresholds()
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn streak(&self) -> u32 {
        self.debouncer.streak()
    }

    /// Classifies one frame and advances the debounce state.
    ///
    /// Never fails: empty observations, fewer than two faces, and
    /// degenerate geometry all produce a non-collision frame.
    pub fn process(
        &mut self,
        faces: &[FaceObservation],
        frame_w: u32,
        frame_h: u32,
        timestamp: f64,
    ) -> FrameVerdict {
        if let Some(last) = self.last_timestamp {
            if timestamp < last {
                log::warn!("Frame timestamp went backwards ({last:.3} -> {timestamp:.3})");
            }
        }
        self.last_timestamp = Some(timestamp);

        let thresholds = self.classifier.thresholds();
        let summaries: Vec<FaceSummary> = faces
            .iter()
            .filter_map(|f| FaceSummary::from_observation(f, frame_w, frame_h, thresholds))
            .collect();

        let classification = self.classifier.classify(&summaries, frame_w, frame_h);
        let state = self.debouncer.observe(classification.collision_now);
        let poses = self.poses.update(faces, frame_w, frame_h, timestamp);
        if state.rising_edge {
            self.episodes += 1;
        }

        let verdict = FrameVerdict {
            timestamp,
            collision_now: classification.collision_now,
            confirmed: state.confirmed,
            rising_edge: state.rising_edge,
            streak: state.streak,
            episodes: self.episodes,
            metrics: classification.metrics,
            faces: summaries,
            poses,
        };
        log::debug!("{verdict}");
        verdict
    }

    /// Clears all session state for a new session.
    pub fn reset(&mut self) {
        self.debouncer.reset();
        self.poses.reset();
        self.episodes = 0;
        self.last_timestamp = None;
    }
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new(CollisionThresholds::default())
    }
}
