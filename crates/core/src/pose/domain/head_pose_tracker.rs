use crate::detection::domain::face_landmarks::FaceObservation;
use crate::pose::domain::head_pose::{HeadPose, HeadTurn};
use crate::pose::domain::pnp_solver::PnpSolver;
use crate::pose::domain::pose_thresholds::PoseThresholds;

const MIN_INTERVAL_SECS: f64 = 1e-6;

/// Pose and motion of one face in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceMotion {
    /// Position of the face in the frame's observation list.
    pub face_index: usize,
    pub pose: HeadPose,
    /// Fastest per-axis rotation since this face's previous pose, deg/s.
    pub angular_velocity: Option<f64>,
    pub translation_velocity: Option<f64>,
    pub turn: HeadTurn,
    pub high_rotation: bool,
    pub large_translation: bool,
}

impl FaceMotion {
    pub fn has_alert(&self) -> bool {
        self.high_rotation || self.large_translation
    }

    pub fn alerts(&self) -> Vec<String> {
        let mut alerts = Vec::new();
        if self.high_rotation {
            alerts.push(format!("ALERT F{}: HIGH ROTATION", self.face_index));
        }
        if self.large_translation {
            alerts.push(format!("ALERT F{}: LARGE TRANS", self.face_index));
        }
        alerts
    }

    pub fn pose_text(&self) -> String {
        format!(
            "F{} P:{:+.0} Y:{:+.0} R:{:+.0}",
            self.face_index, self.pose.pitch, self.pose.yaw, self.pose.roll
        )
    }
}

/// Tracks head pose per face slot across frames.
///
/// Faces are matched by their position in the observation list, the way
/// the face-mesh model orders them. A face without a full mesh, or whose
/// pose cannot be solved, keeps its previous pose for the next frame.
pub struct HeadPoseTracker {
    thresholds: PoseThresholds,
    previous: Vec<Option<(f64, HeadPose)>>,
}

impl HeadPoseTracker {
    pub fn new(thresholds: PoseThresholds) -> Self {
        Self {
            thresholds,
            previous: Vec::new(),
        }
    }

    pub fn update(
        &mut self,
        faces: &[FaceObservation],
        frame_w: u32,
        frame_h: u32,
        timestamp: f64,
    ) -> Vec<FaceMotion> {
        if self.previous.len() < faces.len() {
            self.previous.resize(faces.len(), None);
        }
        let solver = PnpSolver::new(frame_w, frame_h);
        let mut motions = Vec::new();

        for (face_index, face) in faces.iter().enumerate() {
            let Some(points) = PnpSolver::image_points(face, frame_w, frame_h) else {
                continue;
            };
            let Some(pose) = solver.solve(&points) else {
                log::debug!("No head pose for face {face_index} at t={timestamp:.3}");
                continue;
            };

            let (angular_velocity, translation_velocity) = match self.previous[face_index] {
                Some((then, earlier)) if timestamp - then > MIN_INTERVAL_SECS => {
                    let dt = timestamp - then;
                    (
                        Some(pose.max_angle_change(&earlier) / dt),
                        Some(pose.distance_moved(&earlier) / dt),
                    )
                }
                _ => (None, None),
            };
            self.previous[face_index] = Some((timestamp, pose));

            let t = &self.thresholds;
            let motion = FaceMotion {
                face_index,
                pose,
                angular_velocity,
                translation_velocity,
                turn: HeadTurn::from_yaw(pose.yaw, t.yaw_side_threshold),
                high_rotation: angular_velocity.is_some_and(|v| v > t.angular_velocity_max),
                large_translation: translation_velocity
                    .is_some_and(|v| v > t.translation_velocity_max),
            };
            if motion.has_alert() {
                log::debug!("{} at t={timestamp:.3}", motion.alerts().join(", "));
            }
            motions.push(motion);
        }
        motions
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }
}

impl Default for HeadPoseTracker {
    fn default() -> Self {
        Self::new(PoseThresholds::default())
    }
}
