use crate::detection::domain::face_landmarks::FaceObservation;
use crate::shared::frame::Frame;

/// Domain interface for per-frame face-mesh landmark detection.
///
/// Implementations may be stateful (e.g., tracking across frames or
/// replaying a recording), hence `&mut self`.
pub trait FaceMeshDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceObservation>, Box<dyn std::error::Error>>;
}
