//! Face-mesh landmarks in normalized image coordinates.
//!
//! A face mesh model reports a fixed, ordered set of points per face
//! (index 1 is the nose tip, and so on). The collision heuristic only uses
//! aggregate statistics, so no per-index semantics are modelled here.

use serde::{Deserialize, Serialize};

/// One landmark: x/y in `[0, 1]` relative to frame width/height, z a
/// small unitless depth estimate on the model's own scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_pixels(&self, frame_w: u32, frame_h: u32) -> (f64, f64) {
        (self.x * frame_w as f64, self.y * frame_h as f64)
    }
}

impl From<[f64; 3]> for LandmarkPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<LandmarkPoint> for [f64; 3] {
    fn from(p: LandmarkPoint) -> Self {
        [p.x, p.y, p.z]
    }
}

/// All landmarks of one detected face in one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceObservation {
    points: Vec<LandmarkPoint>,
}

impl FaceObservation {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Landmark positions in pixel space.
    pub fn pixel_points(
        &self,
        frame_w: u32,
        frame_h: u32,
    ) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(move |p| p.to_pixels(frame_w, frame_h))
    }

    /// Mean of all landmarks, in normalized coordinates. `None` when empty.
    pub fn centroid(&self) -> Option<LandmarkPoint> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy, sz) = self
            .points
            .iter()
            .fold((0.0, 0.0, 0.0), |(sx, sy, sz), p| (sx + p.x, sy + p.y, sz + p.z));
        Some(LandmarkPoint::new(sx / n, sy / n, sz / n))
    }

    /// Mean depth across all landmarks. `None` when empty.
    pub fn mean_depth(&self) -> Option<f64> {
        self.centroid().map(|c| c.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_face() -> FaceObservation {
        FaceObservation::new(vec![
            LandmarkPoint::new(0.1, 0.2, -0.01),
            LandmarkPoint::new(0.3, 0.2, -0.02),
            LandmarkPoint::new(0.3, 0.4, -0.03),
            LandmarkPoint::new(0.1, 0.4, -0.02),
        ])
    }

    #[test]
    fn test_centroid_is_mean_of_points() {
        let c = square_face().centroid().unwrap();
        assert_relative_eq!(c.x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.3, epsilon = 1e-12);
        assert_relative_eq!(c.z, -0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_depth_matches_centroid_z() {
        assert_relative_eq!(square_face().mean_depth().unwrap(), -0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_observation_has_no_statistics() {
        let face = FaceObservation::default();
        assert!(face.is_empty());
        assert!(face.centroid().is_none());
        assert!(face.mean_depth().is_none());
    }

    #[test]
    fn test_pixel_points_scale_by_frame_size() {
        let face = FaceObservation::new(vec![LandmarkPoint::new(0.5, 0.25, 0.0)]);
        let pts: Vec<_> = face.pixel_points(640, 480).collect();
        assert_eq!(pts, vec![(320.0, 120.0)]);
    }

    #[test]
    fn test_deserializes_from_nested_arrays() {
        let face: FaceObservation =
            serde_json::from_str("[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]").unwrap();
        assert_eq!(face.len(), 2);
        assert_eq!(face.points()[1], LandmarkPoint::new(0.4, 0.5, 0.6));
    }

    #[test]
    fn test_serializes_as_nested_arrays() {
        let face = FaceObservation::new(vec![LandmarkPoint::new(0.5, 0.25, 0.0)]);
        assert_eq!(serde_json::to_string(&face).unwrap(), "[[0.5,0.25,0.0]]");
    }
}
