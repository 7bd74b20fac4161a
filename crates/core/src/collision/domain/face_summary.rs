use crate::collision::domain::collision_thresholds::CollisionThresholds;
use crate::detection::domain::face_landmarks::{FaceObservation, LandmarkPoint};
use crate::shared::bounding_box::BoundingBox;

/// Per-frame statistics of one face, as consumed by the collision gates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceSummary {
    /// Dilated hitbox in pixels, clamped to the frame.
    pub hitbox: BoundingBox,
    /// Mean landmark position in normalized coordinates.
    pub centroid: LandmarkPoint,
}

impl FaceSummary {
    pub fn new(hitbox: BoundingBox, centroid: LandmarkPoint) -> Self {
        Self { hitbox, centroid }
    }

    /// Summarizes one observation. Returns `None` for an empty landmark set.
    ///
    /// The tight pixel-space landmark box is padded, scaled by the hitbox
    /// factor about its own center, then clamped to the frame.
    pub fn from_observation(
        face: &FaceObservation,
        frame_w: u32,
        frame_h: u32,
        thresholds: &CollisionThresholds,
    ) -> Option<Self> {
        let tight = BoundingBox::enclosing(face.pixel_points(frame_w, frame_h))?;
        let centroid = face.centroid()?;
        let hitbox = tight
            .padded(thresholds.box_padding)
            .scaled(thresholds.hitbox_scale)
            .clamped(frame_w, frame_h);
        Some(Self { hitbox, centroid })
    }

    pub fn mean_depth(&self) -> f64 {
        self.centroid.z
    }

    pub fn area(&self) -> f64 {
        self.hitbox.area()
    }
}
