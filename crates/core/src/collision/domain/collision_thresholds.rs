use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_BOX_PADDING, DEFAULT_CLOSE_2D_FACTOR, DEFAULT_CONFIRM_FRAMES,
    DEFAULT_DEPTH_DIFF_MAX, DEFAULT_DEPTH_SCALE_FACTOR, DEFAULT_DIST_3D_MAX,
    DEFAULT_HITBOX_SCALE, DEFAULT_IOU_THRESHOLD, DEFAULT_SIZE_RATIO_THRESHOLD,
};

/// Tuning for the collision heuristic.
///
/// Distances are in pixels. Depth differences are converted to the same
/// scale by `depth_scale_factor` before comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionThresholds {
    pub hitbox_scale: f64,
    pub box_padding: f64,
    pub iou_threshold: f64,
    pub depth_scale_factor: f64,
    pub depth_diff_max: f64,
    pub dist_3d_max: f64,
    /// Smaller-over-larger hitbox area must exceed this.
    pub size_ratio_threshold: f64,
    pub close_2d_factor: f64,
    pub confirm_frames: u32,
}

impl Default for CollisionThresholds {
    fn default() -> Self {
        Self {
            hitbox_scale: DEFAULT_HITBOX_SCALE,
            box_padding: DEFAULT_BOX_PADDING,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            depth_scale_factor: DEFAULT_DEPTH_SCALE_FACTOR,
            depth_diff_max: DEFAULT_DEPTH_DIFF_MAX,
            dist_3d_max: DEFAULT_DIST_3D_MAX,
            size_ratio_threshold: DEFAULT_SIZE_RATIO_THRESHOLD,
            close_2d_factor: DEFAULT_CLOSE_2D_FACTOR,
            confirm_frames: DEFAULT_CONFIRM_FRAMES,
        }
    }
}

impl CollisionThresholds {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.hitbox_scale.is_finite() && self.hitbox_scale > 1.0) {
            return Err(format!(
                "hitbox_scale must be greater than 1.0, got {}",
                self.hitbox_scale
            ));
        }
        let non_negative = [
            ("box_padding", self.box_padding),
            ("iou_threshold", self.iou_threshold),
            ("depth_scale_factor", self.depth_scale_factor),
            ("depth_diff_max", self.depth_diff_max),
            ("dist_3d_max", self.dist_3d_max),
            ("size_ratio_threshold", self.size_ratio_threshold),
            ("close_2d_factor", self.close_2d_factor),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if self.iou_threshold > 1.0 {
            return Err(format!(
                "iou_threshold must be between 0.0 and 1.0, got {}",
                self.iou_threshold
            ));
        }
        if self.confirm_frames == 0 {
            return Err("confirm_frames must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let t = CollisionThresholds::default();
        assert_relative_eq!(t.hitbox_scale, 1.2);
        assert_relative_eq!(t.iou_threshold, 0.05);
        assert_relative_eq!(t.depth_diff_max, 30.0);
        assert_relative_eq!(t.dist_3d_max, 150.0);
        assert_relative_eq!(t.size_ratio_threshold, 0.8);
        assert_eq!(t.confirm_frames, 3);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let t: CollisionThresholds = serde_json::from_str(r#"{"confirm_frames": 5}"#).unwrap();
        assert_eq!(t.confirm_frames, 5);
        assert_relative_eq!(t.hitbox_scale, 1.2);
    }

    #[rstest]
    #[case::scale_one(CollisionThresholds { hitbox_scale: 1.0, ..Default::default() })]
    #[case::scale_nan(CollisionThresholds { hitbox_scale: f64::NAN, ..Default::default() })]
    #[case::negative_depth(CollisionThresholds { depth_diff_max: -1.0, ..Default::default() })]
    #[case::iou_above_one(CollisionThresholds { iou_threshold: 1.5, ..Default::default() })]
    #[case::zero_confirm(CollisionThresholds { confirm_frames: 0, ..Default::default() })]
    #[case::infinite_distance(CollisionThresholds {
        dist_3d_max: f64::INFINITY,
        ..Default::default()
    })]
    fn test_validate_rejects(#[case] t: CollisionThresholds) {
        assert!(t.validate().is_err());
    }
}
