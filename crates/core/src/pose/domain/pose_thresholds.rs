use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_ANGULAR_VELOCITY_MAX, DEFAULT_TRANSLATION_VELOCITY_MAX, DEFAULT_YAW_SIDE_THRESHOLD,
};

/// Limits for head motion between consecutive poses of the same face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseThresholds {
    /// Degrees per second, checked against the fastest of pitch/yaw/roll.
    pub angular_velocity_max: f64,
    /// Model millimetres per second.
    pub translation_velocity_max: f64,
    pub yaw_side_threshold: f64,
}

impl Default for PoseThresholds {
    fn default() -> Self {
        Self {
            angular_velocity_max: DEFAULT_ANGULAR_VELOCITY_MAX,
            translation_velocity_max: DEFAULT_TRANSLATION_VELOCITY_MAX,
            yaw_side_threshold: DEFAULT_YAW_SIDE_THRESHOLD,
        }
    }
}

impl PoseThresholds {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("angular_velocity_max", self.angular_velocity_max),
            ("translation_velocity_max", self.translation_velocity_max),
            ("yaw_side_threshold", self.yaw_side_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if self.yaw_side_threshold >= 180.0 {
            return Err(format!(
                "yaw_side_threshold must be below 180 degrees, got {}",
                self.yaw_side_threshold
            ));
        }
        Ok(())
    }
}
