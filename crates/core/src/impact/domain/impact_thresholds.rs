use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_GYROSCOPE_SCALE, DEFAULT_IMPACT_COOLDOWN_SECS, DEFAULT_IMPACT_THRESHOLD_G,
    DEFAULT_IMPACT_THRESHOLD_GYRO, DEFAULT_MAGNITUDE_SCALE,
};

/// Alerting rules for the helmet impact sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactThresholds {
    pub threshold_g: f64,
    /// Degrees per second, compared against the absolute value.
    pub threshold_gyro: f64,
    /// Minimum spacing between two g-force alerts. Angular alerts are not
    /// rate limited.
    pub alert_cooldown_secs: f64,
    /// Also report readings that stay below both thresholds.
    pub send_all_data: bool,
    pub magnitude_scale: f64,
    pub gyroscope_scale: f64,
}

impl Default for ImpactThresholds {
    fn default() -> Self {
        Self {
            threshold_g: DEFAULT_IMPACT_THRESHOLD_G,
            threshold_gyro: DEFAULT_IMPACT_THRESHOLD_GYRO,
            alert_cooldown_secs: DEFAULT_IMPACT_COOLDOWN_SECS,
            send_all_data: false,
            magnitude_scale: DEFAULT_MAGNITUDE_SCALE,
            gyroscope_scale: DEFAULT_GYROSCOPE_SCALE,
        }
    }
}

impl ImpactThresholds {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("threshold_g", self.threshold_g),
            ("threshold_gyro", self.threshold_gyro),
            ("alert_cooldown_secs", self.alert_cooldown_secs),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        for (name, value) in [
            ("magnitude_scale", self.magnitude_scale),
            ("gyroscope_scale", self.gyroscope_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be greater than 0, got {value}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ImpactThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_zero_scale_rejected() {
        let t = ImpactThresholds {
            magnitude_scale: 0.0,
            ..ImpactThresholds::default()
        };
        assert!(t.validate().unwrap_err().contains("magnitude_scale"));
    }

    #[test]
    fn test_negative_cooldown_rejected() {
        let t = ImpactThresholds {
            alert_cooldown_secs: -1.0,
            ..ImpactThresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let t: ImpactThresholds = serde_json::from_str(r#"{"threshold_g": 3.0}"#).unwrap();
        assert_eq!(t.threshold_g, 3.0);
        assert_eq!(t.threshold_gyro, 250.0);
        assert!(!t.send_all_data);
    }
}
