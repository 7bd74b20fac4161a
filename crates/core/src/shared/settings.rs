use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::domain::collision_thresholds::CollisionThresholds;
use crate::impact::domain::impact_thresholds::ImpactThresholds;
use crate::pose::domain::pose_thresholds::PoseThresholds;
use crate::shared::constants::{
    DEFAULT_CLIP_DIR, DEFAULT_CLIP_FPS, DEFAULT_CLIP_PRE_SECONDS, SETTINGS_DIR_NAME,
    SETTINGS_FILE_NAME,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Where and how much to record around an episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSettings {
    pub pre_seconds: f64,
    pub dir: PathBuf,
    /// Frame rate assumed when the source does not report one.
    pub fps: f64,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            pre_seconds: DEFAULT_CLIP_PRE_SECONDS,
            dir: PathBuf::from(DEFAULT_CLIP_DIR),
            fps: DEFAULT_CLIP_FPS,
        }
    }
}

/// Persistent settings, stored as JSON. Every field is optional in the
/// file; missing ones take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub collision: CollisionThresholds,
    pub pose: PoseThresholds,
    pub clip: ClipSettings,
    pub impact: ImpactThresholds,
}

impl MonitorSettings {
    /// `<config dir>/HeadCheck/settings.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads from [`default_path`](Self::default_path), falling back to
    /// defaults when there is no file. A file that exists but is broken is
    /// still an error.
    pub fn load_default() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.collision.validate().map_err(SettingsError::Invalid)?;
        self.pose.validate().map_err(SettingsError::Invalid)?;
        self.impact.validate().map_err(SettingsError::Invalid)?;
        if !(self.clip.pre_seconds.is_finite() && self.clip.pre_seconds >= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "clip.pre_seconds must be a non-negative number, got {}",
                self.clip.pre_seconds
            )));
        }
        if !(self.clip.fps.is_finite() && self.clip.fps > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "clip.fps must be greater than 0, got {}",
                self.clip.fps
            )));
        }
        Ok(())
    }
}
