/// Minimum IoU between two hitboxes before the 3D gates are consulted.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.05;

/// Dilation applied to the tight landmark box to approximate head/helmet extent.
pub const DEFAULT_HITBOX_SCALE: f64 = 1.2;

/// Extra pixels added around the landmark box before scaling.
pub const DEFAULT_BOX_PADDING: f64 = 0.0;

/// Converts raw face-mesh depth units into the pixel comparison scale.
pub const DEFAULT_DEPTH_SCALE_FACTOR: f64 = 1000.0;

pub const DEFAULT_DEPTH_DIFF_MAX: f64 = 30.0;
pub const DEFAULT_DIST_3D_MAX: f64 = 150.0;
pub const DEFAULT_SIZE_RATIO_THRESHOLD: f64 = 0.8;

/// Fraction of the smaller face's linear size the centroids must be within.
pub const DEFAULT_CLOSE_2D_FACTOR: f64 = 0.5;

/// Consecutive collision frames before an episode is confirmed.
pub const DEFAULT_CONFIRM_FRAMES: u32 = 3;

/// Seconds of history saved when an episode starts.
pub const DEFAULT_CLIP_PRE_SECONDS: f64 = 5.0;

/// Used when the frame source cannot report its own rate.
pub const DEFAULT_CLIP_FPS: f64 = 20.0;

pub const DEFAULT_CLIP_DIR: &str = "collision_clips";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const SETTINGS_DIR_NAME: &str = "HeadCheck";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Impacts above this many g raise an alert (subject to the cooldown).
pub const DEFAULT_IMPACT_THRESHOLD_G: f64 = 2.0;
pub const DEFAULT_IMPACT_THRESHOLD_GYRO: f64 = 250.0;
pub const DEFAULT_IMPACT_COOLDOWN_SECS: f64 = 5.0;

/// Raw sensor units per g / per degree-per-second.
pub const DEFAULT_MAGNITUDE_SCALE: f64 = 100.0;
pub const DEFAULT_GYROSCOPE_SCALE: f64 = 100.0;

/// Per-axis head rotation rate (deg/s) above which a face is flagged.
pub const DEFAULT_ANGULAR_VELOCITY_MAX: f64 = 40.0;

/// Head translation rate (model mm/s) above which a face is flagged.
pub const DEFAULT_TRANSLATION_VELOCITY_MAX: f64 = 50.0;

/// |yaw| in degrees beyond which a face counts as turned to the side.
pub const DEFAULT_YAW_SIDE_THRESHOLD: f64 = 20.0;
