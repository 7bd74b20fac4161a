use std::path::PathBuf;

use crate::shared::constants::DEFAULT_CLIP_FPS;

/// Properties of a frame source, fixed for the whole session.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl StreamMetadata {
    /// Frame rate to use for buffering and clip output.
    ///
    /// Sources that cannot report a usable rate (0, NaN, or at most
    /// 1 fps) fall back to [`DEFAULT_CLIP_FPS`].
    pub fn effective_fps(&self) -> f64 {
        if self.fps.is_finite() && self.fps > 1.0 {
            self.fps
        } else {
            DEFAULT_CLIP_FPS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn metadata(fps: f64) -> StreamMetadata {
        StreamMetadata {
            width: 640,
            height: 480,
            fps,
            total_frames: 100,
            source_path: None,
        }
    }

    #[test]
    fn test_effective_fps_uses_reported_rate() {
        assert_eq!(metadata(30.0).effective_fps(), 30.0);
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::one(1.0)]
    #[case::nan(f64::NAN)]
    #[case::negative(-5.0)]
    fn test_effective_fps_falls_back(#[case] fps: f64) {
        assert_eq!(metadata(fps).effective_fps(), DEFAULT_CLIP_FPS);
    }
}
