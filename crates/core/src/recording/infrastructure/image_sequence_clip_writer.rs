use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::recording::domain::clip_writer::{ClipRequest, ClipWriter};
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum ClipError {
    #[error("failed to create clip directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("frame {index} is not RGB ({channels} channels)")]
    UnsupportedFrame { index: usize, channels: u8 },
    #[error("failed to write {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Saves each clip as a directory of numbered PNG frames:
/// `<root>/collision_<timestamp>/frame_00000.png`.
///
/// Two episodes within the same second get `_2`, `_3`, ... suffixes
/// rather than overwriting each other.
pub struct ImageSequenceClipWriter {
    root: PathBuf,
}

impl ImageSequenceClipWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn unique_dir(&self, name: &str) -> PathBuf {
        let mut dir = self.root.join(name);
        let mut n = 2;
        while dir.exists() {
            dir = self.root.join(format!("{name}_{n}"));
            n += 1;
        }
        dir
    }
}

fn write_frame(path: &Path, frame: &Frame) -> Result<(), ClipError> {
    if frame.channels() != 3 {
        return Err(ClipError::UnsupportedFrame {
            index: frame.index(),
            channels: frame.channels(),
        });
    }
    let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or(ClipError::UnsupportedFrame {
            index: frame.index(),
            channels: frame.channels(),
        })?;
    img.save(path).map_err(|source| ClipError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

impl ClipWriter for ImageSequenceClipWriter {
    fn write_clip(
        &mut self,
        request: &ClipRequest,
    ) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
        let dir = self.unique_dir(&request.clip_name());
        fs::create_dir_all(&dir).map_err(|source| ClipError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        for (i, frame) in request.frames.iter().enumerate() {
            write_frame(&dir.join(format!("frame_{i:05}.png")), frame)?;
        }

        log::info!(
            "Saved collision clip #{} ({} frames) to {}",
            request.episode,
            request.frames.len(),
            dir.display()
        );
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::stream_metadata::StreamMetadata;
    use chrono::{Local, TimeZone};

    fn request(frames: Vec<Frame>) -> ClipRequest {
        ClipRequest {
            episode: 1,
            captured_at: Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            frames,
            metadata: StreamMetadata {
                width: 4,
                height: 3,
                fps: 20.0,
                total_frames: 0,
                source_path: None,
            },
        }
    }

    fn colored(index: usize, value: u8) -> Frame {
        Frame::new(vec![value; 4 * 3 * 3], 4, 3, 3, index, index as f64)
    }

    #[test]
    fn test_writes_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageSequenceClipWriter::new(dir.path());
        let out = writer
            .write_clip(&request(vec![colored(0, 10), colored(1, 20)]))
            .unwrap();

        assert_eq!(out, dir.path().join("collision_20240102_030405"));
        assert!(out.join("frame_00000.png").exists());
        assert!(out.join("frame_00001.png").exists());
        assert!(!out.join("frame_00002.png").exists());
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageSequenceClipWriter::new(dir.path());
        let out = writer.write_clip(&request(vec![colored(0, 77)])).unwrap();

        let img = image::open(out.join("frame_00000.png")).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(2, 1).0, [77, 77, 77]);
    }

    #[test]
    fn test_same_second_episodes_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageSequenceClipWriter::new(dir.path());
        let first = writer.write_clip(&request(vec![colored(0, 1)])).unwrap();
        let second = writer.write_clip(&request(vec![colored(0, 2)])).unwrap();
        assert_ne!(first, second);
        assert!(second.ends_with("collision_20240102_030405_2"));
    }

    #[test]
    fn test_empty_clip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageSequenceClipWriter::new(dir.path().join("nested"));
        let out = writer.write_clip(&request(vec![])).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_non_rgb_frame_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageSequenceClipWriter::new(dir.path());
        let gray = Frame::new(vec![0u8; 12], 4, 3, 1, 0, 0.0);
        assert!(writer.write_clip(&request(vec![gray])).is_err());
    }
}
