use std::path::{Path, PathBuf};

use crate::shared::constants::{DEFAULT_CLIP_FPS, IMAGE_EXTENSIONS};
use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_reader::FrameReader;

/// Adapts a directory of still images to the [`FrameReader`] interface.
///
/// Files are taken in lexical order of their names, so zero-padded
/// numbering (`frame_00001.jpg`) gives capture order. Frame `i` is stamped
/// `i / fps` seconds. Every image must match the first one's dimensions.
pub struct ImageSequenceReader {
    fps: f64,
    files: Vec<PathBuf>,
    metadata: Option<StreamMetadata>,
}

impl ImageSequenceReader {
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            files: Vec::new(),
            metadata: None,
        }
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new(DEFAULT_CLIP_FPS)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_frame(
    path: &Path,
    index: usize,
    timestamp: f64,
    expected: (u32, u32),
) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_rgb8();
    if img.dimensions() != expected {
        return Err(format!(
            "{}: expected {}x{}, got {}x{}",
            path.display(),
            expected.0,
            expected.1,
            img.width(),
            img.height()
        )
        .into());
    }
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height, 3, index, timestamp))
}

impl FrameReader for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<StreamMetadata, Box<dyn std::error::Error>> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(format!("Invalid frame rate: {}", self.fps).into());
        }
        let files = list_images(path)?;
        let first = files
            .first()
            .ok_or_else(|| format!("No image files found in {}", path.display()))?;
        let (width, height) = image::image_dimensions(first)?;

        let metadata = StreamMetadata {
            width,
            height,
            fps: self.fps,
            total_frames: files.len(),
            source_path: Some(path.to_path_buf()),
        };
        log::debug!(
            "Opened {} frames ({width}x{height}) from {}",
            files.len(),
            path.display()
        );
        self.files = files;
        self.metadata = Some(metadata.clone());
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(metadata) = &self.metadata else {
            return Box::new(std::iter::once(Err(
                "ImageSequenceReader: not opened".into()
            )));
        };
        let fps = metadata.fps;
        let expected = (metadata.width, metadata.height);
        Box::new(
            self.files
                .iter()
                .enumerate()
                .map(move |(i, path)| load_frame(path, i, i as f64 / fps, expected)),
        )
    }

    fn close(&mut self) {
        self.files.clear();
        self.metadata = None;
    }
}
