use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::face_landmarks::FaceObservation;
use crate::detection::domain::face_mesh_detector::FaceMeshDetector;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to read landmark recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid landmark record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One line of a landmark recording.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub frame: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub faces: Vec<FaceObservation>,
}

/// A face-mesh session captured as JSON lines, one [`LandmarkRecord`] per
/// line. Blank lines are ignored.
#[derive(Clone, Debug, Default)]
pub struct LandmarkRecording {
    records: Vec<LandmarkRecord>,
}

impl LandmarkRecording {
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let file = File::open(path).map_err(|source| RecordingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file)).map_err(|e| match e {
            RecordingError::Io { source, .. } => RecordingError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self, RecordingError> {
        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| RecordingError::Io {
                path: PathBuf::new(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line)
                .map_err(|source| RecordingError::Parse { line: i + 1, source })?;
            records.push(record);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[LandmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Every frame from 0 through the last recorded index, in order.
    /// Frames the recording skips come back with no faces and no
    /// timestamp, which is what [`RecordedLandmarkDetector`] reports for
    /// them. A frame recorded twice keeps its later record.
    pub fn dense_frames(
        &self,
    ) -> impl Iterator<Item = (usize, Option<f64>, &[FaceObservation])> + '_ {
        let by_frame: HashMap<usize, &LandmarkRecord> =
            self.records.iter().map(|r| (r.frame, r)).collect();
        let end = self.records.iter().map(|r| r.frame + 1).max().unwrap_or(0);
        (0..end).map(move |index| match by_frame.get(&index).copied() {
            Some(record) => (index, record.timestamp, record.faces.as_slice()),
            None => (index, None, &[] as &[FaceObservation]),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Replays a [`LandmarkRecording`] as if a face-mesh model were running.
///
/// Frames are matched by index. Frames the recording has no entry for
/// produce no faces, which is how a real model reports a missed frame.
pub struct RecordedLandmarkDetector {
    by_frame: HashMap<usize, Vec<FaceObservation>>,
}

impl RecordedLandmarkDetector {
    pub fn new(recording: LandmarkRecording) -> Self {
        let by_frame = recording
            .records
            .into_iter()
            .map(|r| (r.frame, r.faces))
            .collect();
        Self { by_frame }
    }
}

impl FaceMeshDetector for RecordedLandmarkDetector {
    fn detect(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<FaceObservation>, Box<dyn std::error::Error>> {
        Ok(self.by_frame.get(&frame.index()).cloned().unwrap_or_default())
    }
}
