use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;

use crate::collision::domain::collision_detector::CollisionDetector;
use crate::collision::domain::collision_notifier::CollisionNotifier;
use crate::collision::domain::frame_verdict::FrameVerdict;
use crate::collision::infrastructure::hud_overlay::HudOverlay;
use crate::detection::domain::face_mesh_detector::FaceMeshDetector;
use crate::pipeline::frame_schedule::FrameSchedule;
use crate::pipeline::session_logger::SessionLogger;
use crate::recording::domain::clip_recorder::{ClipRecorder, TriggerOutcome};
use crate::recording::domain::clip_writer::ClipRequest;
use crate::recording::domain::frame_prebuffer::FramePrebuffer;
use crate::shared::constants::DEFAULT_CLIP_PRE_SECONDS;
use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_reader::FrameReader;

/// Counters for one monitoring session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSummary {
    pub frames_read: usize,
    pub frames_evaluated: usize,
    /// Evaluated frames classified "collision now".
    pub collision_frames: usize,
    pub episodes: usize,
    pub clips_queued: usize,
    pub clips_coalesced: usize,
    pub clips_saved: Vec<PathBuf>,
    pub cancelled: bool,
}

/// Optional knobs for [`MonitorCollisionsUseCase`].
pub struct MonitorOptions {
    pub schedule: FrameSchedule,
    /// Seconds of history handed to the recorder when an episode starts.
    pub pre_seconds: f64,
    /// Draw the HUD onto frames before they are buffered for clips.
    pub overlay: Option<HudOverlay>,
    /// Called with `(frames_read, total_frames)`; returning `false` cancels.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Option<Arc<AtomicBool>>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            schedule: FrameSchedule::EveryFrame,
            pre_seconds: DEFAULT_CLIP_PRE_SECONDS,
            overlay: None,
            on_progress: None,
            cancelled: None,
        }
    }
}

/// Runs one monitoring session over a recorded frame source.
///
/// Per frame: detect (if scheduled) → classify and debounce → on a new
/// episode notify and hand the pre-event window to the recorder → draw
/// the HUD → buffer the frame. Single-use: `execute` consumes the reader.
pub struct MonitorCollisionsUseCase {
    reader: Option<Box<dyn FrameReader>>,
    detector: Box<dyn FaceMeshDetector>,
    collisions: CollisionDetector,
    notifier: Box<dyn CollisionNotifier>,
    recorder: Option<Box<dyn ClipRecorder>>,
    logger: Box<dyn SessionLogger>,
    schedule: FrameSchedule,
    pre_seconds: f64,
    overlay: Option<HudOverlay>,
    on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    cancelled: Arc<AtomicBool>,
}

impl MonitorCollisionsUseCase {
    pub fn new(
        reader: Box<dyn FrameReader>,
        detector: Box<dyn FaceMeshDetector>,
        collisions: CollisionDetector,
        notifier: Box<dyn CollisionNotifier>,
        recorder: Option<Box<dyn ClipRecorder>>,
        logger: Box<dyn SessionLogger>,
        options: MonitorOptions,
    ) -> Self {
        Self {
            reader: Some(reader),
            detector,
            collisions,
            notifier,
            recorder,
            logger,
            schedule: options.schedule,
            pre_seconds: options.pre_seconds,
            overlay: options.overlay,
            on_progress: options.on_progress,
            cancelled: options
                .cancelled
                .unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(&mut self, source: &Path) -> Result<SessionSummary, Box<dyn std::error::Error>> {
        let mut reader = self.reader.take().ok_or("Session already executed")?;
        let metadata = reader.open(source)?;
        self.logger.info(&format!(
            "Monitoring {} ({}x{}, {} frames at {:.1} fps)",
            source.display(),
            metadata.width,
            metadata.height,
            metadata.total_frames,
            metadata.effective_fps()
        ));

        let mut summary = SessionSummary::default();
        let result = self.run_frames(&mut *reader, &metadata, &mut summary);
        reader.close();

        if let Some(recorder) = self.recorder.as_mut() {
            match recorder.finish() {
                Ok(saved) => summary.clips_saved = saved,
                Err(e) if result.is_ok() => return Err(e),
                Err(e) => log::error!("Clip recorder failed: {e}"),
            }
        }
        result?;

        summary.episodes = self.collisions.episodes();
        self.logger.summary(&summary);
        Ok(summary)
    }

    fn run_frames(
        &mut self,
        reader: &mut dyn FrameReader,
        metadata: &StreamMetadata,
        summary: &mut SessionSummary,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut prebuffer = FramePrebuffer::new(self.pre_seconds, metadata.effective_fps());
        let mut last_verdict: Option<FrameVerdict> = None;

        for frame_result in reader.frames() {
            if self.cancelled.load(Ordering::Relaxed) {
                summary.cancelled = true;
                break;
            }
            let mut frame = frame_result?;
            summary.frames_read += 1;

            if self.schedule.selects(frame.index()) {
                let verdict = self.evaluate(&frame, metadata, &prebuffer, summary);
                last_verdict = Some(verdict);
            }

            if let (Some(overlay), Some(verdict)) = (&self.overlay, &last_verdict) {
                overlay.draw(&mut frame, verdict);
            }
            prebuffer.push(frame);

            self.logger.progress(summary.frames_read, metadata.total_frames);
            if let Some(ref cb) = self.on_progress {
                if !cb(summary.frames_read, metadata.total_frames) {
                    self.cancelled.store(true, Ordering::Relaxed);
                    summary.cancelled = true;
                    break;
                }
            }
        }
        Ok(())
    }

    fn evaluate(
        &mut self,
        frame: &Frame,
        metadata: &StreamMetadata,
        prebuffer: &FramePrebuffer,
        summary: &mut SessionSummary,
    ) -> FrameVerdict {
        summary.frames_evaluated += 1;
        let faces = match self.detector.detect(frame) {
            Ok(faces) => faces,
            Err(e) => {
                log::warn!("Face detection failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };

        let verdict = self.collisions.process(
            &faces,
            metadata.width,
            metadata.height,
            frame.timestamp(),
        );
        if verdict.collision_now {
            summary.collision_frames += 1;
        }

        if let Some(episode) = verdict.episode() {
            self.notifier.episode_started(&episode);
            self.logger.episode(&episode);
            if let Some(recorder) = self.recorder.as_mut() {
                let request = ClipRequest {
                    episode: episode.number,
                    captured_at: Local::now(),
                    frames: prebuffer.window(frame.timestamp()),
                    metadata: metadata.clone(),
                };
                match recorder.trigger(request) {
                    TriggerOutcome::Queued => summary.clips_queued += 1,
                    TriggerOutcome::Coalesced => summary.clips_coalesced += 1,
                    TriggerOutcome::Unavailable => {}
                }
            }
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::domain::collision_thresholds::CollisionThresholds;
    use crate::collision::domain::frame_verdict::CollisionEpisode;
    use crate::detection::domain::face_landmarks::{FaceObservation, LandmarkPoint};
    use crate::pipeline::session_logger::NullSessionLogger;
    use std::sync::Mutex;

    const W: u32 = 1000;
    const H: u32 = 1000;
    const FPS: f64 = 10.0;

    // --- Stubs ---

    struct StubReader {
        frames: Vec<Frame>,
        closed: Arc<Mutex<bool>>,
        fail_at: Option<usize>,
    }

    impl StubReader {
        fn new(count: usize) -> Self {
            Self {
                frames: (0..count)
                    .map(|i| Frame::blank(4, 4, i, i as f64 / FPS))
                    .collect(),
                closed: Arc::new(Mutex::new(false)),
                fail_at: None,
            }
        }
    }

    impl FrameReader for StubReader {
        fn open(&mut self, _path: &Path) -> Result<StreamMetadata, Box<dyn std::error::Error>> {
            Ok(StreamMetadata {
                width: W,
                height: H,
                fps: FPS,
                total_frames: self.frames.len(),
                source_path: None,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            let fail_at = self.fail_at;
            Box::new(self.frames.drain(..).map(move |f| {
                if Some(f.index()) == fail_at {
                    Err("corrupt frame".into())
                } else {
                    Ok(f)
                }
            }))
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    /// Colliding faces on the listed frames, two far-apart faces elsewhere.
    struct ScriptedDetector {
        colliding: Vec<usize>,
        failing: Vec<usize>,
        calls: Arc<Mutex<Vec<usize>>>,
    }

    impl ScriptedDetector {
        fn new(colliding: impl IntoIterator<Item = usize>) -> Self {
            Self {
                colliding: colliding.into_iter().collect(),
                failing: Vec::new(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    fn square(x: f64, y: f64, size: f64) -> FaceObservation {
        let (x1, y1) = (x / W as f64, y / H as f64);
        let (x2, y2) = ((x + size) / W as f64, (y + size) / H as f64);
        FaceObservation::new(vec![
            LandmarkPoint::new(x1, y1, 0.0),
            LandmarkPoint::new(x2, y1, 0.0),
            LandmarkPoint::new(x2, y2, 0.0),
            LandmarkPoint::new(x1, y2, 0.0),
        ])
    }

    impl FaceMeshDetector for ScriptedDetector {
        fn detect(
            &mut self,
            frame: &Frame,
        ) -> Result<Vec<FaceObservation>, Box<dyn std::error::Error>> {
            self.calls.lock().unwrap().push(frame.index());
            if self.failing.contains(&frame.index()) {
                return Err("model crashed".into());
            }
            if self.colliding.contains(&frame.index()) {
                Ok(vec![square(400.0, 400.0, 100.0), square(410.0, 400.0, 100.0)])
            } else {
                Ok(vec![square(100.0, 100.0, 100.0), square(700.0, 700.0, 100.0)])
            }
        }
    }

    struct RecordingNotifier {
        episodes: Arc<Mutex<Vec<CollisionEpisode>>>,
    }

    impl CollisionNotifier for RecordingNotifier {
        fn episode_started(&mut self, episode: &CollisionEpisode) {
            self.episodes.lock().unwrap().push(*episode);
        }
    }

    /// Records every request; with `coalesce` set, only the first is accepted.
    struct StubRecorder {
        requests: Arc<Mutex<Vec<ClipRequest>>>,
        coalesce: bool,
        finished: Arc<Mutex<bool>>,
    }

    impl ClipRecorder for StubRecorder {
        fn trigger(&mut self, request: ClipRequest) -> TriggerOutcome {
            let mut requests = self.requests.lock().unwrap();
            if self.coalesce && !requests.is_empty() {
                return TriggerOutcome::Coalesced;
            }
            requests.push(request);
            TriggerOutcome::Queued
        }

        fn finish(&mut self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
            *self.finished.lock().unwrap() = true;
            Ok(self
                .requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| PathBuf::from(format!("clip_{}", r.episode)))
                .collect())
        }
    }

    struct Harness {
        notified: Arc<Mutex<Vec<CollisionEpisode>>>,
        requests: Arc<Mutex<Vec<ClipRequest>>>,
        finished: Arc<Mutex<bool>>,
    }

    fn build(
        reader: StubReader,
        detector: ScriptedDetector,
        coalesce: bool,
        options: MonitorOptions,
    ) -> (MonitorCollisionsUseCase, Harness) {
        let harness = Harness {
            notified: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            finished: Arc::new(Mutex::new(false)),
        };
        let use_case = MonitorCollisionsUseCase::new(
            Box::new(reader),
            Box::new(detector),
            CollisionDetector::new(CollisionThresholds::default()),
            Box::new(RecordingNotifier {
                episodes: harness.notified.clone(),
            }),
            Some(Box::new(StubRecorder {
                requests: harness.requests.clone(),
                coalesce,
                finished: harness.finished.clone(),
            })),
            Box::new(NullSessionLogger),
            options,
        );
        (use_case, harness)
    }

    // --- Tests ---

    #[test]
    fn test_single_episode_notifies_once_and_records_clip() {
        let (mut use_case, harness) = build(
            StubReader::new(10),
            ScriptedDetector::new(3..8),
            false,
            MonitorOptions::default(),
        );
        let summary = use_case.execute(Path::new("session")).unwrap();

        assert_eq!(summary.frames_read, 10);
        assert_eq!(summary.frames_evaluated, 10);
        assert_eq!(summary.collision_frames, 5);
        assert_eq!(summary.episodes, 1);
        assert_eq!(summary.clips_queued, 1);
        assert_eq!(summary.clips_saved, vec![PathBuf::from("clip_1")]);
        assert!(!summary.cancelled);

        let notified = harness.notified.lock().unwrap();
        assert_eq!(notified.len(), 1);
        assert_eq!(notified[0].number, 1);
        // third consecutive colliding frame confirms: frame 5
        assert!((notified[0].timestamp - 0.5).abs() < 1e-12);
        assert!(*harness.finished.lock().unwrap());
    }

    #[test]
    fn test_clip_contains_frames_before_episode() {
        let (mut use_case, harness) = build(
            StubReader::new(10),
            ScriptedDetector::new(3..8),
            false,
            MonitorOptions {
                pre_seconds: 0.35,
                ..MonitorOptions::default()
            },
        );
        use_case.execute(Path::new("session")).unwrap();

        let requests = harness.requests.lock().unwrap();
        let indices: Vec<usize> = requests[0].frames.iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(requests[0].metadata.width, W);
    }

    #[test]
    fn test_two_episodes_second_clip_coalesced() {
        let (mut use_case, harness) = build(
            StubReader::new(12),
            ScriptedDetector::new([0, 1, 2, 3, 5, 6, 7]),
            true,
            MonitorOptions::default(),
        );
        let summary = use_case.execute(Path::new("session")).unwrap();

        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.clips_queued, 1);
        assert_eq!(summary.clips_coalesced, 1);
        let numbers: Vec<usize> =
            harness.notified.lock().unwrap().iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_every_nth_skips_detection() {
        let detector = ScriptedDetector::new([]);
        let calls = detector.calls.clone();
        let (mut use_case, _harness) = build(
            StubReader::new(10),
            detector,
            false,
            MonitorOptions {
                schedule: FrameSchedule::EveryNth(4),
                ..MonitorOptions::default()
            },
        );
        let summary = use_case.execute(Path::new("session")).unwrap();

        assert_eq!(summary.frames_read, 10);
        assert_eq!(summary.frames_evaluated, 3);
        assert_eq!(*calls.lock().unwrap(), vec![0, 4, 8]);
    }

    #[test]
    fn test_detector_error_treated_as_no_faces() {
        let mut detector = ScriptedDetector::new(0..6);
        detector.failing = vec![2];
        let (mut use_case, harness) = build(
            StubReader::new(6),
            detector,
            false,
            MonitorOptions::default(),
        );
        let summary = use_case.execute(Path::new("session")).unwrap();

        // streak broken at frame 2, re-confirmed at frame 5
        assert_eq!(summary.collision_frames, 5);
        assert_eq!(summary.episodes, 1);
        assert!((harness.notified.lock().unwrap()[0].timestamp - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_progress_callback_can_cancel() {
        let (mut use_case, _harness) = build(
            StubReader::new(10),
            ScriptedDetector::new([]),
            false,
            MonitorOptions {
                on_progress: Some(Box::new(|current, _total| current < 4)),
                ..MonitorOptions::default()
            },
        );
        let summary = use_case.execute(Path::new("session")).unwrap();
        assert_eq!(summary.frames_read, 4);
        assert!(summary.cancelled);
    }

    #[test]
    fn test_pre_cancelled_reads_nothing() {
        let cancelled = Arc::new(AtomicBool::new(true));
        let (mut use_case, _harness) = build(
            StubReader::new(10),
            ScriptedDetector::new([]),
            false,
            MonitorOptions {
                cancelled: Some(cancelled),
                ..MonitorOptions::default()
            },
        );
        let summary = use_case.execute(Path::new("session")).unwrap();
        assert_eq!(summary.frames_read, 0);
        assert!(summary.cancelled);
    }

    #[test]
    fn test_reader_error_propagates_and_still_closes() {
        let mut reader = StubReader::new(5);
        reader.fail_at = Some(2);
        let closed = reader.closed.clone();
        let (mut use_case, harness) = build(
            reader,
            ScriptedDetector::new([]),
            false,
            MonitorOptions::default(),
        );
        assert!(use_case.execute(Path::new("session")).is_err());
        assert!(*closed.lock().unwrap());
        assert!(*harness.finished.lock().unwrap());
    }

    #[test]
    fn test_execute_twice_fails() {
        let (mut use_case, _harness) = build(
            StubReader::new(1),
            ScriptedDetector::new([]),
            false,
            MonitorOptions::default(),
        );
        use_case.execute(Path::new("session")).unwrap();
        assert!(use_case.execute(Path::new("session")).is_err());
    }

    #[test]
    fn test_overlay_drawn_on_buffered_frames() {
        // Frames are 4x4 but the detector reports faces in a 1000x1000
        // space, so every hitbox clamps to the frame edge.
        let (mut use_case, harness) = build(
            StubReader::new(6),
            ScriptedDetector::new(0..6),
            false,
            MonitorOptions {
                overlay: Some(HudOverlay::default()),
                ..MonitorOptions::default()
            },
        );
        use_case.execute(Path::new("session")).unwrap();

        let requests = harness.requests.lock().unwrap();
        let first = &requests[0].frames[0];
        assert!(first.data().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_no_recorder_still_notifies() {
        let notified = Arc::new(Mutex::new(Vec::new()));
        let mut use_case = MonitorCollisionsUseCase::new(
            Box::new(StubReader::new(5)),
            Box::new(ScriptedDetector::new(0..5)),
            CollisionDetector::default(),
            Box::new(RecordingNotifier {
                episodes: notified.clone(),
            }),
            None,
            Box::new(NullSessionLogger),
            MonitorOptions::default(),
        );
        let summary = use_case.execute(Path::new("session")).unwrap();
        assert_eq!(summary.episodes, 1);
        assert_eq!(summary.clips_queued, 0);
        assert!(summary.clips_saved.is_empty());
        assert_eq!(notified.lock().unwrap().len(), 1);
    }
}
