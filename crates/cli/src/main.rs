use std::path::{Path, PathBuf};
use std::process;

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};

use headcheck_core::collision::domain::collision_detector::CollisionDetector;
use headcheck_core::collision::infrastructure::hud_overlay::HudOverlay;
use headcheck_core::collision::infrastructure::log_notifier::LogNotifier;
use headcheck_core::detection::infrastructure::recorded_landmark_detector::{
    LandmarkRecording, RecordedLandmarkDetector,
};
use headcheck_core::impact::domain::impact_monitor::ImpactMonitor;
use headcheck_core::impact::infrastructure::sensor_log::read_sensor_log;
use headcheck_core::pipeline::frame_schedule::FrameSchedule;
use headcheck_core::pipeline::monitor_collisions_use_case::{
    MonitorCollisionsUseCase, MonitorOptions,
};
use headcheck_core::pipeline::session_logger::LogSessionLogger;
use headcheck_core::recording::domain::clip_recorder::ClipRecorder;
use headcheck_core::recording::infrastructure::background_clip_recorder::BackgroundClipRecorder;
use headcheck_core::recording::infrastructure::image_sequence_clip_writer::ImageSequenceClipWriter;
use headcheck_core::shared::settings::MonitorSettings;
use headcheck_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;

/// Head collision detection from recorded face landmarks, plus helmet
/// impact sensor replay.
#[derive(Parser)]
#[command(name = "headcheck")]
struct Cli {
    /// Settings file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay camera frames and their landmark recording, saving a clip per
    /// confirmed collision.
    Monitor {
        /// Directory of frame images, named in capture order.
        frames_dir: PathBuf,

        /// Landmark recording (JSON lines) for those frames.
        landmarks: PathBuf,

        /// Frame rate of the capture.
        #[arg(long)]
        fps: Option<f64>,

        /// Where to save collision clips.
        #[arg(long)]
        clip_dir: Option<PathBuf>,

        /// Do not save clips.
        #[arg(long)]
        no_clips: bool,

        /// Draw hitboxes and the collision border onto saved frames.
        #[arg(long)]
        overlay: bool,

        /// Run detection every Nth frame (1 = every frame).
        #[arg(long, default_value = "1")]
        every: usize,
    },

    /// Run the detector over a landmark recording alone and print one
    /// diagnostic line per frame.
    Analyze {
        /// Landmark recording (JSON lines).
        landmarks: PathBuf,

        /// Frame width in pixels.
        #[arg(long)]
        width: u32,

        /// Frame height in pixels.
        #[arg(long)]
        height: u32,

        /// Frame rate used to time records that carry no timestamp.
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Replay a captured sensor serial log and print impact events as JSON
    /// lines.
    Impacts {
        /// Captured serial output.
        sensor_log: PathBuf,

        /// Player the sensor belongs to.
        #[arg(long)]
        player: String,

        /// Player's team.
        #[arg(long)]
        team: String,

        /// Spacing between log lines in milliseconds. Without it, each line
        /// is stamped with the wall clock as it is replayed.
        #[arg(long)]
        line_interval_ms: Option<u64>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Monitor {
            frames_dir,
            landmarks,
            fps,
            clip_dir,
            no_clips,
            overlay,
            every,
        } => {
            let fps = fps.unwrap_or(settings.clip.fps);
            validate_fps(fps)?;
            if every == 0 {
                return Err("--every must be at least 1".into());
            }
            let clip_dir =
                (!no_clips).then(|| clip_dir.unwrap_or_else(|| settings.clip.dir.clone()));
            run_monitor(
                &frames_dir,
                &landmarks,
                fps,
                clip_dir.as_deref(),
                overlay,
                FrameSchedule::from_interval(every),
                &settings,
            )
        }
        Command::Analyze {
            landmarks,
            width,
            height,
            fps,
        } => {
            let fps = fps.unwrap_or(settings.clip.fps);
            validate_fps(fps)?;
            if width == 0 || height == 0 {
                return Err(format!("Frame size must be non-zero, got {width}x{height}").into());
            }
            run_analyze(&landmarks, width, height, fps, &settings)
        }
        Command::Impacts {
            sensor_log,
            player,
            team,
            line_interval_ms,
        } => run_impacts(&sensor_log, &player, &team, line_interval_ms, &settings),
    }
}

fn load_settings(path: Option<&Path>) -> Result<MonitorSettings, Box<dyn std::error::Error>> {
    let settings = match path {
        Some(p) => MonitorSettings::load_from(p)?,
        None => MonitorSettings::load_default()?,
    };
    Ok(settings)
}

fn run_monitor(
    frames_dir: &Path,
    landmarks: &Path,
    fps: f64,
    clip_dir: Option<&Path>,
    overlay: bool,
    schedule: FrameSchedule,
    settings: &MonitorSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    require_exists(frames_dir)?;
    require_exists(landmarks)?;

    let recording = LandmarkRecording::load(landmarks)?;
    log::info!("Loaded {} landmark records", recording.len());

    let recorder: Option<Box<dyn ClipRecorder>> = clip_dir.map(|dir| {
        Box::new(BackgroundClipRecorder::new(Box::new(ImageSequenceClipWriter::new(dir))))
            as Box<dyn ClipRecorder>
    });

    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(|current, total| {
        eprint!("\rProcessing frame {current}/{total}");
        true
    });

    let mut use_case = MonitorCollisionsUseCase::new(
        Box::new(ImageSequenceReader::new(fps)),
        Box::new(RecordedLandmarkDetector::new(recording)),
        collision_detector(settings),
        Box::new(LogNotifier::default()),
        recorder,
        Box::new(LogSessionLogger::default()),
        MonitorOptions {
            schedule,
            pre_seconds: settings.clip.pre_seconds,
            overlay: overlay.then(HudOverlay::default),
            on_progress: Some(progress),
            cancelled: None,
        },
    );
    let summary = use_case.execute(frames_dir)?;
    eprintln!();

    println!("Collisions: {}", summary.episodes);
    for path in &summary.clips_saved {
        println!("Clip saved: {}", path.display());
    }
    Ok(())
}

fn run_analyze(
    landmarks: &Path,
    width: u32,
    height: u32,
    fps: f64,
    settings: &MonitorSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    require_exists(landmarks)?;
    let recording = LandmarkRecording::load(landmarks)?;
    let mut detector = collision_detector(settings);

    for line in analyze(&recording, &mut detector, width, height, fps) {
        println!("{line}");
    }
    println!("Collisions: {}", detector.episodes());
    Ok(())
}

/// One diagnostic line per frame, gaps in the recording included.
fn analyze(
    recording: &LandmarkRecording,
    detector: &mut CollisionDetector,
    width: u32,
    height: u32,
    fps: f64,
) -> Vec<String> {
    recording
        .dense_frames()
        .map(|(index, timestamp, faces)| {
            let timestamp = timestamp.unwrap_or(index as f64 / fps);
            let verdict = detector.process(faces, width, height, timestamp);
            format!("frame={index} {verdict}")
        })
        .collect()
}

fn collision_detector(settings: &MonitorSettings) -> CollisionDetector {
    CollisionDetector::new(settings.collision.clone()).with_pose_thresholds(settings.pose.clone())
}

fn run_impacts(
    sensor_log: &Path,
    player: &str,
    team: &str,
    line_interval_ms: Option<u64>,
    settings: &MonitorSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    require_exists(sensor_log)?;
    if player.trim().is_empty() || team.trim().is_empty() {
        return Err("--player and --team must not be empty".into());
    }

    let readings = read_sensor_log(sensor_log)?;
    let mut monitor = ImpactMonitor::new(settings.impact.clone(), player, team);
    let start = Utc::now();

    for (line, reading) in readings {
        let now = line_time(start, line, line_interval_ms);
        if let Some(assessment) = monitor.observe(reading, now) {
            if let Some(event) = assessment.event {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
    }
    log::info!(
        "{} hits read, {} impact events for {player} ({team})",
        monitor.hits(),
        monitor.events()
    );
    Ok(())
}

fn line_time(start: DateTime<Utc>, line: usize, interval_ms: Option<u64>) -> DateTime<Utc> {
    match interval_ms {
        Some(ms) => start + Duration::milliseconds((line.saturating_sub(1) as i64) * ms as i64),
        None => Utc::now(),
    }
}

fn require_exists(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Input not found: {}", path.display()).into());
    }
    Ok(())
}

fn validate_fps(fps: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("Frame rate must be greater than 0, got {fps}").into());
    }
    Ok(())
}
