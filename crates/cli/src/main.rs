mod opencv_camera;
mod opencv_window;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use posetrack_core::capture::domain::frame_source::FrameSource;
use posetrack_core::capture::infrastructure::image_file_source::ImageFileSource;
use posetrack_core::detection::domain::detector_config::DetectorConfig;
use posetrack_core::detection::domain::pose_detector::PoseDetector;
use posetrack_core::detection::infrastructure::execution_provider::ExecutionTarget;
use posetrack_core::detection::infrastructure::model_resolver;
use posetrack_core::detection::infrastructure::onnx_pose_engine::OnnxPoseEngine;
use posetrack_core::pipeline::track_pose_use_case::{TrackOptions, TrackPoseUseCase};
use posetrack_core::pipeline::tracking_logger::StdoutTrackingLogger;
use posetrack_core::shared::constants::{BUNDLED_MODEL_DIR, POSE_MODEL_NAME, WINDOW_TITLE};

use opencv_camera::OpencvCamera;
use opencv_window::OpencvWindow;

/// Real-time body pose tracking from a webcam.
///
/// Shows the camera feed with the detected skeleton and an FPS counter, and
/// prints each frame's landmarks as `[[id, x, y], ...]`. Press `q` to quit.
#[derive(Parser)]
#[command(name = "posetrack")]
struct Cli {
    /// Camera device index.
    #[arg(long, default_value = "0")]
    camera: i32,

    /// Track a still image instead of the camera.
    #[arg(long, conflicts_with = "camera")]
    image: Option<PathBuf>,

    /// Pose landmark ONNX model (skips cache lookup and download).
    #[arg(long)]
    model: Option<PathBuf>,

    /// URL to download the pose model from when it is not cached.
    #[arg(long)]
    model_url: Option<String>,

    /// Treat every frame as unrelated (no tracking between frames).
    #[arg(long)]
    static_image_mode: bool,

    /// Disable landmark smoothing across frames.
    #[arg(long)]
    no_smooth: bool,

    /// Minimum confidence for a new pose detection (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    detection_confidence: f32,

    /// Minimum confidence to keep tracking a pose (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    tracking_confidence: f32,

    /// Only report the 25 upper-body landmarks.
    #[arg(long)]
    upper_body_only: bool,

    /// Don't draw the skeleton or landmark markers.
    #[arg(long)]
    no_draw: bool,

    /// Don't mirror the camera image.
    #[arg(long)]
    no_mirror: bool,

    /// Run the model on the CPU even when an accelerator is available.
    #[arg(long)]
    cpu: bool,

    /// Don't print landmark lists.
    #[arg(long)]
    quiet: bool,
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
    let config = detector_config(&cli);
    validate(&cli, &config)?;

    let detector = build_detector(&cli, config)?;

    let source: Box<dyn FrameSource> = match &cli.image {
        Some(path) => Box::new(ImageFileSource::open(path)?),
        None => Box::new(OpencvCamera::open(cli.camera)?),
    };
    let display = OpencvWindow::new(WINDOW_TITLE)?;
    let logger = StdoutTrackingLogger::new(!cli.quiet);
    let options = TrackOptions {
        mirror: !cli.no_mirror,
        draw: !cli.no_draw,
    };

    // Installed last so Ctrl-C still aborts a model download.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    let mut use_case = TrackPoseUseCase::new(
        source,
        Box::new(display),
        detector,
        Box::new(logger),
        options,
        interrupted,
    );
    let summary = use_case.execute()?;
    log::debug!("{summary:?}");
    Ok(())
}

fn detector_config(cli: &Cli) -> DetectorConfig {
    DetectorConfig {
        // A still image has no previous frame to track from.
        static_image_mode: cli.static_image_mode || cli.image.is_some(),
        smooth_landmarks: !cli.no_smooth,
        min_detection_confidence: cli.detection_confidence,
        min_tracking_confidence: cli.tracking_confidence,
        upper_body_only: cli.upper_body_only,
    }
}

fn build_detector(
    cli: &Cli,
    config: DetectorConfig,
) -> Result<PoseDetector, Box<dyn std::error::Error>> {
    let model_path = match &cli.model {
        Some(path) => path.clone(),
        None => {
            log::info!("Resolving model: {POSE_MODEL_NAME}");
            let path = model_resolver::resolve(
                POSE_MODEL_NAME,
                cli.model_url.as_deref(),
                Some(Path::new(BUNDLED_MODEL_DIR)),
                Some(Box::new(download_progress)),
            )?;
            if cli.model_url.is_some() {
                eprintln!();
            }
            path
        }
    };

    let target = if cli.cpu {
        ExecutionTarget::Cpu
    } else {
        ExecutionTarget::Auto
    };
    let engine = OnnxPoseEngine::new(&model_path, target)?;
    Ok(PoseDetector::new(Box::new(engine), config)?)
}

fn validate(cli: &Cli, config: &DetectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    if let Some(path) = &cli.image {
        if !path.exists() {
            return Err(format!("Input image not found: {}", path.display()).into());
        }
    }
    if let Some(path) = &cli.model {
        if !path.exists() {
            return Err(format!("Model file not found: {}", path.display()).into());
        }
    }
    if cli.model.is_some() && cli.model_url.is_some() {
        return Err("--model and --model-url are mutually exclusive".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading pose landmark model... {pct}%");
    } else {
        eprint!("\rDownloading pose landmark model... {downloaded} bytes");
    }
}
