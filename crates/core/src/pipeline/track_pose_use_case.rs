use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_display::FrameDisplay;
use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::pose_detector::PoseDetector;
use crate::shared::constants::{EXIT_KEY, KEY_POLL_MS};

use super::frame_rate::FrameRateCounter;
use super::tracking_logger::TrackingLogger;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("display failed: {0}")]
    Display(Box<dyn std::error::Error>),
    #[error("pose detection failed: {0}")]
    Detection(Box<dyn std::error::Error>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    UserQuit,
    Interrupted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub exit_reason: ExitReason,
}

/// Loop options that don't belong to the detector itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackOptions {
    /// Flip each frame horizontally before detection (selfie view).
    pub mirror: bool,
    /// Draw the skeleton and landmark markers onto displayed frames.
    pub draw: bool,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            mirror: true,
            draw: true,
        }
    }
}

/// Reads frames, tracks the pose on each and shows the annotated result
/// until the user quits, the process is interrupted or a stage fails.
///
/// The source and display are closed exactly once when `execute` returns,
/// whatever the exit path.
pub struct TrackPoseUseCase {
    source: Box<dyn FrameSource>,
    display: Box<dyn FrameDisplay>,
    detector: PoseDetector,
    logger: Box<dyn TrackingLogger>,
    options: TrackOptions,
    interrupted: Arc<AtomicBool>,
}

impl TrackPoseUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        display: Box<dyn FrameDisplay>,
        detector: PoseDetector,
        logger: Box<dyn TrackingLogger>,
        options: TrackOptions,
        interrupted: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            display,
            detector,
            logger,
            options,
            interrupted,
        }
    }

    pub fn execute(&mut self) -> Result<RunSummary, TrackError> {
        let result = self.run_loop();

        self.source.close();
        self.display.close();

        match &result {
            Ok(summary) => self.logger.info(&format!(
                "Stopped after {} frames ({:?})",
                summary.frames, summary.exit_reason
            )),
            Err(e) => log::error!("Tracking stopped: {e}"),
        }
        self.logger.summary();
        result
    }

    fn run_loop(&mut self) -> Result<RunSummary, TrackError> {
        let mut frame_rate = FrameRateCounter::new();
        let mut frames = 0;

        loop {
            if self.interrupted.load(Ordering::SeqCst) {
                return Ok(RunSummary {
                    frames,
                    exit_reason: ExitReason::Interrupted,
                });
            }

            let mut frame = self.source.read_frame()?;
            if self.options.mirror {
                frame.mirror_horizontal();
            }

            let t0 = Instant::now();
            let result = self
                .detector
                .detect(&mut frame, self.options.draw)
                .map_err(TrackError::Detection)?;
            self.logger.timing("detect", elapsed_ms(t0));

            let landmarks = self.detector.locate(&mut frame, &result, self.options.draw);
            self.logger.landmarks(frame.index(), &landmarks);
            frames += 1;

            // Whole frames per second, truncated.
            let overlay = frame_rate
                .tick(Instant::now())
                .map(|fps| (fps as u64).to_string());

            let t0 = Instant::now();
            self.display
                .show(&frame, overlay.as_deref())
                .map_err(TrackError::Display)?;
            let key = self
                .display
                .poll_key(KEY_POLL_MS)
                .map_err(TrackError::Display)?;
            self.logger.timing("display", elapsed_ms(t0));

            if key == Some(EXIT_KEY) {
                return Ok(RunSummary {
                    frames,
                    exit_reason: ExitReason::UserQuit,
                });
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
