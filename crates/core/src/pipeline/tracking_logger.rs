use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Instant;

use crate::detection::domain::pose_landmarks::{DisplayLandmarks, PixelLandmark};

/// Cross-cutting logger for capture loop events.
///
/// Keeps the loop free of output concerns: the CLI prints landmark lists to
/// stdout, tests swap in a silent logger.
pub trait TrackingLogger {
    /// Report the landmark list located on one frame.
    fn landmarks(&mut self, frame_index: usize, landmarks: &[PixelLandmark]);

    /// Record how long a named loop stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullTrackingLogger;

impl TrackingLogger for NullTrackingLogger {
    fn landmarks(&mut self, _frame_index: usize, _landmarks: &[PixelLandmark]) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Prints each frame's landmark list as `[[id, x, y], ...]` and keeps
/// per-stage timings for the summary.
pub struct StdoutTrackingLogger<W: Write = io::Stdout> {
    out: W,
    print_landmarks: bool,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_frames: usize,
}

impl StdoutTrackingLogger<io::Stdout> {
    pub fn new(print_landmarks: bool) -> Self {
        Self::with_writer(io::stdout(), print_landmarks)
    }
}

impl<W: Write> StdoutTrackingLogger<W> {
    pub fn with_writer(out: W, print_landmarks: bool) -> Self {
        Self {
            out,
            print_landmarks,
            timings: HashMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no frame was seen.
    pub fn summary_string(&self) -> Option<String> {
        if self.total_frames == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.total_frames;
        let mut lines = vec![format!(
            "Tracking summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        if elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    /// Returns the timing data for a given stage.
    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> TrackingLogger for StdoutTrackingLogger<W> {
    fn landmarks(&mut self, _frame_index: usize, landmarks: &[PixelLandmark]) {
        self.total_frames += 1;
        if !self.print_landmarks {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", DisplayLandmarks(landmarks)) {
            log::warn!("Failed to print landmarks: {e}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmark(index: usize, x: u32, y: u32) -> PixelLandmark {
        PixelLandmark { index, x, y }
    }

    fn output(logger: &StdoutTrackingLogger<Vec<u8>>) -> String {
        String::from_utf8(logger.writer().clone()).unwrap()
    }

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullTrackingLogger;
        logger.landmarks(0, &[landmark(0, 1, 2)]);
        logger.timing("detect", 5.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_prints_one_line_per_frame() {
        let mut logger = StdoutTrackingLogger::with_writer(Vec::new(), true);
        logger.landmarks(0, &[landmark(0, 10, 20), landmark(1, 30, 40)]);
        logger.landmarks(1, &[]);

        assert_eq!(output(&logger), "[[0, 10, 20], [1, 30, 40]]\n[]\n");
    }

    #[test]
    fn test_quiet_logger_prints_nothing_but_counts_frames() {
        let mut logger = StdoutTrackingLogger::with_writer(Vec::new(), false);
        logger.landmarks(0, &[landmark(0, 10, 20)]);

        assert!(output(&logger).is_empty());
        assert!(logger.summary_string().unwrap().contains("1 frames"));
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutTrackingLogger::with_writer(Vec::new(), false);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("display", 5.0);

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(detect.len(), 2);
        assert!((detect[0] - 20.0).abs() < f64::EPSILON);
        assert!((detect[1] - 30.0).abs() < f64::EPSILON);
        assert_eq!(logger.timings_for("display").unwrap().len(), 1);
        assert!(logger.timings_for("locate").is_none());
    }

    #[test]
    fn test_summary_includes_stages() {
        let mut logger = StdoutTrackingLogger::with_writer(Vec::new(), false);
        logger.landmarks(0, &[]);
        logger.timing("detect", 20.0);
        logger.timing("display", 5.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Tracking summary"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("display"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutTrackingLogger::with_writer(Vec::new(), true);
        assert!(logger.summary_string().is_none());
    }
}
