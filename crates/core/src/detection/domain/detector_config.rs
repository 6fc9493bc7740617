use thiserror::Error;

pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_TRACKING_CONFIDENCE: f32 = 0.5;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },
}

/// Options fixed when a pose detector is constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Treat every frame as an unrelated image: no tracking, no smoothing.
    pub static_image_mode: bool,
    /// Temporal smoothing of landmarks across frames.
    pub smooth_landmarks: bool,
    /// Minimum presence score to report a newly found body.
    pub min_detection_confidence: f32,
    /// Minimum presence score to keep a body found on the previous frame.
    pub min_tracking_confidence: f32,
    /// Report only the upper-body landmarks and connections.
    pub upper_body_only: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            smooth_landmarks: true,
            min_detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_TRACKING_CONFIDENCE,
            upper_body_only: false,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("min_detection_confidence", self.min_detection_confidence)?;
        check_threshold("min_tracking_confidence", self.min_tracking_confidence)
    }

    /// Whether results may carry state from one frame to the next.
    pub fn tracks_across_frames(&self) -> bool {
        !self.static_image_mode
    }
}

fn check_threshold(name: &'static str, value: f32) -> Result<(), ConfigError> {
    // NaN fails `contains`.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}
