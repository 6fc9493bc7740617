use crate::shared::frame::Frame;

use super::detector_config::DetectorConfig;
use super::pose_landmarks::PoseLandmarks;

/// Domain interface for the body-landmark model.
///
/// Implementations may keep state across frames (tracking, smoothing), hence
/// `&mut self`. Input frames are always RGB ordered.
pub trait PoseEngine: Send {
    /// Runs inference. `Ok(None)` means no body was found.
    fn infer(
        &mut self,
        rgb: &Frame,
        config: &DetectorConfig,
    ) -> Result<Option<PoseLandmarks>, Box<dyn std::error::Error>>;

    /// Landmark index pairs drawn as skeleton lines.
    fn topology(&self) -> &[(usize, usize)];
}
