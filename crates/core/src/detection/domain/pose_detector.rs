use crate::drawing::canvas::fill_circle;
use crate::drawing::skeleton::{draw_landmarks, SkeletonStyle};
use crate::shared::constants::UPPER_BODY_LANDMARKS;
use crate::shared::frame::{Frame, Rgb};

use super::detector_config::{ConfigError, DetectorConfig};
use super::pose_engine::PoseEngine;
use super::pose_landmarks::{LandmarkList, PixelLandmark, PoseResult};
use super::topology::connections_within;

/// Radius of the marker `locate` draws at each landmark.
pub const MARKER_RADIUS: u32 = 5;

/// Bridges frames to a [`PoseEngine`] and exposes landmarks in pixel form.
///
/// The detector holds no per-frame result: `detect` returns a [`PoseResult`]
/// that the caller hands to `locate`.
pub struct PoseDetector {
    engine: Box<dyn PoseEngine>,
    config: DetectorConfig,
    topology: Vec<(usize, usize)>,
    style: SkeletonStyle,
}

impl PoseDetector {
    pub fn new(engine: Box<dyn PoseEngine>, config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let topology = if config.upper_body_only {
            connections_within(engine.topology(), UPPER_BODY_LANDMARKS)
        } else {
            engine.topology().to_vec()
        };
        Ok(Self {
            engine,
            config,
            topology,
            style: SkeletonStyle::default(),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs the engine on `frame`; with `draw`, paints the skeleton onto it.
    ///
    /// A frame without a body yields [`PoseResult::NoPose`], not an error.
    pub fn detect(
        &mut self,
        frame: &mut Frame,
        draw: bool,
    ) -> Result<PoseResult, Box<dyn std::error::Error>> {
        let rgb = frame.to_rgb();
        let result = PoseResult::from(self.engine.infer(&rgb, &self.config)?);

        if draw {
            if let Some(pose) = result.landmarks() {
                draw_landmarks(frame, pose.landmarks(), &self.topology, &self.style);
            }
        }
        Ok(result)
    }

    /// Scales the landmarks in `result` to `frame`'s pixel grid.
    ///
    /// Empty for [`PoseResult::NotRun`] and [`PoseResult::NoPose`]. With
    /// `draw`, fills a marker at each returned position.
    pub fn locate(&self, frame: &mut Frame, result: &PoseResult, draw: bool) -> LandmarkList {
        let Some(pose) = result.landmarks() else {
            return Vec::new();
        };

        let (w, h) = (frame.width(), frame.height());
        let list: LandmarkList = pose
            .landmarks()
            .iter()
            .enumerate()
            .map(|(index, lm)| {
                let (x, y) = lm.to_pixel(w, h);
                PixelLandmark { index, x, y }
            })
            .collect();

        if draw {
            for lm in &list {
                fill_circle(frame, (lm.x as i32, lm.y as i32), MARKER_RADIUS, Rgb::MAGENTA);
            }
        }
        list
    }
}
