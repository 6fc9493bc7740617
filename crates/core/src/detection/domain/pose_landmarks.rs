//! Landmark types exchanged between the pose engine, the detector and callers.

use std::fmt;

/// A landmark in frame-normalized coordinates.
///
/// `x` and `y` lie in `[0, 1]` for points inside the frame and may fall
/// slightly outside for joints the model extrapolates off-frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the hip midpoint, in roughly the same scale as `x`.
    pub z: f32,
    pub visibility: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    /// Pixel position in a `width` x `height` frame, clamped into the frame.
    pub fn to_pixel(&self, width: u32, height: u32) -> (u32, u32) {
        (scale_axis(self.x, width), scale_axis(self.y, height))
    }

    pub fn is_inside_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

fn scale_axis(value: f32, extent: u32) -> u32 {
    if extent == 0 {
        return 0;
    }
    let max = (extent - 1) as f64;
    // NaN maps to 0 through the saturating cast.
    (value as f64 * extent as f64).floor().clamp(0.0, max) as u32
}

/// Landmarks for one detected body, ordered by [`LandmarkIndex`].
#[derive(Clone, Debug, PartialEq)]
pub struct PoseLandmarks {
    landmarks: Vec<NormalizedLandmark>,
    presence: f32,
}

impl PoseLandmarks {
    pub fn new(landmarks: Vec<NormalizedLandmark>, presence: f32) -> Self {
        Self {
            landmarks,
            presence,
        }
    }

    pub fn landmarks(&self) -> &[NormalizedLandmark] {
        &self.landmarks
    }

    pub fn presence(&self) -> f32 {
        self.presence
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// Outcome of one detector pass, handed explicitly from `detect` to `locate`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PoseResult {
    /// The detector has not been run on this frame.
    #[default]
    NotRun,
    /// The detector ran and found no body.
    NoPose,
    Pose(PoseLandmarks),
}

impl PoseResult {
    pub fn landmarks(&self) -> Option<&PoseLandmarks> {
        match self {
            PoseResult::Pose(pose) => Some(pose),
            PoseResult::NotRun | PoseResult::NoPose => None,
        }
    }

    pub fn has_run(&self) -> bool {
        !matches!(self, PoseResult::NotRun)
    }
}

impl From<Option<PoseLandmarks>> for PoseResult {
    fn from(value: Option<PoseLandmarks>) -> Self {
        match value {
            Some(pose) => PoseResult::Pose(pose),
            None => PoseResult::NoPose,
        }
    }
}

/// A landmark scaled to integer pixel coordinates of a specific frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelLandmark {
    pub index: usize,
    pub x: u32,
    pub y: u32,
}

pub type LandmarkList = Vec<PixelLandmark>;

/// Formats a landmark list as `[[id, x, y], ...]`.
pub struct DisplayLandmarks<'a>(pub &'a [PixelLandmark]);

impl fmt::Display for DisplayLandmarks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, lm) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{}, {}, {}]", lm.index, lm.x, lm.y)?;
        }
        f.write_str("]")
    }
}

/// BlazePose landmark positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const ALL: [LandmarkIndex; 33] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_truncates_like_integer_cast() {
        let lm = NormalizedLandmark::new(0.5, 0.25, 0.0, 1.0);
        assert_eq!(lm.to_pixel(640, 480), (320, 120));
        let lm = NormalizedLandmark::new(0.999, 0.0015, 0.0, 1.0);
        assert_eq!(lm.to_pixel(100, 1000), (99, 1));
    }

    #[test]
    fn test_to_pixel_clamps_into_frame() {
        assert_eq!(
            NormalizedLandmark::new(1.0, 1.0, 0.0, 1.0).to_pixel(640, 480),
            (639, 479)
        );
        assert_eq!(
            NormalizedLandmark::new(-0.2, 1.7, 0.0, 1.0).to_pixel(640, 480),
            (0, 479)
        );
        assert_eq!(
            NormalizedLandmark::new(f32::NAN, f32::INFINITY, 0.0, 1.0).to_pixel(640, 480),
            (0, 479)
        );
    }

    #[test]
    fn test_is_inside_frame() {
        assert!(NormalizedLandmark::new(0.0, 1.0, 0.0, 1.0).is_inside_frame());
        assert!(!NormalizedLandmark::new(-0.01, 0.5, 0.0, 1.0).is_inside_frame());
        assert!(!NormalizedLandmark::new(0.5, 1.01, 0.0, 1.0).is_inside_frame());
    }

    #[test]
    fn test_default_result_is_not_run() {
        let result = PoseResult::default();
        assert!(!result.has_run());
        assert!(result.landmarks().is_none());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(PoseResult::from(None), PoseResult::NoPose);
        let pose = PoseLandmarks::new(vec![NormalizedLandmark::new(0.5, 0.5, 0.0, 1.0)], 0.9);
        let result = PoseResult::from(Some(pose.clone()));
        assert!(result.has_run());
        assert_eq!(result.landmarks(), Some(&pose));
    }

    #[test]
    fn test_landmark_index_discriminants_match_position() {
        for (i, idx) in LandmarkIndex::ALL.iter().enumerate() {
            assert_eq!(*idx as usize, i);
            assert_eq!(LandmarkIndex::from_index(i), Some(*idx));
        }
        assert_eq!(LandmarkIndex::from_index(33), None);
    }

    #[test]
    fn test_landmark_names() {
        assert_eq!(LandmarkIndex::Nose.name(), "nose");
        assert_eq!(LandmarkIndex::RightFootIndex.name(), "right_foot_index");
    }

    #[test]
    fn test_display_landmarks() {
        let list = vec![
            PixelLandmark {
                index: 0,
                x: 10,
                y: 20,
            },
            PixelLandmark {
                index: 1,
                x: 30,
                y: 40,
            },
        ];
        assert_eq!(
            DisplayLandmarks(&list).to_string(),
            "[[0, 10, 20], [1, 30, 40]]"
        );
        assert_eq!(DisplayLandmarks(&[]).to_string(), "[]");
    }
}
