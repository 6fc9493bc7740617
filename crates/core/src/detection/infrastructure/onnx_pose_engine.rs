/// BlazePose landmark engine using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference, output decoding back to
/// frame-normalized coordinates, presence gating with detection/tracking
/// thresholds, and temporal smoothing.
use std::path::Path;

use crate::detection::domain::detector_config::DetectorConfig;
use crate::detection::domain::landmark_smoother::LandmarkSmoother;
use crate::detection::domain::pose_engine::PoseEngine;
use crate::detection::domain::pose_landmarks::{NormalizedLandmark, PoseLandmarks};
use crate::detection::domain::topology::POSE_CONNECTIONS;
use crate::shared::constants::{FULL_BODY_LANDMARKS, UPPER_BODY_LANDMARKS};
use crate::shared::frame::{Frame, PixelOrder};

use super::execution_provider::ExecutionTarget;

/// Fallback model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 256;

/// Values per landmark in the model output: x, y, z, visibility, presence.
const VALUES_PER_LANDMARK: usize = 5;

/// Landmark counts a BlazePose landmark tensor may carry (including the
/// auxiliary ROI points appended after the body landmarks).
const LANDMARK_TENSOR_RANGE: std::ops::RangeInclusive<usize> = 25..=39;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TensorLayout {
    Nhwc,
    Nchw,
}

/// Pose landmark engine backed by an ONNX Runtime session.
pub struct OnnxPoseEngine {
    session: ort::session::Session,
    input_size: u32,
    layout: TensorLayout,
    decoder: PoseDecoder,
}

impl OnnxPoseEngine {
    /// Load a BlazePose landmark ONNX model.
    ///
    /// Input resolution and layout are read from the model's input shape
    /// (`[1, H, W, 3]` or `[1, 3, H, W]`). Falls back to 256 NHWC if the
    /// shape is dynamic or unreadable.
    pub fn new(
        model_path: &Path,
        target: ExecutionTarget,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_execution_providers(target.providers())?
            .commit_from_file(model_path)?;

        let (input_size, layout) = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() != 4 {
                        None
                    } else if shape[3] == 3 && shape[1] > 0 {
                        Some((shape[1] as u32, TensorLayout::Nhwc))
                    } else if shape[1] == 3 && shape[2] > 0 {
                        Some((shape[2] as u32, TensorLayout::Nchw))
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or((DEFAULT_INPUT_SIZE, TensorLayout::Nhwc));

        log::debug!(
            "Pose model loaded: input {input_size}x{input_size} {layout:?}, {} outputs, {}",
            session.outputs().len(),
            target.name()
        );

        Ok(Self {
            session,
            input_size,
            layout,
            decoder: PoseDecoder::default(),
        })
    }
}

impl PoseEngine for OnnxPoseEngine {
    fn infer(
        &mut self,
        rgb: &Frame,
        config: &DetectorConfig,
    ) -> Result<Option<PoseLandmarks>, Box<dyn std::error::Error>> {
        if rgb.order() != PixelOrder::Rgb {
            return Err("pose engine expects RGB frames".into());
        }
        if rgb.width() == 0 || rgb.height() == 0 {
            return Ok(None);
        }

        // 1. Preprocess: letterbox + normalize
        let (input_tensor, lb) = letterbox(rgb, self.input_size, self.layout);

        // 2. Inference; copy outputs out so the session borrow ends here
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        let mut raw = Vec::with_capacity(outputs.len());
        for i in 0..outputs.len() {
            let tensor = outputs[i].try_extract_array::<f32>()?;
            raw.push(tensor.iter().copied().collect::<Vec<f32>>());
        }
        drop(outputs);

        // 3. Decode, gate, smooth
        self.decoder.decode(&raw, &lb, rgb.width(), rgb.height(), config)
    }

    fn topology(&self) -> &[(usize, usize)] {
        &POSE_CONNECTIONS
    }
}

// ---------------------------------------------------------------------------
// Decoding state
// ---------------------------------------------------------------------------

/// Turns raw model outputs into landmarks, carrying the gate and smoother
/// state from one frame to the next.
#[derive(Default)]
struct PoseDecoder {
    gate: PresenceGate,
    smoother: LandmarkSmoother,
}

impl PoseDecoder {
    fn decode(
        &mut self,
        raw: &[Vec<f32>],
        lb: &Letterbox,
        frame_width: u32,
        frame_height: u32,
        config: &DetectorConfig,
    ) -> Result<Option<PoseLandmarks>, Box<dyn std::error::Error>> {
        let (landmark_idx, presence_idx) = select_outputs(raw)?;
        // The presence flag is a logit, like the per-landmark visibility.
        let presence = sigmoid(raw[presence_idx][0]);

        if !self.gate.admit(presence, config) {
            self.smoother.reset();
            return Ok(None);
        }

        let available = raw[landmark_idx].len() / VALUES_PER_LANDMARK;
        let mut count = available.min(FULL_BODY_LANDMARKS);
        if config.upper_body_only {
            count = count.min(UPPER_BODY_LANDMARKS);
        }
        let mut landmarks = decode_landmarks(&raw[landmark_idx], count, lb, frame_width, frame_height);

        if config.smooth_landmarks && config.tracks_across_frames() {
            landmarks = self.smoother.smooth(&landmarks);
        } else {
            self.smoother.reset();
        }

        Ok(Some(PoseLandmarks::new(landmarks, presence)))
    }
}

// ---------------------------------------------------------------------------
// Presence gating
// ---------------------------------------------------------------------------

/// Decides whether a presence score counts as a body.
///
/// A body found on the previous frame only has to clear the tracking
/// threshold; otherwise the detection threshold applies. Static-image mode
/// never carries state.
#[derive(Debug, Default)]
struct PresenceGate {
    tracking: bool,
}

impl PresenceGate {
    fn admit(&mut self, presence: f32, config: &DetectorConfig) -> bool {
        let tracking = self.tracking && config.tracks_across_frames();
        let threshold = if tracking {
            config.min_tracking_confidence
        } else {
            config.min_detection_confidence
        };
        let found = presence >= threshold;
        self.tracking = found && config.tracks_across_frames();
        found
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Geometry of a letterboxed model input.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Letterbox {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

/// Letterbox-resize an RGB frame to `target_size` × `target_size`, padding
/// with black. Values are normalized to `[0, 1]`.
fn letterbox(frame: &Frame, target_size: u32, layout: TensorLayout) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let size = target_size as usize;
    let shape = match layout {
        TensorLayout::Nhwc => (1, size, size, 3),
        TensorLayout::Nchw => (1, 3, size, size),
    };
    let mut tensor = ndarray::Array4::<f32>::zeros(shape);

    let src = frame.as_ndarray(); // [H, W, C] u8
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                let v = src[[src_y, src_x, c]] as f32 / 255.0;
                match layout {
                    TensorLayout::Nhwc => tensor[[0, ty, tx, c]] = v,
                    TensorLayout::Nchw => tensor[[0, c, ty, tx]] = v,
                }
            }
        }
    }

    (tensor, Letterbox { scale, pad_x, pad_y })
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

/// Picks the landmark tensor and the single-value presence flag.
fn select_outputs(outputs: &[Vec<f32>]) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let landmarks = outputs
        .iter()
        .position(|values| {
            values.len() % VALUES_PER_LANDMARK == 0
                && LANDMARK_TENSOR_RANGE.contains(&(values.len() / VALUES_PER_LANDMARK))
        })
        .ok_or("pose model has no landmark output")?;
    let presence = outputs
        .iter()
        .position(|values| values.len() == 1)
        .ok_or("pose model has no presence output")?;
    Ok((landmarks, presence))
}

/// Maps raw landmark values from letterbox pixels to frame-normalized coordinates.
fn decode_landmarks(
    values: &[f32],
    count: usize,
    lb: &Letterbox,
    frame_width: u32,
    frame_height: u32,
) -> Vec<NormalizedLandmark> {
    let fw = frame_width as f64;
    let fh = frame_height as f64;
    values
        .chunks_exact(VALUES_PER_LANDMARK)
        .take(count)
        .map(|v| {
            let x = (v[0] as f64 - lb.pad_x as f64) / lb.scale / fw;
            let y = (v[1] as f64 - lb.pad_y as f64) / lb.scale / fh;
            let z = v[2] as f64 / lb.scale / fw;
            NormalizedLandmark::new(x as f32, y as f32, z as f32, sigmoid(v[3]))
        })
        .collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
