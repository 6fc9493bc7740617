/// File name looked up in the model cache and bundled model directory.
pub const POSE_MODEL_NAME: &str = "pose_landmark_full.onnx";

/// Directory checked for a pre-packaged model, relative to the working directory.
pub const BUNDLED_MODEL_DIR: &str = "models";

/// Landmarks produced by the full-body BlazePose model.
pub const FULL_BODY_LANDMARKS: usize = 33;

/// Landmarks kept in upper-body mode (nose through the hips).
pub const UPPER_BODY_LANDMARKS: usize = 25;

/// Title of the display window.
pub const WINDOW_TITLE: &str = "Image";

/// Key that ends the capture loop.
pub const EXIT_KEY: char = 'q';

/// Key poll timeout per loop iteration.
pub const KEY_POLL_MS: i32 = 1;
