pub mod detector_config;
pub mod landmark_smoother;
pub mod pose_detector;
pub mod pose_engine;
pub mod pose_landmarks;
pub mod topology;
