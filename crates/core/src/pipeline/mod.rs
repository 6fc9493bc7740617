pub mod frame_rate;
pub mod track_pose_use_case;
pub mod tracking_logger;
