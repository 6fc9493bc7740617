use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("could not open camera {0}")]
    DeviceUnavailable(i32),
    #[error("failed to grab frame")]
    ReadFailure,
    #[error("could not read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("capture backend error: {0}")]
    Backend(String),
}
