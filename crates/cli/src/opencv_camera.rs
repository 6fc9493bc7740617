use opencv::core::{Mat, CV_8UC3};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use posetrack_core::capture::domain::capture_error::CaptureError;
use posetrack_core::capture::domain::frame_source::FrameSource;
use posetrack_core::shared::frame::{Frame, PixelOrder};

/// Live frames from an OpenCV capture device.
///
/// The device is released on `close` or, failing that, on drop.
pub struct OpencvCamera {
    capture: Option<VideoCapture>,
    device: i32,
    next_index: usize,
}

impl OpencvCamera {
    pub fn open(device: i32) -> Result<Self, CaptureError> {
        let capture = VideoCapture::new(device, videoio::CAP_ANY).map_err(backend)?;
        if !capture.is_opened().map_err(backend)? {
            return Err(CaptureError::DeviceUnavailable(device));
        }
        log::info!("Opened camera {device}");
        Ok(Self {
            capture: Some(capture),
            device,
            next_index: 0,
        })
    }
}

impl FrameSource for OpencvCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let capture = self.capture.as_mut().ok_or(CaptureError::ReadFailure)?;

        let mut mat = Mat::default();
        let grabbed = capture.read(&mut mat).map_err(backend)?;
        if !grabbed || mat.empty() {
            return Err(CaptureError::ReadFailure);
        }
        if mat.typ() != CV_8UC3 {
            return Err(CaptureError::Backend(format!(
                "unsupported camera frame type {}",
                mat.typ()
            )));
        }
        // Row padding would break the flat byte layout Frame expects.
        let mat = if mat.is_continuous() {
            mat
        } else {
            mat.try_clone().map_err(backend)?
        };

        let data = mat.data_bytes().map_err(backend)?.to_vec();
        let frame = Frame::new(
            data,
            mat.cols() as u32,
            mat.rows() as u32,
            PixelOrder::Bgr,
            self.next_index,
        );
        self.next_index += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera {}: {e}", self.device);
            }
            log::info!("Released camera {}", self.device);
        }
    }
}

impl Drop for OpencvCamera {
    fn drop(&mut self) {
        self.close();
    }
}

fn backend(e: opencv::Error) -> CaptureError {
    CaptureError::Backend(e.to_string())
}
