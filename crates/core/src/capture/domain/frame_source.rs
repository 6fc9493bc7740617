use crate::shared::frame::Frame;

use super::capture_error::CaptureError;

/// Produces frames for the capture loop, one blocking read at a time.
///
/// Implementations own a device or file handle; `close` releases it and
/// must be safe to call more than once.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    fn close(&mut self);
}
