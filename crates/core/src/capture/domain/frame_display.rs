use crate::shared::frame::Frame;

/// A window that shows annotated frames and reports key presses.
pub trait FrameDisplay {
    /// Shows `frame`, with `overlay_text` drawn in the top-left area if given.
    fn show(
        &mut self,
        frame: &Frame,
        overlay_text: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits up to `timeout_ms` for a key press.
    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>>;

    /// Closes the window. Safe to call more than once.
    fn close(&mut self);
}
