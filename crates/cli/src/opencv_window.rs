use opencv::core::{Mat, Point, Scalar, CV_8UC3};
use opencv::prelude::*;
use opencv::{highgui, imgproc};

use posetrack_core::capture::domain::frame_display::FrameDisplay;
use posetrack_core::shared::frame::Frame;

const OVERLAY_ORIGIN: (i32, i32) = (70, 50);
const OVERLAY_SCALE: f64 = 3.0;
const OVERLAY_THICKNESS: i32 = 3;

/// A highgui window showing annotated frames.
pub struct OpencvWindow {
    title: String,
    open: bool,
}

impl OpencvWindow {
    pub fn new(title: &str) -> Result<Self, opencv::Error> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
            open: true,
        })
    }
}

impl FrameDisplay for OpencvWindow {
    fn show(
        &mut self,
        frame: &Frame,
        overlay_text: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let bgr = frame.to_bgr();
        let mut mat = Mat::new_rows_cols_with_default(
            bgr.height() as i32,
            bgr.width() as i32,
            CV_8UC3,
            Scalar::all(0.0),
        )?;
        mat.data_bytes_mut()?.copy_from_slice(bgr.data());

        if let Some(text) = overlay_text {
            imgproc::put_text(
                &mut mat,
                text,
                Point::new(OVERLAY_ORIGIN.0, OVERLAY_ORIGIN.1),
                imgproc::FONT_HERSHEY_PLAIN,
                OVERLAY_SCALE,
                // BGR blue
                Scalar::new(255.0, 0.0, 0.0, 0.0),
                OVERLAY_THICKNESS,
                imgproc::LINE_8,
                false,
            )?;
        }

        highgui::imshow(&self.title, &mat)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>> {
        let key = highgui::wait_key(timeout_ms)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(Some(char::from((key & 0xFF) as u8)))
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = highgui::destroy_window(&self.title) {
            log::warn!("Failed to close window {}: {e}", self.title);
        }
    }
}

impl Drop for OpencvWindow {
    fn drop(&mut self) {
        self.close();
    }
}
