use std::path::Path;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::{Frame, PixelOrder};

/// Serves a single decoded image as an endless stream of identical frames.
///
/// Each read returns a fresh copy so overlays drawn on one frame never leak
/// into the next.
pub struct ImageFileSource {
    frame: Option<Frame>,
    reads: usize,
}

impl ImageFileSource {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let img = image::open(path)
            .map_err(|source| CaptureError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let (width, height) = img.dimensions();
        log::debug!("Loaded {}x{} image from {}", width, height, path.display());
        Ok(Self {
            frame: Some(Frame::new(img.into_raw(), width, height, PixelOrder::Rgb, 0)),
            reads: 0,
        })
    }
}

impl FrameSource for ImageFileSource {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let mut frame = self.frame.clone().ok_or(CaptureError::ReadFailure)?;
        frame.set_index(self.reads);
        self.reads += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Rgb;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("test.png");
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_open_decodes_rgb_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let mut source = ImageFileSource::open(&path).unwrap();

        let frame = source.read_frame().unwrap();
        assert_eq!(frame.width(), 100);
        assert_eq!(frame.height(), 80);
        assert_eq!(frame.order(), PixelOrder::Rgb);
        assert_eq!(frame.pixel(0, 0), Some(Rgb(50, 100, 200)));
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let result = ImageFileSource::open(Path::new("/nonexistent/test.png"));
        assert!(matches!(result, Err(CaptureError::Image { .. })));
    }

    #[test]
    fn test_reads_are_independent_copies() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 10, 10);
        let mut source = ImageFileSource::open(&path).unwrap();

        let mut first = source.read_frame().unwrap();
        first.set_pixel(0, 0, Rgb::MAGENTA);
        let second = source.read_frame().unwrap();

        assert_eq!(second.pixel(0, 0), Some(Rgb(50, 100, 200)));
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn test_read_after_close_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 10, 10);
        let mut source = ImageFileSource::open(&path).unwrap();
        source.close();
        source.close();
        assert!(matches!(source.read_frame(), Err(CaptureError::ReadFailure)));
    }
}
