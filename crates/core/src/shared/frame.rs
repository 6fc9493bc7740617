use ndarray::{ArrayView3, ArrayViewMut3};

/// Channel order of the bytes in a [`Frame`].
///
/// Camera captures arrive as BGR; decoded image files and model input are RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelOrder {
    Rgb,
    Bgr,
}

/// An RGB color, independent of any frame's channel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);
    pub const LIGHT_GRAY: Rgb = Rgb(224, 224, 224);
}

/// A single video/image frame: contiguous 3-channel bytes in row-major order.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    order: PixelOrder,
    index: usize,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    pub fn new(data: Vec<u8>, width: u32, height: u32, order: PixelOrder, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * Self::CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            order,
            index,
        }
    }

    /// A frame filled with a single color.
    pub fn filled(width: u32, height: u32, order: PixelOrder, color: Rgb) -> Self {
        let px = encode(order, color);
        let data = px.repeat((width as usize) * (height as usize));
        Self::new(data, width, height, order, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> PixelOrder {
        self.order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Returns a copy of this frame with channels in RGB order.
    pub fn to_rgb(&self) -> Frame {
        self.to_order(PixelOrder::Rgb)
    }

    /// Returns a copy of this frame with channels in BGR order.
    pub fn to_bgr(&self) -> Frame {
        self.to_order(PixelOrder::Bgr)
    }

    fn to_order(&self, order: PixelOrder) -> Frame {
        let mut out = self.clone();
        if self.order != order {
            for px in out.data.chunks_exact_mut(Self::CHANNELS) {
                px.swap(0, 2);
            }
            out.order = order;
        }
        out
    }

    /// Flips the frame left-to-right in place.
    pub fn mirror_horizontal(&mut self) {
        let row_len = self.width as usize * Self::CHANNELS;
        if row_len == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_len) {
            let (mut left, mut right) = (0, self.width as usize - 1);
            while left < right {
                for c in 0..Self::CHANNELS {
                    row.swap(left * Self::CHANNELS + c, right * Self::CHANNELS + c);
                }
                left += 1;
                right -= 1;
            }
        }
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        let offset = self.offset(x, y)?;
        let px = &self.data[offset..offset + Self::CHANNELS];
        Some(match self.order {
            PixelOrder::Rgb => Rgb(px[0], px[1], px[2]),
            PixelOrder::Bgr => Rgb(px[2], px[1], px[0]),
        })
    }

    /// Writes `color` at `(x, y)`. Coordinates outside the frame are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(offset) = self.offset(x, y) {
            self.data[offset..offset + Self::CHANNELS].copy_from_slice(&encode(self.order, color));
        }
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * Self::CHANNELS)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, Self::CHANNELS)
    }
}

fn encode(order: PixelOrder, Rgb(r, g, b): Rgb) -> [u8; 3] {
    match order {
        PixelOrder::Rgb => [r, g, b],
        PixelOrder::Bgr => [b, g, r],
    }
}
