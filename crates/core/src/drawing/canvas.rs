//! Raster primitives that draw straight into a [`Frame`] through
//! `embedded-graphics`.
//!
//! All operations overwrite pixels (no blending) and silently clip to the
//! frame bounds.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};

use crate::shared::frame::{Frame, Rgb};

/// Fills a disc of `radius` pixels around `center`. Radius 0 is one pixel.
pub fn fill_circle(frame: &mut Frame, center: (i32, i32), radius: u32, color: Rgb) {
    let diameter = radius * 2 + 1;
    let style = PrimitiveStyle::with_fill(to_rgb888(color));
    draw_infallible(
        Circle::with_center(Point::new(center.0, center.1), diameter)
            .into_styled(style)
            .draw(&mut Target(frame)),
    );
}

/// Draws a line segment `thickness` pixels wide.
pub fn draw_line(frame: &mut Frame, from: (i32, i32), to: (i32, i32), color: Rgb, thickness: u32) {
    let style = PrimitiveStyle::with_stroke(to_rgb888(color), thickness.max(1));
    draw_infallible(
        Line::new(Point::new(from.0, from.1), Point::new(to.0, to.1))
            .into_styled(style)
            .draw(&mut Target(frame)),
    );
}

fn to_rgb888(Rgb(r, g, b): Rgb) -> Rgb888 {
    Rgb888::new(r, g, b)
}

fn draw_infallible(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(infallible) => match infallible {},
    }
}

struct Target<'a>(&'a mut Frame);

impl OriginDimensions for Target<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for Target<'_> {
    type Color = Rgb888;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // set_pixel drops anything outside the frame
            self.0.set_pixel(
                point.x as i64,
                point.y as i64,
                Rgb(color.r(), color.g(), color.b()),
            );
        }
        Ok(())
    }
}
