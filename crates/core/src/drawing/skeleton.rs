use crate::detection::domain::pose_landmarks::NormalizedLandmark;
use crate::shared::frame::{Frame, Rgb};

use super::canvas::{draw_line, fill_circle};

/// Landmarks less visible than this are neither dotted nor connected.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonStyle {
    pub joint_color: Rgb,
    pub joint_radius: u32,
    pub connection_color: Rgb,
    pub connection_thickness: u32,
}

impl Default for SkeletonStyle {
    fn default() -> Self {
        Self {
            joint_color: Rgb::RED,
            joint_radius: 2,
            connection_color: Rgb::LIGHT_GRAY,
            connection_thickness: 2,
        }
    }
}

/// Draws joints and the connections between them onto `frame`.
///
/// Landmarks outside the frame or below [`VISIBILITY_THRESHOLD`] are skipped,
/// along with every connection touching them. Connections referencing an
/// index past the end of `landmarks` are ignored.
pub fn draw_landmarks(
    frame: &mut Frame,
    landmarks: &[NormalizedLandmark],
    topology: &[(usize, usize)],
    style: &SkeletonStyle,
) {
    let (w, h) = (frame.width(), frame.height());
    let points: Vec<Option<(i32, i32)>> = landmarks
        .iter()
        .map(|lm| {
            if lm.visibility < VISIBILITY_THRESHOLD || !lm.is_inside_frame() {
                return None;
            }
            let (x, y) = lm.to_pixel(w, h);
            Some((x as i32, y as i32))
        })
        .collect();

    for &(a, b) in topology {
        if let (Some(Some(start)), Some(Some(end))) = (points.get(a), points.get(b)) {
            draw_line(
                frame,
                *start,
                *end,
                style.connection_color,
                style.connection_thickness,
            );
        }
    }

    // Joints go on top of the lines.
    for point in points.iter().flatten() {
        fill_circle(frame, *point, style.joint_radius, style.joint_color);
    }
}
