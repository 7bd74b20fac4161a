use ndarray::{s, ArrayViewMut3};

use crate::collision::domain::frame_verdict::FrameVerdict;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

const GREEN: [u8; 3] = [0, 200, 0];
const RED: [u8; 3] = [255, 0, 0];

const DEFAULT_BOX_THICKNESS: usize = 2;
const DEFAULT_BORDER_THICKNESS: usize = 3;

/// Draws the collision HUD onto a frame in place: one outline per face
/// hitbox, plus a red border around the whole frame while a collision is
/// in progress.
pub struct HudOverlay {
    box_thickness: usize,
    border_thickness: usize,
}

impl HudOverlay {
    pub fn new(box_thickness: usize, border_thickness: usize) -> Self {
        Self {
            box_thickness,
            border_thickness,
        }
    }

    pub fn draw(&self, frame: &mut Frame, verdict: &FrameVerdict) {
        let color = if verdict.collision_now { RED } else { GREEN };
        let mut pixels = frame.as_ndarray_mut();

        for face in &verdict.faces {
            outline(&mut pixels, &face.hitbox, self.box_thickness, color);
        }

        if verdict.collision_now {
            let (h, w, _) = pixels.dim();
            if w > 0 && h > 0 {
                let whole = BoundingBox::new(0.0, 0.0, (w - 1) as f64, (h - 1) as f64);
                outline(&mut pixels, &whole, self.border_thickness, RED);
            }
        }
    }
}

impl Default for HudOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_THICKNESS, DEFAULT_BORDER_THICKNESS)
    }
}

/// Strokes the inside edge of `bbox` with `thickness` pixels of `color`.
fn outline(
    pixels: &mut ArrayViewMut3<'_, u8>,
    bbox: &BoundingBox,
    thickness: usize,
    color: [u8; 3],
) {
    let (h, w, channels) = pixels.dim();
    if w == 0 || h == 0 || thickness == 0 {
        return;
    }
    let x0 = (bbox.min_x.max(0.0) as usize).min(w - 1);
    let y0 = (bbox.min_y.max(0.0) as usize).min(h - 1);
    let x1 = (bbox.max_x.max(0.0) as usize).min(w - 1);
    let y1 = (bbox.max_y.max(0.0) as usize).min(h - 1);
    if x1 < x0 || y1 < y0 {
        return;
    }
    let t = thickness;
    let spans = [
        (y0, (y0 + t).min(y1 + 1), x0, x1 + 1),
        ((y1 + 1).saturating_sub(t).max(y0), y1 + 1, x0, x1 + 1),
        (y0, y1 + 1, x0, (x0 + t).min(x1 + 1)),
        (y0, y1 + 1, (x1 + 1).saturating_sub(t).max(x0), x1 + 1),
    ];
    let n = channels.min(color.len());
    for (ya, yb, xa, xb) in spans {
        let mut region = pixels.slice_mut(s![ya..yb, xa..xb, ..]);
        for c in 0..n {
            region.slice_mut(s![.., .., c]).fill(color[c]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::domain::face_summary::FaceSummary;
    use crate::detection::domain::face_landmarks::LandmarkPoint;

    fn verdict(collision_now: bool, faces: Vec<FaceSummary>) -> FrameVerdict {
        FrameVerdict {
            timestamp: 0.0,
            collision_now,
            confirmed: false,
            rising_edge: false,
            streak: 0,
            episodes: 0,
            metrics: None,
            faces,
            poses: Vec::new(),
        }
    }

    fn face(x1: f64, y1: f64, x2: f64, y2: f64) -> FaceSummary {
        FaceSummary::new(BoundingBox::new(x1, y1, x2, y2), LandmarkPoint::new(0.0, 0.0, 0.0))
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let arr = frame.as_ndarray();
        [arr[[y, x, 0]], arr[[y, x, 1]], arr[[y, x, 2]]]
    }

    #[test]
    fn test_no_faces_no_collision_leaves_frame_untouched() {
        let mut frame = Frame::blank(20, 20, 0, 0.0);
        HudOverlay::default().draw(&mut frame, &verdict(false, vec![]));
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_face_outline_is_green_without_collision() {
        let mut frame = Frame::blank(20, 20, 0, 0.0);
        HudOverlay::default().draw(&mut frame, &verdict(false, vec![face(5.0, 5.0, 14.0, 14.0)]));
        assert_eq!(pixel(&frame, 5, 5), GREEN);
        assert_eq!(pixel(&frame, 14, 10), GREEN);
        // interior untouched
        assert_eq!(pixel(&frame, 10, 10), [0, 0, 0]);
        // outside untouched
        assert_eq!(pixel(&frame, 0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_collision_draws_red_border_and_boxes() {
        let mut frame = Frame::blank(20, 20, 0, 0.0);
        HudOverlay::default().draw(&mut frame, &verdict(true, vec![face(5.0, 5.0, 14.0, 14.0)]));
        assert_eq!(pixel(&frame, 0, 0), RED);
        assert_eq!(pixel(&frame, 19, 19), RED);
        assert_eq!(pixel(&frame, 2, 10), RED);
        assert_eq!(pixel(&frame, 3, 10), [0, 0, 0]);
        assert_eq!(pixel(&frame, 5, 5), RED);
    }

    #[test]
    fn test_box_outside_frame_is_clipped() {
        let mut frame = Frame::blank(10, 10, 0, 0.0);
        HudOverlay::default().draw(&mut frame, &verdict(false, vec![face(-5.0, -5.0, 50.0, 50.0)]));
        assert_eq!(pixel(&frame, 0, 0), GREEN);
        assert_eq!(pixel(&frame, 9, 9), GREEN);
    }
}
