//! Single-frame collision classification.
//!
//! A pair of faces is a collision when their hitboxes overlap in 2D and
//! every 3D proximity gate passes: depth difference, centroid distance in
//! 3D, hitbox size ratio, and centroid distance in 2D.

use crate::collision::domain::collision_thresholds::CollisionThresholds;
use crate::collision::domain::face_summary::FaceSummary;

/// Pass/fail of every gate for one pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateResults {
    pub overlap: bool,
    pub depth: bool,
    pub distance_3d: bool,
    pub size: bool,
    pub close_2d: bool,
}

impl GateResults {
    pub fn all_passed(&self) -> bool {
        self.overlap && self.depth && self.distance_3d && self.size && self.close_2d
    }
}

/// Diagnostic measurements for one evaluated pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairMetrics {
    pub iou: f64,
    /// Depth difference after scaling into pixel units.
    pub depth_diff: f64,
    /// Pixel distance between the two centroids, ignoring depth.
    pub distance_2d: f64,
    pub distance_3d: f64,
    pub size_ratio: f64,
    pub gates: GateResults,
}

/// Outcome of classifying every face seen in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub collision_now: bool,
    /// Indices of the evaluated pair, `None` when fewer than two faces.
    pub pair: Option<(usize, usize)>,
    pub metrics: Option<PairMetrics>,
}

impl Classification {
    fn no_pair() -> Self {
        Self {
            collision_now: false,
            pair: None,
            metrics: None,
        }
    }
}

pub struct CollisionClassifier {
    thresholds: CollisionThresholds,
}

impl CollisionClassifier {
    pub fn new(thresholds: CollisionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &CollisionThresholds {
        &self.thresholds
    }

    /// Classifies a frame's faces.
    ///
    /// With more than two faces the pair with the highest IoU is evaluated.
    pub fn classify(&self, faces: &[FaceSummary], frame_w: u32, frame_h: u32) -> Classification {
        let Some((i, j)) = best_overlapping_pair(faces) else {
            return Classification::no_pair();
        };
        let metrics = self.assess_pair(&faces[i], &faces[j], frame_w, frame_h);
        Classification {
            collision_now: metrics.gates.all_passed(),
            pair: Some((i, j)),
            metrics: Some(metrics),
        }
    }

    pub fn assess_pair(
        &self,
        a: &FaceSummary,
        b: &FaceSummary,
        frame_w: u32,
        frame_h: u32,
    ) -> PairMetrics {
        let t = &self.thresholds;

        let iou = a.hitbox.iou(&b.hitbox);

        let depth_diff = (a.mean_depth() - b.mean_depth()).abs() * t.depth_scale_factor;

        let dx = (a.centroid.x - b.centroid.x) * frame_w as f64;
        let dy = (a.centroid.y - b.centroid.y) * frame_h as f64;
        let distance_2d = dx.hypot(dy);
        let distance_3d = distance_2d.hypot(depth_diff);

        let (area_a, area_b) = (a.area(), b.area());
        let larger = area_a.max(area_b);
        let smaller = area_a.min(area_b);
        let size_ratio = if larger > 0.0 { smaller / larger } else { 0.0 };

        let close_2d_limit = t.close_2d_factor * smaller.sqrt();

        let gates = GateResults {
            overlap: iou >= t.iou_threshold,
            depth: depth_diff < t.depth_diff_max,
            distance_3d: distance_3d < t.dist_3d_max,
            size: size_ratio > t.size_ratio_threshold,
            close_2d: distance_2d < close_2d_limit,
        };

        PairMetrics {
            iou,
            depth_diff,
            distance_2d,
            distance_3d,
            size_ratio,
            gates,
        }
    }
}

impl Default for CollisionClassifier {
    fn default() -> Self {
        Self::new(CollisionThresholds::default())
    }
}

fn best_overlapping_pair(faces: &[FaceSummary]) -> Option<(usize, usize)> {
    if faces.len() < 2 {
        return None;
    }
    let mut best = (0, 1);
    let mut best_iou = faces[0].hitbox.iou(&faces[1].hitbox);
    for i in 0..faces.len() {
        for j in (i + 1)..faces.len() {
            let iou = faces[i].hitbox.iou(&faces[j].hitbox);
            if iou > best_iou {
                best_iou = iou;
                best = (i, j);
            }
        }
    }
    Some(best)
}
