/// Axis-aligned box in pixel coordinates, stored as corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Tight box around a set of pixel-space points. `None` when empty.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let mut bbox = Self::new(x0, y0, x0, y0);
        for (x, y) in iter {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        Some(bbox)
    }

    /// Grows every side outward by `pixels`.
    pub fn padded(&self, pixels: f64) -> Self {
        Self::new(
            self.min_x - pixels,
            self.min_y - pixels,
            self.max_x + pixels,
            self.max_y + pixels,
        )
    }

    /// Scales width and height by `factor` about the box center.
    pub fn scaled(&self, factor: f64) -> Self {
        let (cx, cy) = self.center();
        let half_w = self.width() / 2.0 * factor;
        let half_h = self.height() / 2.0 * factor;
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    /// Clamps every coordinate to `[0, frame_w - 1] x [0, frame_h - 1]`.
    pub fn clamped(&self, frame_w: u32, frame_h: u32) -> Self {
        let max_x = (frame_w.max(1) - 1) as f64;
        let max_y = (frame_h.max(1) - 1) as f64;
        Self::new(
            self.min_x.clamp(0.0, max_x),
            self.min_y.clamp(0.0, max_y),
            self.max_x.clamp(0.0, max_x),
            self.max_y.clamp(0.0, max_y),
        )
    }

    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let iw = (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0);
        let ih = (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0);
        iw * ih
    }

    /// Intersection over union. Never negative and never NaN: disjoint or
    /// degenerate boxes yield 0.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let inter = self.intersection_area(other);
        if inter <= 0.0 {
            return 0.0;
        }
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            return 0.0;
        }
        inter / union
    }
}
