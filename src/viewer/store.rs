use crate::skyline::{Point, Segment};
use crate::viewer::model::{default_palette, Overlay, OverlayColor, MIN_PALETTE_LEN};

/// Running extent of every point ever added. Starts inverted and only widens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        y_min: f64::INFINITY,
        y_max: f64::NEG_INFINITY,
    };

    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    pub fn include_point(&mut self, p: Point) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    pub fn include_segment(&mut self, segment: &Segment) {
        self.include_point(segment.start());
        self.include_point(segment.end());
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Overlays in display order plus the box spanning all of them.
#[derive(Debug, Clone)]
pub struct OverlayStore {
    overlays: Vec<Overlay>,
    bounds: BoundingBox,
    palette: Vec<OverlayColor>,
    next_color: usize,
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self::new(default_palette())
    }
}

impl OverlayStore {
    pub fn new(palette: Vec<OverlayColor>) -> Self {
        let palette = if palette.len() < MIN_PALETTE_LEN {
            tracing::warn!(
                len = palette.len(),
                "overlay palette too small; using default palette"
            );
            default_palette()
        } else {
            palette
        };
        Self {
            overlays: Vec::new(),
            bounds: BoundingBox::EMPTY,
            palette,
            next_color: 0,
        }
    }

    /// Appends a new overlay on top of the existing ones and returns it.
    pub fn add_overlay(&mut self, segments: Vec<Segment>) -> &Overlay {
        let color = self.palette[self.next_color];
        self.next_color = (self.next_color + 1) % self.palette.len();
        for segment in &segments {
            self.bounds.include_segment(segment);
        }
        self.overlays.push(Overlay { color, segments });
        &self.overlays[self.overlays.len() - 1]
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}
