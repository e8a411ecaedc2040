use crate::skyline::Point;
use crate::viewer::model::SurfaceSize;
use crate::viewer::store::BoundingBox;

/// Fraction added around the content on each rescale.
pub const MARGIN_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl WorldRect {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Uniform world-to-screen mapping centered on the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub center: Point,
    pub visible: WorldRect,
    pub surface: SurfaceSize,
}

impl ViewTransform {
    /// Screen y grows downward, so world y is flipped.
    pub fn world_to_screen(&self, p: Point) -> [f32; 2] {
        let x = (p.x - self.center.x) * self.scale + self.surface.width / 2.0;
        let y = (self.center.y - p.y) * self.scale + self.surface.height / 2.0;
        [x as f32, y as f32]
    }
}

/// Fits `bounds` plus margin into `surface`; `None` when either is degenerate.
pub fn rescale(bounds: &BoundingBox, surface: SurfaceSize) -> Option<ViewTransform> {
    if bounds.is_empty() {
        return None;
    }
    let width = (bounds.x_max - bounds.x_min + 1.0) * MARGIN_FACTOR;
    let height = (bounds.y_max - bounds.y_min + 1.0) * MARGIN_FACTOR;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return None;
    }
    if !(surface.width > 0.0 && surface.height > 0.0) {
        return None;
    }

    let scale = (surface.width / width).min(surface.height / height);
    let center = bounds.center();
    let half_w = surface.width / scale / 2.0;
    let half_h = surface.height / scale / 2.0;
    Some(ViewTransform {
        scale,
        center,
        visible: WorldRect {
            x_min: center.x - half_w,
            x_max: center.x + half_w,
            y_min: center.y - half_h,
            y_max: center.y + half_h,
        },
        surface,
    })
}

/// Holds the last good transform; degenerate inputs leave it in place.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    current: Option<ViewTransform>,
}

impl Viewport {
    pub fn update(&mut self, bounds: &BoundingBox, surface: SurfaceSize) -> bool {
        match rescale(bounds, surface) {
            Some(transform) => {
                if self.current != Some(transform) {
                    tracing::debug!(
                        scale = transform.scale,
                        cx = transform.center.x,
                        cy = transform.center.y,
                        "viewport rescaled"
                    );
                }
                self.current = Some(transform);
                true
            }
            None => false,
        }
    }

    pub fn transform(&self) -> Option<&ViewTransform> {
        self.current.as_ref()
    }
}
