use crate::skyline::Segment;
use crate::viewer::messages::ViewerTask;
use crate::viewer::model::{Overlay, OverlayColor, SurfaceSize};
use crate::viewer::render::{build_draw_lines, DrawLine};
use crate::viewer::store::{BoundingBox, OverlayStore};
use crate::viewer::viewport::{ViewTransform, Viewport};

/// All mutable viewer state. Lives on the renderer's loop only.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    store: OverlayStore,
    viewport: Viewport,
    surface: Option<SurfaceSize>,
}

impl ViewerState {
    pub fn new(palette: Vec<OverlayColor>) -> Self {
        Self {
            store: OverlayStore::new(palette),
            viewport: Viewport::default(),
            surface: None,
        }
    }

    pub fn apply(&mut self, task: ViewerTask) {
        match task {
            ViewerTask::AddOverlay { segments } => self.add_overlay(segments),
        }
    }

    pub fn add_overlay(&mut self, segments: Vec<Segment>) {
        let overlay = self.store.add_overlay(segments);
        tracing::debug!(
            segments = overlay.segments.len(),
            color = ?overlay.color,
            "overlay added"
        );
        self.recompute();
    }

    /// Returns whether the surface size actually changed.
    pub fn resize(&mut self, surface: SurfaceSize) -> bool {
        if self.surface == Some(surface) {
            return false;
        }
        self.surface = Some(surface);
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        if let Some(surface) = self.surface {
            self.viewport.update(&self.store.bounds(), surface);
        }
    }

    pub fn draw_lines(&self, stroke_width: f32) -> Vec<DrawLine> {
        build_draw_lines(
            self.store.overlays(),
            self.viewport.transform(),
            stroke_width,
        )
    }

    pub fn overlays(&self) -> &[Overlay] {
        self.store.overlays()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.store.bounds()
    }

    pub fn transform(&self) -> Option<&ViewTransform> {
        self.viewport.transform()
    }
}
