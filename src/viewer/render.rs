use crate::viewer::model::{Overlay, OverlayColor};
use crate::viewer::viewport::ViewTransform;

/// A screen-space line relative to the drawing surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawLine {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: OverlayColor,
    pub width: f32,
}

/// Lines for every overlay in insertion order, so later overlays paint on top.
pub fn build_draw_lines(
    overlays: &[Overlay],
    view: Option<&ViewTransform>,
    stroke_width: f32,
) -> Vec<DrawLine> {
    let Some(view) = view else {
        return Vec::new();
    };
    overlays
        .iter()
        .flat_map(|overlay| {
            overlay.segments.iter().map(move |segment| DrawLine {
                from: view.world_to_screen(segment.start()),
                to: view.world_to_screen(segment.end()),
                color: overlay.color,
                width: stroke_width,
            })
        })
        .collect()
}

pub fn to_color32(color: OverlayColor) -> eframe::egui::Color32 {
    eframe::egui::Color32::from_rgb(color.r, color.g, color.b)
}

pub fn paint(painter: &eframe::egui::Painter, origin: eframe::egui::Pos2, lines: &[DrawLine]) {
    use eframe::egui::{vec2, Stroke};

    for line in lines {
        painter.line_segment(
            [
                origin + vec2(line.from[0], line.from[1]),
                origin + vec2(line.to[0], line.to[1]),
            ],
            Stroke::new(line.width, to_color32(line.color)),
        );
    }
}
