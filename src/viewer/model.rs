use crate::skyline::Segment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverlayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl OverlayColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const MIN_PALETTE_LEN: usize = 6;

pub const DEFAULT_PALETTE: [OverlayColor; 8] = [
    OverlayColor::rgb(220, 20, 60),
    OverlayColor::rgb(30, 90, 220),
    OverlayColor::rgb(20, 150, 60),
    OverlayColor::rgb(240, 140, 0),
    OverlayColor::rgb(140, 60, 200),
    OverlayColor::rgb(0, 170, 190),
    OverlayColor::rgb(210, 50, 170),
    OverlayColor::rgb(120, 80, 30),
];

pub fn default_palette() -> Vec<OverlayColor> {
    DEFAULT_PALETTE.to_vec()
}

/// One delivered batch of segments and the color it was assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub color: OverlayColor,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
