//! Line protocol between producer and viewer process.
//!
//! One segment per line as `(x1,y1) (x2,y2)`, and a blank line after each
//! overlay. No framing and no acknowledgement.

use crate::skyline::Segment;
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, Write};

pub fn write_overlay<W: Write>(w: &mut W, overlay: &[Segment]) -> std::io::Result<()> {
    for segment in overlay {
        let [x1, y1, x2, y2] = segment.coords();
        writeln!(w, "({x1:.6},{y1:.6}) ({x2:.6},{y2:.6})")?;
    }
    writeln!(w)?;
    w.flush()
}

fn parse_point(text: &str) -> Result<(f64, f64)> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| anyhow!("point not parenthesized: {text:?}"))?;
    let (x, y) = inner
        .split_once(',')
        .ok_or_else(|| anyhow!("point missing comma: {text:?}"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .with_context(|| format!("bad x in {text:?}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .with_context(|| format!("bad y in {text:?}"))?;
    Ok((x, y))
}

pub fn parse_segment_line(line: &str) -> Result<Segment> {
    let (first, second) = line
        .trim()
        .split_once(") ")
        .map(|(a, b)| (format!("{a})"), b.to_string()))
        .ok_or_else(|| anyhow!("expected two points: {line:?}"))?;
    let (x1, y1) = parse_point(&first)?;
    let (x2, y2) = parse_point(&second)?;
    Segment::new(x1, y1, x2, y2).ok_or_else(|| anyhow!("non-finite segment: {line:?}"))
}

/// Accumulates segment lines until a blank line closes the overlay.
#[derive(Debug, Default)]
pub struct OverlayDecoder {
    pending: Vec<Segment>,
}

impl OverlayDecoder {
    pub fn push_line(&mut self, line: &str) -> Option<Vec<Segment>> {
        if line.trim().is_empty() {
            return Some(std::mem::take(&mut self.pending));
        }
        match parse_segment_line(line) {
            Ok(segment) => self.pending.push(segment),
            Err(err) => tracing::warn!(%err, "skipping malformed segment line"),
        }
        None
    }

    /// Segments received after the last blank line, if any.
    pub fn finish(self) -> Option<Vec<Segment>> {
        (!self.pending.is_empty()).then_some(self.pending)
    }
}

/// Reads overlays until end of input, handing each to `sink` as it completes.
pub fn read_overlays<R: BufRead>(reader: R, mut sink: impl FnMut(Vec<Segment>)) -> Result<()> {
    let mut decoder = OverlayDecoder::default();
    for line in reader.lines() {
        let line = line.context("read overlay stream")?;
        if let Some(overlay) = decoder.push_line(&line) {
            sink(overlay);
        }
    }
    if let Some(rest) = decoder.finish() {
        sink(rest);
    }
    Ok(())
}
