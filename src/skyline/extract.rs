use crate::skyline::model::{Building, Point, Segment, Skyline, SkylinePair};

/// Maximum number of endpoint pairs rendered from one raw segment list.
pub const RAW_SEGMENT_CAP: usize = 1000;

/// Frame in which a skyline's buildings are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    /// Stored rotated; segments are reflected across y = x.
    Horizontal,
}

impl Orientation {
    fn orient(self, segment: Segment) -> Segment {
        match self {
            Self::Vertical => segment,
            Self::Horizontal => segment.swapped(),
        }
    }
}

fn building_to_segment(building: &Building, d: f64) -> Option<Segment> {
    let y0 = building.y_intercept * d;
    let m = building.slope * d;
    let (x1, x2) = (building.start, building.end);
    if y0.is_infinite() || x1.is_infinite() || x2.is_infinite() {
        return None;
    }
    Segment::new(x1, y0 + m * x1, x2, y0 + m * x2)
}

/// Converts each building independently; sentinel and otherwise
/// non-finite buildings are dropped.
pub fn extract(skyline: &Skyline, orientation: Orientation) -> Vec<Segment> {
    let d = skyline.sky.sign();
    skyline
        .buildings
        .iter()
        .filter_map(|b| building_to_segment(b, d))
        .map(|s| orientation.orient(s))
        .collect()
}

/// One segment list per skyline, in storage order.
pub fn extract_pair(pair: &SkylinePair, orientation: Orientation) -> [Vec<Segment>; 2] {
    [
        extract(&pair.skylines[0], orientation),
        extract(&pair.skylines[1], orientation),
    ]
}

/// Endpoint pairs become segments directly, truncated at [`RAW_SEGMENT_CAP`].
pub fn extract_raw(pairs: &[[Point; 2]]) -> Vec<Segment> {
    if pairs.len() > RAW_SEGMENT_CAP {
        tracing::debug!(
            total = pairs.len(),
            cap = RAW_SEGMENT_CAP,
            "truncating raw segment list"
        );
    }
    pairs
        .iter()
        .take(RAW_SEGMENT_CAP)
        .filter_map(|[start, end]| Segment::from_points(*start, *end))
        .collect()
}
