pub mod extract;
pub mod model;

pub use extract::{extract, extract_pair, extract_raw, Orientation, RAW_SEGMENT_CAP};
pub use model::{Axis, Building, Direction, Interval, Point, Rect, Segment, Skyline, SkylinePair};
