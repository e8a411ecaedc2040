use std::ops::Index;

/// Widths below this are treated as empty when building a skyline from a box.
pub const EPS: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// The `sky` flag of a skyline. Used as a multiplier on intercept and slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Self::Down => -1.0,
            Self::Up => 1.0,
        }
    }

    pub fn from_sign(sign: i64) -> Option<Self> {
        match sign {
            -1 => Some(Self::Down),
            1 => Some(Self::Up),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Up => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A finite line in world coordinates.
///
/// Construction rejects NaN and infinite coordinates, so every stored
/// segment is drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<Self> {
        if [x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            Some(Self { x1, y1, x2, y2 })
        } else {
            None
        }
    }

    pub fn from_points(start: Point, end: Point) -> Option<Self> {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn coords(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Reflection across the line y = x.
    pub fn swapped(&self) -> Self {
        Self {
            x1: self.y1,
            y1: self.x1,
            x2: self.y2,
            y2: self.x2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn at(&self, d: Direction) -> f64 {
        match d {
            Direction::Down => self.start,
            Direction::Up => self.end,
        }
    }
}

/// An axis-aligned box, one interval per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: Interval,
    pub y: Interval,
}

impl Rect {
    pub const fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    pub fn along(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// One linear piece of a skyline over `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    pub y_intercept: f64,
    pub slope: f64,
    pub start: f64,
    pub end: f64,
}

impl Building {
    pub const fn new(y_intercept: f64, slope: f64, start: f64, end: f64) -> Self {
        Self {
            y_intercept,
            slope,
            start,
            end,
        }
    }

    /// Builds the line through `(start, start_height)` and `(end, end_height)`.
    ///
    /// Buildings reaching to infinity must be flat.
    pub fn from_heights(start: f64, start_height: f64, end_height: f64, end: f64) -> Self {
        debug_assert!(
            !(start.is_infinite() || end.is_infinite()) || start_height == end_height,
            "unbounded buildings must be flat"
        );
        // equal infinite heights would otherwise produce NaN
        let slope = if start_height == end_height {
            0.0
        } else {
            (end_height - start_height) / (end - start)
        };
        let y_intercept = if start.is_infinite() {
            start_height
        } else {
            start_height - slope * start
        };
        Self::new(y_intercept, slope, start, end)
    }

    pub fn from_box(rect: &Rect, horizon_axis: Axis, sky: Direction) -> Self {
        let extent = rect.along(horizon_axis);
        let height = sky.sign() * rect.along(horizon_axis.other()).at(sky);
        Self::from_heights(extent.start, height, height, extent.end)
    }

    /// A flat building at -inf, used to close a skyline on either side.
    pub fn sentinel(start: f64, end: f64) -> Self {
        Self::from_heights(start, f64::NEG_INFINITY, f64::NEG_INFINITY, end)
    }

    pub fn height(&self, x: f64) -> f64 {
        if x.is_infinite() {
            self.y_intercept
        } else {
            self.slope * x + self.y_intercept
        }
    }
}

/// Ordered buildings plus the `sky` flag they are expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Skyline {
    pub sky: Direction,
    pub buildings: Vec<Building>,
}

impl Skyline {
    pub fn new(sky: Direction, buildings: Vec<Building>) -> Self {
        Self { sky, buildings }
    }

    pub fn empty(sky: Direction) -> Self {
        Self::new(
            sky,
            vec![Building::sentinel(f64::NEG_INFINITY, f64::INFINITY)],
        )
    }

    /// Skyline of a single box. Boxes thinner than `EPS` along the horizon
    /// or empty across it cast no shadow.
    pub fn from_box(rect: &Rect, horizon_axis: Axis, sky: Direction) -> Self {
        let extent = rect.along(horizon_axis);
        if extent.length() <= EPS || rect.along(horizon_axis.other()).is_empty() {
            return Self::empty(sky);
        }
        Self::new(
            sky,
            vec![
                Building::sentinel(f64::NEG_INFINITY, extent.start),
                Building::from_box(rect, horizon_axis, sky),
                Building::sentinel(extent.end, f64::INFINITY),
            ],
        )
    }
}

/// Two opposing skylines, indexed by [`Direction`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkylinePair {
    pub skylines: [Skyline; 2],
}

impl SkylinePair {
    pub fn new(down: Skyline, up: Skyline) -> Self {
        Self {
            skylines: [down, up],
        }
    }

    pub fn from_box(rect: &Rect, horizon_axis: Axis) -> Self {
        Self::new(
            Skyline::from_box(rect, horizon_axis, Direction::Down),
            Skyline::from_box(rect, horizon_axis, Direction::Up),
        )
    }
}

impl Index<Direction> for SkylinePair {
    type Output = Skyline;

    fn index(&self, d: Direction) -> &Skyline {
        &self.skylines[d.index()]
    }
}
