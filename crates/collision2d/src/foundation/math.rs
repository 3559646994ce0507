//! Math utilities and types
//!
//! Provides the 2D vector alias used throughout the collision code and the
//! axis-aligned rectangle types the shapes report their bounds in.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Shorthand constructor for [`Vec2`]
#[inline]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

/// Axis-aligned rectangle in float coordinates (y grows downwards)
///
/// Containment and overlap use half-open bounds: `left <= x < right` and
/// `top <= y < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from its four edges
    pub fn from_bounds(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Left edge
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Half-open point containment
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// Half-open overlap test; rectangles that only share an edge do not overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Overlapping region, if any
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect::from_bounds(
            self.left().max(other.left()),
            self.top().max(other.top()),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Smallest rectangle enclosing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_bounds(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Same rectangle moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// Inclusive rectangle of grid cell indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    /// First column
    pub x0: i32,
    /// First row
    pub y0: i32,
    /// Last column (inclusive)
    pub x1: i32,
    /// Last row (inclusive)
    pub y1: i32,
}

impl CellRect {
    /// Build from a top-left cell and a size in cells
    ///
    /// The far edge saturates at the `i32` range, so an oversized span
    /// still clips to the cells that exist.
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: last_index(x, width),
            y1: last_index(y, height),
        }
    }

    /// True when the range holds no cells
    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    /// Clip to `[0, columns) x [0, rows)`
    pub fn clipped(&self, columns: usize, rows: usize) -> CellRect {
        CellRect {
            x0: self.x0.max(0),
            y0: self.y0.max(0),
            x1: self.x1.min(last_index(0, clamp_len(columns))),
            y1: self.y1.min(last_index(0, clamp_len(rows))),
        }
    }

    /// Iterate every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..=self.y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }
}

/// Grid extent as an `i32` cell count, saturating for huge grids
pub fn clamp_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

/// Index of the last cell of a span, saturating at the `i32` range
fn last_index(start: i32, len: i32) -> i32 {
    let last = i64::from(start) + i64::from(len) - 1;
    last.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
