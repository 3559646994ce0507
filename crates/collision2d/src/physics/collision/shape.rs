//! Collision shape abstractions
//!
//! [`Shape`] is the closed set of collidable variants, stored in local
//! space. [`WorldSpaceShape`] pairs a shape with its owner's position for
//! the duration of a test; every pairwise test and point/segment/rect
//! query runs on it and dispatches with a `match` over both variants.

use std::fmt;

use super::circle::CircleShape;
use super::composite::CompositeShape;
use super::grid::GridShape;
use super::primitives::{self, Segment};
use super::rect::BoxShape;
use super::slope::SlopeShape;
use super::CollisionError;
use crate::foundation::collections::ShapeId;
use crate::foundation::math::{Rect, Vec2};

/// Kinds of operand a collision test can involve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// [`CircleShape`]
    Circle,
    /// [`BoxShape`]
    Box,
    /// [`GridShape`]
    Grid,
    /// [`CompositeShape`]
    Composite,
    /// [`SlopeShape`]
    Slope,
    /// A bare point query
    Point,
    /// A bare segment query
    Segment,
    /// A bare rectangle query
    Rect,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Circle => "circle",
            Self::Box => "box",
            Self::Grid => "grid",
            Self::Composite => "composite",
            Self::Slope => "slope",
            Self::Point => "point",
            Self::Segment => "segment",
            Self::Rect => "rect",
        };
        f.write_str(name)
    }
}

/// Collision shape (stored in LOCAL SPACE, relative to its owner)
#[derive(Debug, Clone)]
pub enum Shape {
    /// Circle around a center point
    Circle(CircleShape),
    /// Axis-aligned box
    Box(BoxShape),
    /// Tile occupancy bitmap
    Grid(GridShape),
    /// Group of shapes acting as one
    Composite(CompositeShape),
    /// Right-triangle slope (bounds only)
    Slope(SlopeShape),
}

impl From<CircleShape> for Shape {
    fn from(shape: CircleShape) -> Self {
        Self::Circle(shape)
    }
}

impl From<BoxShape> for Shape {
    fn from(shape: BoxShape) -> Self {
        Self::Box(shape)
    }
}

impl From<GridShape> for Shape {
    fn from(shape: GridShape) -> Self {
        Self::Grid(shape)
    }
}

impl From<CompositeShape> for Shape {
    fn from(shape: CompositeShape) -> Self {
        Self::Composite(shape)
    }
}

impl From<SlopeShape> for Shape {
    fn from(shape: SlopeShape) -> Self {
        Self::Slope(shape)
    }
}

impl Shape {
    /// Circle of `radius` centered on `center`
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Self::Circle(CircleShape::at(center, radius))
    }

    /// Box with its top-left corner at `position`
    pub fn rect(position: Vec2, width: f32, height: f32) -> Self {
        Self::Box(BoxShape::at(position, width, height))
    }

    /// Identity of this shape
    pub const fn id(&self) -> ShapeId {
        match self {
            Self::Circle(shape) => shape.id(),
            Self::Box(shape) => shape.id(),
            Self::Grid(shape) => shape.id(),
            Self::Composite(shape) => shape.id(),
            Self::Slope(shape) => shape.id(),
        }
    }

    /// Variant tag
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle(_) => ShapeKind::Circle,
            Self::Box(_) => ShapeKind::Box,
            Self::Grid(_) => ShapeKind::Grid,
            Self::Composite(_) => ShapeKind::Composite,
            Self::Slope(_) => ShapeKind::Slope,
        }
    }

    /// This shape's id followed by every nested child's id
    pub fn ids(&self) -> Vec<ShapeId> {
        let mut ids = vec![self.id()];
        if let Self::Composite(composite) = self {
            ids.extend(composite.children().iter().flat_map(Self::ids));
        }
        ids
    }

    /// Local bounds
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Circle(shape) => shape.bounds(),
            Self::Box(shape) => shape.bounds(),
            Self::Grid(shape) => shape.bounds(),
            Self::Composite(shape) => shape.bounds(),
            Self::Slope(shape) => shape.bounds(),
        }
    }

    /// Local position: the center for circles, the top-left corner of the
    /// bounds for everything else
    pub fn position(&self) -> Vec2 {
        match self {
            Self::Circle(shape) => shape.center(),
            _ => {
                let bounds = self.bounds();
                Vec2::new(bounds.left(), bounds.top())
            }
        }
    }

    /// Move so that [`position`](Self::position) becomes `position`
    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position();
        self.translate(delta);
    }

    /// Move by `delta`; composites move every child
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Self::Circle(shape) => shape.translate(delta),
            Self::Box(shape) => shape.translate(delta),
            Self::Grid(shape) => shape.translate(delta),
            Self::Composite(shape) => shape.translate(delta),
            Self::Slope(shape) => shape.translate(delta),
        }
    }

    /// `owner_position + position`, or just `position` when unowned
    pub fn absolute_position(&self, owner_position: Option<Vec2>) -> Vec2 {
        owner_position.unwrap_or_else(Vec2::zeros) + self.position()
    }

    /// Pair this shape with its owner's position for testing
    pub fn to_world_space(&self, owner_position: Option<Vec2>) -> WorldSpaceShape<'_> {
        WorldSpaceShape::new(self, owner_position.unwrap_or_else(Vec2::zeros))
    }

    /// Test two unowned shapes against each other
    pub fn collides_with(&self, other: &Shape) -> Result<bool, CollisionError> {
        self.to_world_space(None).intersects(&other.to_world_space(None))
    }

    /// Left edge
    pub fn left(&self) -> f32 {
        self.bounds().left()
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.bounds().top()
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.bounds().right()
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.bounds().bottom()
    }

    /// Width of the bounds
    pub fn width(&self) -> f32 {
        self.bounds().width
    }

    /// Height of the bounds
    pub fn height(&self) -> f32 {
        self.bounds().height
    }

    /// Horizontal center of the bounds
    pub fn center_x(&self) -> f32 {
        self.bounds().center().x
    }

    /// Vertical center of the bounds
    pub fn center_y(&self) -> f32 {
        self.bounds().center().y
    }

    /// Move so the left edge sits at `left`
    pub fn set_left(&mut self, left: f32) {
        let delta = left - self.left();
        self.translate(Vec2::new(delta, 0.0));
    }

    /// Move so the top edge sits at `top`
    pub fn set_top(&mut self, top: f32) {
        let delta = top - self.top();
        self.translate(Vec2::new(0.0, delta));
    }

    /// Move so the right edge sits at `right`
    pub fn set_right(&mut self, right: f32) {
        let delta = right - self.right();
        self.translate(Vec2::new(delta, 0.0));
    }

    /// Move so the bottom edge sits at `bottom`
    pub fn set_bottom(&mut self, bottom: f32) {
        let delta = bottom - self.bottom();
        self.translate(Vec2::new(0.0, delta));
    }

    /// Move so the horizontal center sits at `x`
    pub fn set_center_x(&mut self, x: f32) {
        let delta = x - self.center_x();
        self.translate(Vec2::new(delta, 0.0));
    }

    /// Move so the vertical center sits at `y`
    pub fn set_center_y(&mut self, y: f32) {
        let delta = y - self.center_y();
        self.translate(Vec2::new(0.0, delta));
    }

    /// Resize horizontally
    ///
    /// Boxes keep their left edge, circles keep their center and take
    /// `width / 2` as radius. Grid and composite extents are derived and
    /// cannot be set.
    pub fn set_width(&mut self, width: f32) -> Result<(), CollisionError> {
        let kind = self.kind();
        match self {
            Self::Circle(shape) => shape.set_radius(width * 0.5),
            Self::Box(shape) => shape.set_width(width),
            Self::Slope(shape) => {
                let height = shape.bounds().height;
                shape.set_size(width, height);
            }
            Self::Grid(_) | Self::Composite(_) => return Err(CollisionError::ReadOnlyExtent(kind)),
        }
        Ok(())
    }

    /// Resize vertically; see [`set_width`](Self::set_width)
    pub fn set_height(&mut self, height: f32) -> Result<(), CollisionError> {
        let kind = self.kind();
        match self {
            Self::Circle(shape) => shape.set_radius(height * 0.5),
            Self::Box(shape) => shape.set_height(height),
            Self::Slope(shape) => {
                let width = shape.bounds().width;
                shape.set_size(width, height);
            }
            Self::Grid(_) | Self::Composite(_) => return Err(CollisionError::ReadOnlyExtent(kind)),
        }
        Ok(())
    }

    /// Move so the bounds are centered on the local origin
    pub fn center_origin(&mut self) {
        let center = self.bounds().center();
        self.translate(-center);
    }

    /// Top-left corner
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    /// Top-right corner
    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    /// Bottom-left corner
    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.bottom())
    }

    /// Bottom-right corner
    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Top edge, left to right
    pub fn top_edge(&self) -> Segment {
        Segment::new(self.top_left(), self.top_right())
    }

    /// Bottom edge, left to right
    pub fn bottom_edge(&self) -> Segment {
        Segment::new(self.bottom_left(), self.bottom_right())
    }

    /// Left edge, top to bottom
    pub fn left_edge(&self) -> Segment {
        Segment::new(self.top_left(), self.bottom_left())
    }

    /// Right edge, top to bottom
    pub fn right_edge(&self) -> Segment {
        Segment::new(self.top_right(), self.bottom_right())
    }
}

/// World-space view of a shape (temporary, for testing only)
#[derive(Debug, Clone, Copy)]
pub struct WorldSpaceShape<'a> {
    shape: &'a Shape,
    origin: Vec2,
}

impl<'a> WorldSpaceShape<'a> {
    /// View `shape` as if its owner sat at `origin`
    pub const fn new(shape: &'a Shape, origin: Vec2) -> Self {
        Self { shape, origin }
    }

    /// The underlying local-space shape
    pub const fn shape(&self) -> &'a Shape {
        self.shape
    }

    /// Owner position added to every local coordinate
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Same shape viewed as if its local position were `position`
    ///
    /// The owner origin is kept; only the origin offset changes, the shape
    /// itself is untouched.
    pub fn placed_at(&self, position: Vec2) -> Self {
        Self::new(self.shape, self.origin + position - self.shape.position())
    }

    /// Absolute position
    pub fn position(&self) -> Vec2 {
        self.origin + self.shape.position()
    }

    /// World-space bounds
    pub fn bounds(&self) -> Rect {
        self.shape.bounds().translated(self.origin)
    }

    /// Left edge
    pub fn left(&self) -> f32 {
        self.bounds().left()
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.bounds().top()
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.bounds().right()
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.bounds().bottom()
    }

    /// Center of the bounds
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    fn children(&self) -> impl Iterator<Item = WorldSpaceShape<'a>> + '_ {
        let children: &'a [Shape] = match self.shape {
            Shape::Composite(composite) => composite.children(),
            _ => &[],
        };
        children.iter().map(move |child| WorldSpaceShape::new(child, self.origin))
    }

    fn any_child(&self, mut test: impl FnMut(&WorldSpaceShape<'a>) -> Result<bool, CollisionError>) -> Result<bool, CollisionError> {
        for child in self.children() {
            if test(&child)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn unsupported(&self, other: ShapeKind) -> CollisionError {
        CollisionError::UnsupportedShapePair {
            first: self.shape.kind(),
            second: other,
        }
    }

    /// Test this shape against another
    ///
    /// Symmetric for every supported pair. Grids never collide with circles.
    /// Slopes, and grid against grid, have no test and report
    /// [`CollisionError::UnsupportedShapePair`].
    pub fn intersects(&self, other: &WorldSpaceShape<'_>) -> Result<bool, CollisionError> {
        use Shape as S;

        match (self.shape, other.shape) {
            (S::Slope(_), _) | (_, S::Slope(_)) | (S::Grid(_), S::Grid(_)) => {
                Err(self.unsupported(other.shape.kind()))
            }

            (S::Composite(_), _) => self.any_child(|child| child.intersects(other)),
            (_, S::Composite(_)) => other.any_child(|child| self.intersects(child)),

            (S::Circle(a), S::Circle(b)) => Ok(primitives::circle_intersects_circle(
                self.origin + a.center(),
                a.radius(),
                other.origin + b.center(),
                b.radius(),
            )),
            (S::Circle(circle), S::Box(_)) => Ok(primitives::rect_intersects_circle(
                &other.bounds(),
                self.origin + circle.center(),
                circle.radius(),
            )),
            (S::Box(_), S::Circle(circle)) => Ok(primitives::rect_intersects_circle(
                &self.bounds(),
                other.origin + circle.center(),
                circle.radius(),
            )),
            (S::Box(_), S::Box(_)) => Ok(primitives::rect_intersects_rect(&self.bounds(), &other.bounds())),

            (S::Grid(grid), S::Box(_)) => Ok(grid.intersects_rect(self.origin, &other.bounds())),
            (S::Box(_), S::Grid(grid)) => Ok(grid.intersects_rect(other.origin, &self.bounds())),
            (S::Grid(_), S::Circle(_)) | (S::Circle(_), S::Grid(_)) => Ok(false),
        }
    }

    /// Whether a world point lies inside this shape
    pub fn contains_point(&self, point: Vec2) -> Result<bool, CollisionError> {
        match self.shape {
            Shape::Circle(circle) => Ok(primitives::circle_contains_point(
                self.origin + circle.center(),
                circle.radius(),
                point,
            )),
            Shape::Box(_) => Ok(primitives::rect_contains_point(&self.bounds(), point)),
            Shape::Grid(grid) => Ok(grid.intersects_point(self.origin, point)),
            Shape::Composite(_) => self.any_child(|child| child.contains_point(point)),
            Shape::Slope(_) => Err(self.unsupported(ShapeKind::Point)),
        }
    }

    /// Whether a world segment touches this shape
    pub fn intersects_segment(&self, segment: &Segment) -> Result<bool, CollisionError> {
        match self.shape {
            Shape::Circle(circle) => Ok(primitives::circle_intersects_segment(
                self.origin + circle.center(),
                circle.radius(),
                segment,
            )),
            Shape::Box(_) => Ok(primitives::rect_intersects_segment(&self.bounds(), segment)),
            Shape::Grid(grid) => Ok(grid.intersects_segment(self.origin, segment)),
            Shape::Composite(_) => self.any_child(|child| child.intersects_segment(segment)),
            Shape::Slope(_) => Err(self.unsupported(ShapeKind::Segment)),
        }
    }

    /// Whether a world rectangle overlaps this shape
    pub fn intersects_rect(&self, rect: &Rect) -> Result<bool, CollisionError> {
        match self.shape {
            Shape::Circle(circle) => Ok(primitives::rect_intersects_circle(
                rect,
                self.origin + circle.center(),
                circle.radius(),
            )),
            Shape::Box(_) => Ok(primitives::rect_intersects_rect(&self.bounds(), rect)),
            Shape::Grid(grid) => Ok(grid.intersects_rect(self.origin, rect)),
            Shape::Composite(_) => self.any_child(|child| child.intersects_rect(rect)),
            Shape::Slope(_) => Err(self.unsupported(ShapeKind::Rect)),
        }
    }
}
