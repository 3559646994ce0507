//! Right-triangle slope shape
//!
//! Only placement and bounds exist; every collision query involving a
//! slope reports [`CollisionError::UnsupportedShapePair`](super::CollisionError::UnsupportedShapePair).

use crate::foundation::collections::ShapeId;
use crate::foundation::math::{Rect, Vec2};

/// Which corner of the bounding box holds the triangle's right angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlopeFacing {
    /// Right angle at the bottom-left
    #[default]
    BottomLeft,
    /// Right angle at the bottom-right
    BottomRight,
    /// Right angle at the top-left
    TopLeft,
    /// Right angle at the top-right
    TopRight,
}

/// A right triangle filling half of its bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeShape {
    id: ShapeId,
    position: Vec2,
    width: f32,
    height: f32,
    facing: SlopeFacing,
}

impl SlopeShape {
    /// Slope with its bounding box's top-left corner on the local origin
    pub fn new(width: f32, height: f32, facing: SlopeFacing) -> Self {
        Self {
            id: ShapeId::next(),
            position: Vec2::zeros(),
            width: width.max(0.0),
            height: height.max(0.0),
            facing,
        }
    }

    /// Identity of this shape
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    /// Corner holding the right angle
    pub const fn facing(&self) -> SlopeFacing {
        self.facing
    }

    /// Change the facing
    pub fn set_facing(&mut self, facing: SlopeFacing) {
        self.facing = facing;
    }

    /// Resize, keeping the top-left corner
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Local bounds
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
