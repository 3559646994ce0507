//! Axis-aligned box collision shape

use crate::foundation::collections::ShapeId;
use crate::foundation::math::{Rect, Vec2};

/// An axis-aligned box positioned by its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    id: ShapeId,
    position: Vec2,
    width: f32,
    height: f32,
}

impl BoxShape {
    /// Box with its top-left corner on the local origin
    pub fn new(width: f32, height: f32) -> Self {
        Self::at(Vec2::zeros(), width, height)
    }

    /// Box with its top-left corner at `position`
    pub fn at(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            id: ShapeId::next(),
            position,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Identity of this shape
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    /// Local top-left corner
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Width
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Resize horizontally, keeping the left edge
    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    /// Resize vertically, keeping the top edge
    pub fn set_height(&mut self, height: f32) {
        self.height = height.max(0.0);
    }

    /// Resize both axes
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.set_width(width);
        self.set_height(height);
    }

    /// Local bounds
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
