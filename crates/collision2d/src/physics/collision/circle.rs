//! Circle collision shape

use crate::foundation::collections::ShapeId;
use crate::foundation::math::{Rect, Vec2};

/// A circle positioned by its center in local space
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    id: ShapeId,
    center: Vec2,
    radius: f32,
}

impl CircleShape {
    /// Circle of `radius` centered on the local origin
    pub fn new(radius: f32) -> Self {
        Self::at(Vec2::zeros(), radius)
    }

    /// Circle of `radius` centered on `center`
    pub fn at(center: Vec2, radius: f32) -> Self {
        Self {
            id: ShapeId::next(),
            center,
            radius: radius.max(0.0),
        }
    }

    /// Identity of this shape
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    /// Local center
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Move the center
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Radius
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Change the radius, keeping the center; negative values clamp to zero
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Square of side `2 * radius` around the center
    pub fn bounds(&self) -> Rect {
        let diameter = self.radius * 2.0;
        Rect::new(self.center.x - self.radius, self.center.y - self.radius, diameter, diameter)
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
