//! Physics module for 2D collision detection
//!
//! Provides the collision shapes and their pairwise tests, a query facade
//! over world-space shapes, and owner-relative collider storage.

pub mod collision;
pub mod collision_query;
pub mod collider_set;

#[cfg(test)]
mod tests;

pub use collision::{
    CollisionError,
    Shape,
    ShapeKind,
    WorldSpaceShape,
    Segment,
    CircleShape,
    BoxShape,
    GridShape,
    CompositeShape,
    SlopeShape,
    SlopeFacing,
    Reduction,
};
pub use collider_set::ColliderSet;
