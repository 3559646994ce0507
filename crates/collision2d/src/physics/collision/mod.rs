//! Collision shapes and narrow-phase tests
//!
//! # Architecture
//!
//! - **Local Space Storage**: Shapes store their geometry relative to an owner
//! - **On-Demand Placement**: [`WorldSpaceShape`] adds the owner position only during tests
//! - **Closed Dispatch**: Pairwise tests are chosen by matching both [`Shape`] variants
//!
//! # Module Organization
//!
//! - [`primitives`] - Segments, sector classification and the pure intersection tests
//! - [`shape`] - The [`Shape`] enum and its world-space view
//! - [`circle`], [`rect`], [`grid`], [`composite`], [`slope`] - The shape variants

pub mod primitives;
pub mod shape;
pub mod circle;
pub mod rect;
pub mod grid;
pub mod composite;
pub mod slope;

use thiserror::Error;

use crate::foundation::collections::ShapeId;

// Re-export commonly used types
pub use primitives::{GridTraversal, Sector, Segment};
pub use shape::{Shape, ShapeKind, WorldSpaceShape};
pub use circle::CircleShape;
pub use rect::BoxShape;
pub use grid::{GridShape, Reduction};
pub use composite::CompositeShape;
pub use slope::{SlopeFacing, SlopeShape};

/// Collision errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// No test exists for this pair of operands
    #[error("No collision test between {first} and {second}")]
    UnsupportedShapePair {
        /// Kind of the shape the test was called on
        first: ShapeKind,
        /// Kind of the other operand
        second: ShapeKind,
    },

    /// A composite must hold at least one child
    #[error("Composite shape needs at least one child")]
    EmptyComposite,

    /// The same shape was inserted twice
    #[error("Shape {0} is already present")]
    DuplicateShape(ShapeId),

    /// Removal of a shape that is not a child
    #[error("Shape {0} is not a child of this composite")]
    ShapeNotFound(ShapeId),

    /// Attachment of a shape that already has an owner
    #[error("Shape {0} is already attached to an owner")]
    AlreadyOwned(ShapeId),

    /// Unknown owner key
    #[error("Owner not found")]
    OwnerNotFound,

    /// Unknown collider handle
    #[error("Collider not found")]
    ColliderNotFound,

    /// Strict cell write outside the grid
    #[error("Cell ({x}, {y}) is outside the {columns}x{rows} grid")]
    CellOutOfBounds {
        /// Requested column
        x: i32,
        /// Requested row
        y: i32,
        /// Grid width in cells
        columns: usize,
        /// Grid height in cells
        rows: usize,
    },

    /// Width or height of a shape whose extent is derived
    #[error("The extent of a {0} shape is derived and cannot be set")]
    ReadOnlyExtent(ShapeKind),

    /// Unusable construction parameters
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}
