//! # collision2d
//!
//! 2D collision geometry for tile-based games.
//!
//! ## Features
//!
//! - **Shape Primitives**: Circles, axis-aligned boxes, tile bitmaps and composites
//! - **Closed Dispatch**: Every supported pair of shapes has one symmetric test
//! - **Sparse Tile Storage**: Large occupancy grids allocate only the segments in use
//! - **Owner-Relative Placement**: Shapes live in local space and follow their owner
//!
//! ## Quick Start
//!
//! ```rust
//! use collision2d::prelude::*;
//!
//! let mut grid = GridShape::from_bitstring("0000\n0110\n0000", 16.0, 16.0)?;
//! grid.set_cell(3, 2, true);
//!
//! let player = Shape::rect(vec2(20.0, 20.0), 8.0, 8.0);
//! assert!(player.collides_with(&Shape::Grid(grid))?);
//! # Ok::<(), CollisionError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

pub mod foundation;
pub mod config;
pub mod spatial;
pub mod physics;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError, Validation},
        foundation::{
            collections::{ColliderHandle, OwnerKey, ShapeId},
            math::{vec2, Rect, Vec2},
        },
        physics::{
            collision_query,
            BoxShape, CircleShape, ColliderSet, CollisionError, CompositeShape, GridShape, Reduction, Segment,
            Shape, ShapeKind, SlopeFacing, SlopeShape, WorldSpaceShape,
        },
        spatial::SparseGrid,
    };
}
