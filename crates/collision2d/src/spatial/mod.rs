//! Spatial data structures
//!
//! Provides the chunked storage that backs tile-bitmap collision shapes.

mod sparse_grid;

pub use sparse_grid::SparseGrid;
