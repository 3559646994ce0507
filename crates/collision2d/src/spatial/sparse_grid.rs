//! Chunked 2D storage for very large grids
//!
//! The logical `columns x rows` area is split into fixed-size segments.
//! A segment is allocated from the arena on the first write inside it;
//! every cell of an unallocated segment reads back as the empty value.

use crate::config::DEFAULT_SEGMENT_SIZE;
use crate::foundation::collections::{SegmentKey, SlotMap};

/// A lazily allocated 2D array
#[derive(Debug, Clone)]
pub struct SparseGrid<T> {
    columns: usize,
    rows: usize,
    segment_width: usize,
    segment_height: usize,
    segments_across: usize,
    empty_value: T,
    /// Segment storage, row-major cells within each segment
    arena: SlotMap<SegmentKey, Vec<T>>,
    /// One slot per segment position, row-major
    index: Vec<Option<SegmentKey>>,
}

impl<T: Clone + PartialEq> SparseGrid<T> {
    /// Create a grid using the default 50x50 segment size
    pub fn new(columns: usize, rows: usize, empty_value: T) -> Self {
        Self::with_segment_size(columns, rows, DEFAULT_SEGMENT_SIZE, DEFAULT_SEGMENT_SIZE, empty_value)
    }

    /// Create a grid with an explicit segment size (clamped to at least 1x1)
    pub fn with_segment_size(
        columns: usize,
        rows: usize,
        segment_width: usize,
        segment_height: usize,
        empty_value: T,
    ) -> Self {
        let segment_width = segment_width.max(1);
        let segment_height = segment_height.max(1);
        let segments_across = columns.div_ceil(segment_width);
        let segments_down = rows.div_ceil(segment_height);

        Self {
            columns,
            rows,
            segment_width,
            segment_height,
            segments_across,
            empty_value,
            arena: SlotMap::with_key(),
            index: vec![None; segments_across * segments_down],
        }
    }

    /// Logical width in cells
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Logical height in cells
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Segment size in cells
    pub const fn segment_size(&self) -> (usize, usize) {
        (self.segment_width, self.segment_height)
    }

    /// Value reported for never-written cells
    pub const fn empty_value(&self) -> &T {
        &self.empty_value
    }

    /// Whether `(x, y)` lies inside the logical bounds
    pub const fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.columns && y < self.rows
    }

    /// Read a cell; out-of-range and unallocated cells yield the empty value
    pub fn get(&self, x: usize, y: usize) -> &T {
        if !self.in_bounds(x, y) {
            return &self.empty_value;
        }
        let (slot, offset) = self.locate(x, y);
        match self.index[slot] {
            Some(key) => &self.arena[key][offset],
            None => &self.empty_value,
        }
    }

    /// Write a cell
    ///
    /// Callers clip to the logical bounds first; an out-of-range write is a
    /// logic error and is dropped (debug builds assert).
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(
            self.in_bounds(x, y),
            "sparse grid write at ({x}, {y}) outside {}x{}",
            self.columns,
            self.rows
        );
        if !self.in_bounds(x, y) {
            return;
        }

        let (slot, offset) = self.locate(x, y);
        let key = match self.index[slot] {
            Some(key) => key,
            None => {
                // Writing the empty value never needs storage
                if value == self.empty_value {
                    return;
                }
                let cells = vec![self.empty_value.clone(); self.segment_width * self.segment_height];
                let key = self.arena.insert(cells);
                self.index[slot] = Some(key);
                key
            }
        };
        self.arena[key][offset] = value;
    }

    /// Release every segment
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.iter_mut().for_each(|slot| *slot = None);
    }

    /// Number of segments currently holding storage
    pub fn allocated_segments(&self) -> usize {
        self.arena.len()
    }

    /// Cells inside allocated segments whose value differs from the empty value
    pub fn iter_allocated(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.index
            .iter()
            .enumerate()
            .filter_map(|(slot, key)| key.map(|key| (slot, key)))
            .flat_map(move |(slot, key)| {
                let base_x = (slot % self.segments_across) * self.segment_width;
                let base_y = (slot / self.segments_across) * self.segment_height;
                self.arena[key].iter().enumerate().filter_map(move |(offset, value)| {
                    let x = base_x + offset % self.segment_width;
                    let y = base_y + offset / self.segment_width;
                    (self.in_bounds(x, y) && *value != self.empty_value).then_some((x, y, value))
                })
            })
    }

    /// Segment slot and the cell offset inside it
    fn locate(&self, x: usize, y: usize) -> (usize, usize) {
        let segment_x = x / self.segment_width;
        let segment_y = y / self.segment_height;
        let local_x = x % self.segment_width;
        let local_y = y % self.segment_height;
        (
            segment_y * self.segments_across + segment_x,
            local_y * self.segment_width + local_x,
        )
    }
}
