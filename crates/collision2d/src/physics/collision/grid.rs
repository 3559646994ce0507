//! Tile-bitmap collision shape
//!
//! A `columns x rows` occupancy bitmap stored in a [`SparseGrid`], scaled by
//! a per-cell size and anchored at its top-left corner. Cells outside the
//! grid read as unoccupied.

use log::{debug, trace};

use super::primitives::{self, GridTraversal, Segment};
use super::CollisionError;
use crate::config::CollisionConfig;
use crate::foundation::collections::ShapeId;
use crate::foundation::math::{clamp_len, CellRect, Rect, Vec2};
use crate::spatial::SparseGrid;

/// Character written for an occupied cell
pub const FILLED_CELL: char = '1';
/// Character written for an empty cell
pub const EMPTY_CELL: char = '0';

/// How a bulk occupancy query folds its cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// True when at least one cell is occupied
    Any,
    /// True when every cell is occupied
    All,
}

/// Occupancy bitmap collision shape
#[derive(Debug, Clone)]
pub struct GridShape {
    id: ShapeId,
    position: Vec2,
    cell_width: f32,
    cell_height: f32,
    cells: SparseGrid<bool>,
}

impl GridShape {
    /// Empty grid with default segment size
    pub fn new(columns: usize, rows: usize, cell_width: f32, cell_height: f32) -> Result<Self, CollisionError> {
        Self::with_config(columns, rows, cell_width, cell_height, &CollisionConfig::default())
    }

    /// Empty grid using the segment size from `config`
    pub fn with_config(
        columns: usize,
        rows: usize,
        cell_width: f32,
        cell_height: f32,
        config: &CollisionConfig,
    ) -> Result<Self, CollisionError> {
        if !(cell_width.is_finite() && cell_width > 0.0 && cell_height.is_finite() && cell_height > 0.0) {
            return Err(CollisionError::InvalidDimensions(format!(
                "cell size must be positive, got {cell_width}x{cell_height}"
            )));
        }
        Ok(Self {
            id: ShapeId::next(),
            position: Vec2::zeros(),
            cell_width,
            cell_height,
            cells: SparseGrid::with_segment_size(
                columns,
                rows,
                config.grid_segment_width,
                config.grid_segment_height,
                false,
            ),
        })
    }

    /// Build a grid sized to a row-major bitstring
    ///
    /// Rows are separated by `\n` (a trailing newline is ignored); the
    /// widest row sets the column count. `'1'` marks an occupied cell, any
    /// other character an empty one.
    pub fn from_bitstring(source: &str, cell_width: f32, cell_height: f32) -> Result<Self, CollisionError> {
        Self::from_bitstring_with_config(source, cell_width, cell_height, &CollisionConfig::default())
    }

    /// [`from_bitstring`](Self::from_bitstring) using the segment size from `config`
    pub fn from_bitstring_with_config(
        source: &str,
        cell_width: f32,
        cell_height: f32,
        config: &CollisionConfig,
    ) -> Result<Self, CollisionError> {
        let lines = bitstring_rows(source);
        let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let mut grid = Self::with_config(columns, lines.len(), cell_width, cell_height, config)?;
        grid.load_bitstring(source);
        Ok(grid)
    }

    /// Identity of this shape
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    /// Local top-left corner
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Number of columns
    pub const fn columns(&self) -> usize {
        self.cells.columns()
    }

    /// Number of rows
    pub const fn rows(&self) -> usize {
        self.cells.rows()
    }

    /// Size of one cell
    pub const fn cell_size(&self) -> (f32, f32) {
        (self.cell_width, self.cell_height)
    }

    /// Local bounds: `cell_width * columns` by `cell_height * rows`
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.cell_width * self.columns() as f32,
            self.cell_height * self.rows() as f32,
        )
    }

    /// Occupancy of a cell; out-of-range cells are unoccupied
    pub fn cell(&self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some((x, y)) => *self.cells.get(x, y),
            None => false,
        }
    }

    /// Set a cell, ignoring out-of-range coordinates
    pub fn set_cell(&mut self, x: i32, y: i32, occupied: bool) {
        if self.try_set_cell(x, y, occupied).is_err() {
            trace!("Ignoring write to cell ({x}, {y}) outside {}x{} grid", self.columns(), self.rows());
        }
    }

    /// Set a cell, rejecting out-of-range coordinates
    pub fn try_set_cell(&mut self, x: i32, y: i32, occupied: bool) -> Result<(), CollisionError> {
        let (cx, cy) = self.index(x, y).ok_or(CollisionError::CellOutOfBounds {
            x,
            y,
            columns: self.columns(),
            rows: self.rows(),
        })?;
        self.cells.set(cx, cy, occupied);
        Ok(())
    }

    /// Mark a cell unoccupied
    pub fn clear_cell(&mut self, x: i32, y: i32) {
        self.set_cell(x, y, false);
    }

    /// Fill a rectangle of cells, clipped to the grid
    pub fn set_rect(&mut self, x: i32, y: i32, width: i32, height: i32, occupied: bool) {
        let cells = CellRect::from_origin_size(x, y, width, height).clipped(self.columns(), self.rows());
        for (cx, cy) in cells.cells() {
            self.cells.set(cx as usize, cy as usize, occupied);
        }
    }

    /// Clear a rectangle of cells, clipped to the grid
    pub fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.set_rect(x, y, width, height, false);
    }

    /// Fill or clear a whole row
    pub fn set_row(&mut self, y: i32, occupied: bool) {
        self.set_rect(0, y, clamp_len(self.columns()), 1, occupied);
    }

    /// Fill or clear a whole column
    pub fn set_column(&mut self, x: i32, occupied: bool) {
        self.set_rect(x, 0, 1, clamp_len(self.rows()), occupied);
    }

    /// Clear every cell and release storage
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter_allocated().count()
    }

    /// Fold a rectangle of cells after clipping it to the grid
    ///
    /// A span that clips away entirely holds no occupied cell and yields
    /// `false` under either reduction.
    pub fn check_rect(&self, x: i32, y: i32, width: i32, height: i32, reduction: Reduction) -> bool {
        let cells = CellRect::from_origin_size(x, y, width, height).clipped(self.columns(), self.rows());
        self.check_cells(cells, reduction)
    }

    /// Fold `length` cells of row `y` starting at column `x`
    pub fn check_row(&self, x: i32, y: i32, length: i32, reduction: Reduction) -> bool {
        self.check_rect(x, y, length, 1, reduction)
    }

    /// Fold `length` cells of column `x` starting at row `y`
    pub fn check_column(&self, x: i32, y: i32, length: i32, reduction: Reduction) -> bool {
        self.check_rect(x, y, 1, length, reduction)
    }

    /// Cell containing a world point, given the owner origin
    pub fn cell_at(&self, origin: Vec2, point: Vec2) -> (i32, i32) {
        let local = self.to_cell_space(origin, point);
        (local.x.floor() as i32, local.y.floor() as i32)
    }

    /// Cells a world segment passes through, in order
    pub fn cells_on_segment(&self, origin: Vec2, segment: &Segment) -> GridTraversal {
        GridTraversal::new(
            self.to_cell_space(origin, segment.start),
            self.to_cell_space(origin, segment.end),
        )
    }

    /// Occupancy at a world point
    pub fn intersects_point(&self, origin: Vec2, point: Vec2) -> bool {
        let (x, y) = self.cell_at(origin, point);
        self.cell(x, y)
    }

    /// Whether any occupied cell overlaps a world rectangle
    pub fn intersects_rect(&self, origin: Vec2, rect: &Rect) -> bool {
        let bounds = self.bounds().translated(origin);
        let Some(overlap) = bounds.intersection(rect) else {
            return false;
        };

        let x0 = ((overlap.left() - bounds.left()) / self.cell_width).floor() as i32;
        let y0 = ((overlap.top() - bounds.top()) / self.cell_height).floor() as i32;
        // Right and bottom are exclusive
        let x1 = ((overlap.right() - bounds.left()) / self.cell_width).ceil() as i32 - 1;
        let y1 = ((overlap.bottom() - bounds.top()) / self.cell_height).ceil() as i32 - 1;

        let cells = CellRect { x0, y0, x1, y1 }.clipped(self.columns(), self.rows());
        self.check_cells(cells, Reduction::Any)
    }

    /// Whether a world segment passes through any occupied cell
    ///
    /// Only the part of the segment inside the grid bounds is walked.
    pub fn intersects_segment(&self, origin: Vec2, segment: &Segment) -> bool {
        let bounds = self.bounds().translated(origin);
        let Some(inside) = primitives::clip_segment(&bounds, segment) else {
            return false;
        };
        self.cells_on_segment(origin, &inside)
            .any(|(x, y)| self.cell(x, y))
    }

    /// Grow the grid by whole cells on each side
    ///
    /// Existing cells keep their world placement (the position moves by the
    /// cells added on the left and top). New border cells copy the nearest
    /// edge cell, repeating the boundary outward.
    pub fn extend(&mut self, left: usize, right: usize, top: usize, bottom: usize) {
        let (old_columns, old_rows) = (self.columns(), self.rows());
        let new_columns = old_columns + left + right;
        let new_rows = old_rows + top + bottom;
        let (segment_width, segment_height) = self.cells.segment_size();
        let mut cells = SparseGrid::with_segment_size(new_columns, new_rows, segment_width, segment_height, false);

        for (x, y, _) in self.cells.iter_allocated() {
            cells.set(x + left, y + top, true);
        }

        if old_columns > 0 && old_rows > 0 {
            for y in 0..new_rows {
                let source_y = y.saturating_sub(top).min(old_rows - 1);
                let interior_row = (top..top + old_rows).contains(&y);
                let (head, tail) = if interior_row {
                    (0..left, left + old_columns..new_columns)
                } else {
                    (0..new_columns, 0..0)
                };
                for x in head.chain(tail) {
                    let source_x = x.saturating_sub(left).min(old_columns - 1);
                    if *self.cells.get(source_x, source_y) {
                        cells.set(x, y, true);
                    }
                }
            }
        }

        debug!(
            "Extended grid {} from {}x{} to {}x{}",
            self.id, old_columns, old_rows, new_columns, new_rows
        );
        self.cells = cells;
        self.position -= Vec2::new(left as f32 * self.cell_width, top as f32 * self.cell_height);
    }

    /// Replace the occupancy with a row-major bitstring of `'0'`/`'1'`
    pub fn load_bitstring(&mut self, source: &str) {
        self.load_bitstring_with(source, FILLED_CELL);
    }

    /// Replace the occupancy with a row-major bitstring, treating `filled`
    /// as occupied and every other character as empty
    ///
    /// Characters beyond the grid bounds are dropped.
    pub fn load_bitstring_with(&mut self, source: &str, filled: char) {
        self.cells.clear();
        let mut dropped = 0usize;
        for (y, line) in bitstring_rows(source).into_iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                if ch != filled {
                    continue;
                }
                if self.cells.in_bounds(x, y) {
                    self.cells.set(x, y, true);
                } else {
                    dropped += 1;
                }
            }
        }
        debug!(
            "Loaded bitstring into grid {} ({}x{}, {} occupied, {} dropped)",
            self.id,
            self.columns(),
            self.rows(),
            self.occupied_count(),
            dropped
        );
    }

    /// Row-major bitstring: exactly `rows` lines of `columns` characters
    pub fn to_bitstring(&self) -> String {
        let mut out = String::with_capacity((self.columns() + 1) * self.rows());
        for y in 0..self.rows() {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.columns() {
                out.push(if *self.cells.get(x, y) { FILLED_CELL } else { EMPTY_CELL });
            }
        }
        out
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn check_cells(&self, cells: CellRect, reduction: Reduction) -> bool {
        if cells.is_empty() {
            return false;
        }
        let mut occupancy = cells.cells().map(|(x, y)| *self.cells.get(x as usize, y as usize));
        match reduction {
            Reduction::Any => occupancy.any(|occupied| occupied),
            Reduction::All => occupancy.all(|occupied| occupied),
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        self.cells.in_bounds(x, y).then_some((x, y))
    }

    fn to_cell_space(&self, origin: Vec2, point: Vec2) -> Vec2 {
        let local = point - origin - self.position;
        Vec2::new(local.x / self.cell_width, local.y / self.cell_height)
    }
}

/// Split a bitstring into rows, dropping one trailing newline and any `\r`
fn bitstring_rows(source: &str) -> Vec<&str> {
    let mut rows: Vec<&str> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if rows.last().is_some_and(|line| line.is_empty()) {
        rows.pop();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::vec2;

    fn grid(columns: usize, rows: usize) -> GridShape {
        GridShape::new(columns, rows, 1.0, 1.0).expect("valid grid")
    }

    #[test]
    fn test_invalid_cell_size_is_rejected() {
        assert!(matches!(
            GridShape::new(4, 4, 0.0, 1.0),
            Err(CollisionError::InvalidDimensions(_))
        ));
        assert!(GridShape::new(4, 4, 1.0, f32::NAN).is_err());
    }

    #[test]
    fn test_out_of_range_cells_read_unoccupied() {
        let mut grid = grid(4, 4);
        grid.set_rect(0, 0, 4, 4, true);
        assert!(grid.cell(3, 3));
        assert!(!grid.cell(-1, 0));
        assert!(!grid.cell(4, 0));
        assert!(!grid.cell(0, 4));
    }

    #[test]
    fn test_out_of_range_writes() {
        let mut grid = grid(4, 4);
        grid.set_cell(10, 10, true);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(
            grid.try_set_cell(-1, 2, true),
            Err(CollisionError::CellOutOfBounds { x: -1, y: 2, columns: 4, rows: 4 })
        );
        assert!(grid.try_set_cell(1, 2, true).is_ok());
        assert!(grid.cell(1, 2));
    }

    #[test]
    fn test_set_rect_is_clipped() {
        let mut grid = grid(5, 5);
        grid.set_rect(-2, 3, 4, 10, true);
        assert_eq!(grid.occupied_count(), 4);
        assert!(grid.cell(0, 3) && grid.cell(1, 4));
        grid.clear_rect(0, 0, 1, 5);
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_row_column_and_rect_reductions() {
        let mut grid = grid(6, 4);
        grid.set_row(1, true);
        grid.set_column(5, true);

        assert!(grid.check_row(0, 1, 6, Reduction::All));
        assert!(grid.check_row(-3, 1, 20, Reduction::All));
        assert!(!grid.check_row(0, 0, 6, Reduction::All));
        assert!(grid.check_row(0, 0, 6, Reduction::Any));
        assert!(!grid.check_row(0, 0, 5, Reduction::Any));

        assert!(grid.check_column(5, 0, 4, Reduction::All));
        assert!(!grid.check_column(4, 0, 4, Reduction::All));

        assert!(grid.check_rect(4, 1, 2, 1, Reduction::All));
        assert!(!grid.check_rect(0, 2, 5, 2, Reduction::Any));
        // Entirely outside
        assert!(!grid.check_rect(10, 10, 2, 2, Reduction::Any));
        assert!(!grid.check_rect(10, 10, 2, 2, Reduction::All));
    }

    #[test]
    fn test_point_uses_cell_size_and_position() {
        let mut grid = GridShape::new(4, 4, 8.0, 4.0).expect("valid grid");
        grid.translate(vec2(100.0, 0.0));
        grid.set_cell(1, 2, true);

        let origin = vec2(0.0, 10.0);
        assert!(grid.intersects_point(origin, vec2(108.0, 18.0)));
        assert!(grid.intersects_point(origin, vec2(115.9, 21.9)));
        assert!(!grid.intersects_point(origin, vec2(116.0, 18.0)));
        assert!(!grid.intersects_point(origin, vec2(99.0, 18.0)));
    }

    #[test]
    fn test_rect_query_respects_half_open_edges() {
        let mut grid = grid(4, 4);
        grid.set_cell(2, 2, true);

        // Ends exactly where the occupied cell begins
        assert!(!grid.intersects_rect(Vec2::zeros(), &Rect::new(0.0, 0.0, 2.0, 2.0)));
        assert!(grid.intersects_rect(Vec2::zeros(), &Rect::new(0.0, 0.0, 2.1, 2.1)));
        // Starts exactly where it ends
        assert!(!grid.intersects_rect(Vec2::zeros(), &Rect::new(3.0, 3.0, 5.0, 5.0)));
        // Covers the whole grid and beyond
        assert!(grid.intersects_rect(Vec2::zeros(), &Rect::new(-10.0, -10.0, 50.0, 50.0)));
        assert!(!grid.intersects_rect(Vec2::zeros(), &Rect::new(10.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_segment_query_skips_far_segments() {
        let mut grid = grid(4, 4);
        grid.set_rect(0, 0, 4, 4, true);
        let segment = Segment::new(vec2(10.0, 10.0), vec2(20.0, 30.0));
        assert!(!grid.intersects_segment(Vec2::zeros(), &segment));
        let vertical = Segment::new(vec2(1.5, -5.0), vec2(1.5, 10.0));
        assert!(grid.intersects_segment(Vec2::zeros(), &vertical));
    }

    #[test]
    fn test_long_segment_is_clipped_to_the_grid() {
        let mut grid = grid(4, 4);
        let ray = Segment::new(vec2(-1.0e9, 1.5), vec2(1.0e9, 1.5));
        assert!(!grid.intersects_segment(Vec2::zeros(), &ray));
        grid.set_cell(2, 1, true);
        assert!(grid.intersects_segment(Vec2::zeros(), &ray));

        let steep = Segment::new(vec2(2.5, -3.0e8), vec2(2.5, 4.0e8));
        assert!(grid.intersects_segment(Vec2::zeros(), &steep));
    }

    #[test]
    fn test_huge_spans_clip_instead_of_overflowing() {
        let mut grid = grid(10, 3);
        grid.set_row(0, true);
        assert!(grid.check_row(5, 0, i32::MAX, Reduction::All));
        assert!(!grid.check_row(i32::MIN, 0, i32::MAX, Reduction::Any));
        assert!(grid.check_column(0, 0, i32::MAX, Reduction::Any));
        assert!(!grid.check_column(0, 0, i32::MAX, Reduction::All));
        assert!(grid.check_rect(0, 0, i32::MAX, i32::MAX, Reduction::Any));

        grid.set_rect(3, 1, i32::MAX, i32::MAX, true);
        assert_eq!(grid.occupied_count(), 10 + 7 * 2);
    }

    #[test]
    fn test_extend_shifts_cells_and_repeats_edges() {
        let mut grid = GridShape::from_bitstring("010\n111\n000", 2.0, 2.0).expect("valid grid");
        grid.extend(1, 2, 1, 0);

        assert_eq!((grid.columns(), grid.rows()), (6, 4));
        assert_eq!(grid.to_bitstring(), "001000\n001000\n111111\n000000");
        // World placement of the original cells is unchanged
        assert_eq!(grid.position(), vec2(-2.0, -2.0));
        assert!(grid.intersects_point(Vec2::zeros(), vec2(2.5, 0.5)));
    }

    #[test]
    fn test_extend_empty_grid() {
        let mut grid = grid(0, 0);
        grid.extend(2, 0, 0, 3);
        assert_eq!((grid.columns(), grid.rows()), (2, 3));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_bitstring_dump_has_exact_shape() {
        let mut grid = grid(3, 2);
        grid.set_cell(2, 1, true);
        assert_eq!(grid.to_bitstring(), "000\n001");
    }

    #[test]
    fn test_bitstring_load_treats_other_chars_as_empty() {
        let grid = GridShape::from_bitstring("1x1\r\n#1\n", 1.0, 1.0).expect("valid grid");
        assert_eq!((grid.columns(), grid.rows()), (3, 2));
        assert_eq!(grid.to_bitstring(), "101\n010");
    }

    #[test]
    fn test_bitstring_load_drops_overflow_and_resets() {
        let mut grid = grid(2, 2);
        grid.set_cell(0, 0, true);
        grid.load_bitstring("0111\n01\n11");
        assert_eq!(grid.to_bitstring(), "01\n01");

        grid.load_bitstring_with("#.\n.#", '#');
        assert_eq!(grid.to_bitstring(), "10\n01");
    }
}
