//! Integration tests for tile-bitmap shapes
//!
//! Segment traversal is compared with a dense sampling rasterizer, and
//! bitstring dumps are checked against freshly loaded grids.

use std::collections::HashSet;

use crate::foundation::math::{vec2, Vec2};
use crate::physics::collision::{GridShape, GridTraversal, Segment, Shape};

/// Cells hit by `samples + 1` evenly spaced points along a segment
fn sampled_cells(start: Vec2, end: Vec2, samples: usize) -> HashSet<(i32, i32)> {
    (0..=samples)
        .map(|i| {
            let point = start + (end - start) * (i as f32 / samples as f32);
            (point.x.floor() as i32, point.y.floor() as i32)
        })
        .collect()
}

fn unit_grid(columns: usize, rows: usize) -> GridShape {
    GridShape::new(columns, rows, 1.0, 1.0).expect("valid grid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_walk_on_five_by_five() {
        let cells: Vec<_> = GridTraversal::new(vec2(0.5, 0.5), vec2(4.5, 4.5)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);

        let mut diagonal = GridShape::new(5, 5, 10.0, 10.0).expect("valid grid");
        for i in 0..5 {
            diagonal.set_cell(i, i, true);
        }
        let segment = Segment::new(vec2(5.0, 5.0), vec2(45.0, 45.0));
        assert!(diagonal.intersects_segment(Vec2::zeros(), &segment));

        // Side cells of each corner crossing are never entered
        let mut beside = GridShape::new(5, 5, 10.0, 10.0).expect("valid grid");
        beside.set_cell(1, 0, true);
        beside.set_cell(0, 1, true);
        assert!(!beside.intersects_segment(Vec2::zeros(), &segment));
    }

    #[test]
    fn test_each_diagonal_step_is_detected_on_its_own() {
        let diagonal = Segment::new(vec2(0.5, 0.5), vec2(4.5, 4.5));
        let anti_diagonal = Segment::new(vec2(4.5, 0.5), vec2(0.5, 4.5));

        for i in 0..5 {
            let mut grid = unit_grid(5, 5);
            grid.set_cell(i, i, true);
            assert!(grid.intersects_segment(Vec2::zeros(), &diagonal), "diagonal step {i}");

            let mut grid = unit_grid(5, 5);
            grid.set_cell(4 - i, i, true);
            assert!(grid.intersects_segment(Vec2::zeros(), &anti_diagonal), "anti-diagonal step {i}");
        }

        // Every other single cell stays clear of both walks
        for y in 0..5 {
            for x in 0..5 {
                let mut grid = unit_grid(5, 5);
                grid.set_cell(x, y, true);
                assert_eq!(grid.intersects_segment(Vec2::zeros(), &diagonal), x == y, "cell ({x}, {y})");
                assert_eq!(
                    grid.intersects_segment(Vec2::zeros(), &anti_diagonal),
                    x + y == 4,
                    "cell ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_traversal_matches_sampling_rasterizer() {
        let segments = [
            (vec2(0.3, 0.7), vec2(4.6, 2.2)),
            (vec2(4.9, 0.1), vec2(0.2, 4.4)),
            (vec2(2.5, 4.8), vec2(2.7, 0.3)),
            (vec2(0.1, 3.3), vec2(4.8, 3.6)),
        ];

        for (start, end) in segments {
            let walked: Vec<_> = GridTraversal::new(start, end).collect();
            let walked_set: HashSet<_> = walked.iter().copied().collect();
            assert_eq!(walked.len(), walked_set.len(), "cells repeat for {start:?} -> {end:?}");
            assert_eq!(walked_set, sampled_cells(start, end, 20_000), "{start:?} -> {end:?}");

            // Consecutive cells are neighbours
            for pair in walked.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            }
            assert_eq!(walked.first(), Some(&(start.x as i32, start.y as i32)));
            assert_eq!(walked.last(), Some(&(end.x as i32, end.y as i32)));
        }
    }

    #[test]
    fn test_segment_hits_exactly_the_walked_cells() {
        let (start, end) = (vec2(0.3, 0.7), vec2(4.6, 2.2));
        let segment = Segment::new(start, end);
        let walked: HashSet<_> = GridTraversal::new(start, end).collect();

        for y in 0..5 {
            for x in 0..5 {
                let mut grid = unit_grid(5, 5);
                grid.set_cell(x, y, true);
                assert_eq!(
                    grid.intersects_segment(Vec2::zeros(), &segment),
                    walked.contains(&(x, y)),
                    "cell ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_traversal_respects_cell_size_and_origin() {
        let mut grid = GridShape::new(10, 10, 16.0, 8.0).expect("valid grid");
        grid.set_cell(3, 5, true);
        let origin = vec2(100.0, 200.0);

        // Horizontal segment through row 5 (world y 240..248)
        let through = Segment::new(vec2(90.0, 244.0), vec2(300.0, 244.0));
        assert!(grid.intersects_segment(origin, &through));
        let cells: Vec<_> = grid.cells_on_segment(origin, &through).take(2).collect();
        assert_eq!(cells, vec![(-1, 5), (0, 5)]);

        let above = Segment::new(vec2(90.0, 239.0), vec2(300.0, 239.0));
        assert!(!grid.intersects_segment(origin, &above));
    }

    #[test]
    fn test_bitstring_round_trips() {
        let cases = ["0000\n0000\n0000", "111\n111", "10101\n01010\n11100\n00011", "1"];
        for text in cases {
            let grid = GridShape::from_bitstring(text, 1.0, 1.0).expect("valid grid");
            assert_eq!(grid.to_bitstring(), text);

            let mut reloaded = unit_grid(grid.columns(), grid.rows());
            reloaded.load_bitstring(&grid.to_bitstring());
            assert_eq!(reloaded.occupied_count(), grid.occupied_count());
            assert_eq!(reloaded.to_bitstring(), text);
        }
    }

    #[test]
    fn test_large_sparse_level() {
        let mut grid = GridShape::new(2000, 1500, 16.0, 16.0).expect("valid grid");
        grid.set_row(1499, true);
        grid.set_cell(1999, 0, true);
        assert_eq!(grid.occupied_count(), 2001);

        let floor = Shape::Grid(grid);
        let feet = Shape::rect(vec2(500.0, 1499.0 * 16.0 - 4.0), 8.0, 8.0);
        let head = Shape::rect(vec2(500.0, 100.0), 8.0, 8.0);
        assert_eq!(feet.collides_with(&floor), Ok(true));
        assert_eq!(head.collides_with(&floor), Ok(false));
    }
}
