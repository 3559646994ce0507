//! Collision query facade
//!
//! The request surface used by the owning entity/scene layer: a yes/no
//! test, a hypothetical-position test, and first/all/each searches over a
//! candidate list. All functions work on [`WorldSpaceShape`]s so owned and
//! unowned shapes are queried the same way.

use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision::{CollisionError, Segment, WorldSpaceShape};

/// Does `shape` collide with `other`?
pub fn collide(shape: &WorldSpaceShape<'_>, other: &WorldSpaceShape<'_>) -> Result<bool, CollisionError> {
    shape.intersects(other)
}

/// Would `shape` collide with `other` if its local position were `at`?
///
/// Evaluated on a re-placed view; the shape itself is never moved, so
/// there is no position to restore afterwards.
pub fn collide_at(
    shape: &WorldSpaceShape<'_>,
    at: Vec2,
    other: &WorldSpaceShape<'_>,
) -> Result<bool, CollisionError> {
    shape.placed_at(at).intersects(other)
}

/// First candidate, in order, that `shape` collides with
pub fn first<'c, 'a: 'c>(
    shape: &WorldSpaceShape<'_>,
    candidates: impl IntoIterator<Item = &'c WorldSpaceShape<'a>>,
) -> Result<Option<&'c WorldSpaceShape<'a>>, CollisionError> {
    for candidate in candidates {
        if shape.intersects(candidate)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Every candidate `shape` collides with, in input order
pub fn all<'c, 'a: 'c>(
    shape: &WorldSpaceShape<'_>,
    candidates: impl IntoIterator<Item = &'c WorldSpaceShape<'a>>,
) -> Result<Vec<&'c WorldSpaceShape<'a>>, CollisionError> {
    let mut hits = Vec::new();
    for candidate in candidates {
        if shape.intersects(candidate)? {
            hits.push(candidate);
        }
    }
    Ok(hits)
}

/// Call `visit` for every candidate `shape` collides with, in input order
///
/// Returns the number of hits.
pub fn each<'c, 'a: 'c>(
    shape: &WorldSpaceShape<'_>,
    candidates: impl IntoIterator<Item = &'c WorldSpaceShape<'a>>,
    mut visit: impl FnMut(&'c WorldSpaceShape<'a>),
) -> Result<usize, CollisionError> {
    let mut hits = 0;
    for candidate in candidates {
        if shape.intersects(candidate)? {
            visit(candidate);
            hits += 1;
        }
    }
    Ok(hits)
}

/// Does `shape` contain a world point?
pub fn collide_point(shape: &WorldSpaceShape<'_>, point: Vec2) -> Result<bool, CollisionError> {
    shape.contains_point(point)
}

/// Does a world segment touch `shape`?
pub fn collide_segment(shape: &WorldSpaceShape<'_>, segment: &Segment) -> Result<bool, CollisionError> {
    shape.intersects_segment(segment)
}

/// Does a world rectangle overlap `shape`?
pub fn collide_rect(shape: &WorldSpaceShape<'_>, rect: &Rect) -> Result<bool, CollisionError> {
    shape.intersects_rect(rect)
}
