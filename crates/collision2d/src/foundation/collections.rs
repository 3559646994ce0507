//! Specialized collection types

use std::sync::atomic::{AtomicU64, Ordering};

pub use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to an owner registered in a collider set
    pub struct OwnerKey;

    /// Handle to a shape attached to an owner
    pub struct ColliderHandle;

    /// Handle to an allocated block of sparse grid cells
    pub struct SegmentKey;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

/// Process-wide identity of a shape
///
/// Clones of a shape share its id; the id is what duplicate and ownership
/// checks compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

impl ShapeId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_ids_are_unique() {
        let a = ShapeId::next();
        let b = ShapeId::next();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
