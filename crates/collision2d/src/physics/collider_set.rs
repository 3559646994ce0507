//! Owner-relative collider storage
//!
//! Owners are positions registered under an [`OwnerKey`]. Shapes attached
//! to an owner are stored in local space and placed at the owner's position
//! whenever they are tested, so moving an owner moves all of its shapes.
//! A shape belongs to at most one owner; in strict mode attaching a shape
//! whose id is already attached is rejected.

use log::{debug, warn};

use crate::config::{CollisionConfig, Validation};
use crate::foundation::collections::{ColliderHandle, HandleMap, OwnerKey, ShapeId};
use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision::{CollisionError, Segment, Shape, WorldSpaceShape};
use crate::physics::collision_query;

/// Shape plus the owner it is placed relative to
#[derive(Debug, Clone)]
struct AttachedCollider {
    owner: OwnerKey,
    shape: Shape,
}

/// Owners and the shapes attached to them
#[derive(Debug, Clone)]
pub struct ColliderSet {
    owners: HandleMap<OwnerKey, Vec2>,
    colliders: HandleMap<ColliderHandle, AttachedCollider>,
    validation: Validation,
}

impl Default for ColliderSet {
    fn default() -> Self {
        Self::new(&CollisionConfig::default())
    }
}

impl ColliderSet {
    /// Create an empty set using the validation mode from `config`
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            owners: HandleMap::with_key(),
            colliders: HandleMap::with_key(),
            validation: config.validation,
        }
    }

    /// Validation mode used by [`attach`](Self::attach)
    pub const fn validation(&self) -> Validation {
        self.validation
    }

    /// Register an owner at `position`
    pub fn insert_owner(&mut self, position: Vec2) -> OwnerKey {
        self.owners.insert(position)
    }

    /// Move an owner; its shapes follow
    pub fn set_owner_position(&mut self, owner: OwnerKey, position: Vec2) -> Result<(), CollisionError> {
        let slot = self.owners.get_mut(owner).ok_or(CollisionError::OwnerNotFound)?;
        *slot = position;
        Ok(())
    }

    /// Current owner position
    pub fn owner_position(&self, owner: OwnerKey) -> Option<Vec2> {
        self.owners.get(owner).copied()
    }

    /// Remove an owner, handing back every shape that was attached to it
    pub fn remove_owner(&mut self, owner: OwnerKey) -> Result<Vec<Shape>, CollisionError> {
        self.owners.remove(owner).ok_or(CollisionError::OwnerNotFound)?;
        let handles = self.colliders_of(owner);
        let shapes: Vec<Shape> = handles
            .into_iter()
            .filter_map(|handle| self.colliders.remove(handle))
            .map(|collider| collider.shape)
            .collect();
        debug!("Removed owner {:?} with {} collider(s)", owner, shapes.len());
        Ok(shapes)
    }

    /// Attach `shape` to `owner`
    ///
    /// Strict mode rejects a shape (or nested child) whose id is already
    /// attached anywhere in this set.
    pub fn attach(&mut self, owner: OwnerKey, shape: Shape) -> Result<ColliderHandle, CollisionError> {
        if !self.owners.contains_key(owner) {
            return Err(CollisionError::OwnerNotFound);
        }
        if self.validation.is_strict() {
            if let Some(id) = shape.ids().into_iter().find(|id| self.is_attached(*id)) {
                warn!("Rejected attaching {} {}: already owned", shape.kind(), id);
                return Err(CollisionError::AlreadyOwned(id));
            }
        }
        debug!("Attaching {} {} to owner {:?}", shape.kind(), shape.id(), owner);
        Ok(self.colliders.insert(AttachedCollider { owner, shape }))
    }

    /// Detach a shape, returning it unowned
    pub fn detach(&mut self, handle: ColliderHandle) -> Result<Shape, CollisionError> {
        let collider = self.colliders.remove(handle).ok_or(CollisionError::ColliderNotFound)?;
        debug!("Detached {} {} from owner {:?}", collider.shape.kind(), collider.shape.id(), collider.owner);
        Ok(collider.shape)
    }

    /// Whether a shape with this id is attached
    pub fn is_attached(&self, id: ShapeId) -> bool {
        self.colliders
            .values()
            .any(|collider| collider.shape.ids().contains(&id))
    }

    /// Attached shape in local space
    pub fn shape(&self, handle: ColliderHandle) -> Option<&Shape> {
        self.colliders.get(handle).map(|collider| &collider.shape)
    }

    /// Mutable attached shape in local space
    ///
    /// For in-place edits such as moving or resizing. Assigning a whole
    /// different shape through this reference skips the ownership check;
    /// use [`replace_shape`](Self::replace_shape) for that.
    pub fn shape_mut(&mut self, handle: ColliderHandle) -> Option<&mut Shape> {
        self.colliders.get_mut(handle).map(|collider| &mut collider.shape)
    }

    /// Swap the shape behind `handle`, returning the previous one
    ///
    /// Strict mode rejects a replacement (or nested child) whose id is
    /// attached under any other handle.
    pub fn replace_shape(&mut self, handle: ColliderHandle, shape: Shape) -> Result<Shape, CollisionError> {
        if !self.colliders.contains_key(handle) {
            return Err(CollisionError::ColliderNotFound);
        }
        if self.validation.is_strict() {
            let taken = shape.ids().into_iter().find(|id| {
                self.colliders
                    .iter()
                    .any(|(other, collider)| other != handle && collider.shape.ids().contains(id))
            });
            if let Some(id) = taken {
                warn!("Rejected replacing collider with {} {}: already owned", shape.kind(), id);
                return Err(CollisionError::AlreadyOwned(id));
            }
        }
        let collider = self.colliders.get_mut(handle).ok_or(CollisionError::ColliderNotFound)?;
        debug!("Replacing {} {} with {} {}", collider.shape.kind(), collider.shape.id(), shape.kind(), shape.id());
        Ok(std::mem::replace(&mut collider.shape, shape))
    }

    /// Owner of an attached shape
    pub fn owner_of(&self, handle: ColliderHandle) -> Option<OwnerKey> {
        self.colliders.get(handle).map(|collider| collider.owner)
    }

    /// Attached shape placed at its owner's position
    pub fn world_shape(&self, handle: ColliderHandle) -> Result<WorldSpaceShape<'_>, CollisionError> {
        let collider = self.colliders.get(handle).ok_or(CollisionError::ColliderNotFound)?;
        let origin = self.owners.get(collider.owner).ok_or(CollisionError::OwnerNotFound)?;
        Ok(collider.shape.to_world_space(Some(*origin)))
    }

    /// Handles attached to `owner`
    pub fn colliders_of(&self, owner: OwnerKey) -> Vec<ColliderHandle> {
        self.colliders
            .iter()
            .filter(|(_, collider)| collider.owner == owner)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Number of attached shapes
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no shape is attached
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Does `a` collide with `b`?
    pub fn collide(&self, a: ColliderHandle, b: ColliderHandle) -> Result<bool, CollisionError> {
        collision_query::collide(&self.world_shape(a)?, &self.world_shape(b)?)
    }

    /// Would `a` collide with `b` if its local position were `at`?
    pub fn collide_at(&self, a: ColliderHandle, at: Vec2, b: ColliderHandle) -> Result<bool, CollisionError> {
        collision_query::collide_at(&self.world_shape(a)?, at, &self.world_shape(b)?)
    }

    /// First of `candidates`, in order, that `shape` collides with
    pub fn first(
        &self,
        shape: ColliderHandle,
        candidates: &[ColliderHandle],
    ) -> Result<Option<ColliderHandle>, CollisionError> {
        let seeker = self.world_shape(shape)?;
        for &candidate in candidates {
            if seeker.intersects(&self.world_shape(candidate)?)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Every one of `candidates` that `shape` collides with, in input order
    pub fn all(&self, shape: ColliderHandle, candidates: &[ColliderHandle]) -> Result<Vec<ColliderHandle>, CollisionError> {
        let mut hits = Vec::new();
        self.each(shape, candidates, |hit| hits.push(hit))?;
        Ok(hits)
    }

    /// Call `visit` for every one of `candidates` that `shape` collides with
    ///
    /// Returns the number of hits.
    pub fn each(
        &self,
        shape: ColliderHandle,
        candidates: &[ColliderHandle],
        mut visit: impl FnMut(ColliderHandle),
    ) -> Result<usize, CollisionError> {
        let seeker = self.world_shape(shape)?;
        let mut hits = 0;
        for &candidate in candidates {
            if seeker.intersects(&self.world_shape(candidate)?)? {
                visit(candidate);
                hits += 1;
            }
        }
        Ok(hits)
    }

    /// Does an attached shape contain a world point?
    pub fn collide_point(&self, shape: ColliderHandle, point: Vec2) -> Result<bool, CollisionError> {
        collision_query::collide_point(&self.world_shape(shape)?, point)
    }

    /// Does a world segment touch an attached shape?
    pub fn collide_segment(&self, shape: ColliderHandle, segment: &Segment) -> Result<bool, CollisionError> {
        collision_query::collide_segment(&self.world_shape(shape)?, segment)
    }

    /// Does a world rectangle overlap an attached shape?
    pub fn collide_rect(&self, shape: ColliderHandle, rect: &Rect) -> Result<bool, CollisionError> {
        collision_query::collide_rect(&self.world_shape(shape)?, rect)
    }
}
