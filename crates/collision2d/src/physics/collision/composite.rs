//! Composite collision shape built from an ordered list of children
//!
//! Children share the composite's owner. Collision is the OR of the
//! children, bounds are their union, and moving the composite translates
//! every child.

use log::debug;

use super::shape::Shape;
use super::CollisionError;
use crate::config::Validation;
use crate::foundation::collections::ShapeId;
use crate::foundation::math::{Rect, Vec2};

/// An ordered, non-empty group of shapes acting as one
#[derive(Debug, Clone)]
pub struct CompositeShape {
    id: ShapeId,
    children: Vec<Shape>,
    validation: Validation,
}

impl CompositeShape {
    /// Group `children`, validating per the build profile
    pub fn new(children: Vec<Shape>) -> Result<Self, CollisionError> {
        Self::with_validation(children, Validation::auto())
    }

    /// Group `children` with an explicit validation mode
    ///
    /// An empty list is always rejected. In strict mode a shape that
    /// appears twice (directly or nested) is rejected too.
    pub fn with_validation(children: Vec<Shape>, validation: Validation) -> Result<Self, CollisionError> {
        if children.is_empty() {
            return Err(CollisionError::EmptyComposite);
        }
        if validation.is_strict() {
            let mut seen = Vec::new();
            for child in &children {
                for id in child.ids() {
                    if seen.contains(&id) {
                        return Err(CollisionError::DuplicateShape(id));
                    }
                    seen.push(id);
                }
            }
        }
        Ok(Self {
            id: ShapeId::next(),
            children,
            validation,
        })
    }

    /// Identity of this shape
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    /// Validation mode used by [`add`](Self::add)
    pub const fn validation(&self) -> Validation {
        self.validation
    }

    /// Children in insertion order
    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Always false; a composite holds at least one child
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether a direct child has this id
    pub fn contains(&self, id: ShapeId) -> bool {
        self.children.iter().any(|child| child.id() == id)
    }

    /// Append a child
    ///
    /// Strict mode rejects a shape already present anywhere in this
    /// composite, including the composite itself.
    pub fn add(&mut self, shape: Shape) -> Result<(), CollisionError> {
        if self.validation.is_strict() {
            let existing = self.all_ids();
            if let Some(id) = shape.ids().into_iter().find(|id| existing.contains(id)) {
                return Err(CollisionError::DuplicateShape(id));
            }
        }
        debug!("Adding {} {} to composite {}", shape.kind(), shape.id(), self.id);
        self.children.push(shape);
        Ok(())
    }

    /// Remove and return the direct child with `id`
    ///
    /// Removing the last child is rejected to keep the composite non-empty.
    pub fn remove(&mut self, id: ShapeId) -> Result<Shape, CollisionError> {
        let index = self
            .children
            .iter()
            .position(|child| child.id() == id)
            .ok_or(CollisionError::ShapeNotFound(id))?;
        if self.children.len() == 1 {
            return Err(CollisionError::EmptyComposite);
        }
        debug!("Removing shape {} from composite {}", id, self.id);
        Ok(self.children.remove(index))
    }

    /// Union of the children's local bounds
    pub fn bounds(&self) -> Rect {
        self.children
            .iter()
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(&bounds))
            .unwrap_or_default()
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        for child in &mut self.children {
            child.translate(delta);
        }
    }

    fn all_ids(&self) -> Vec<ShapeId> {
        let mut ids = vec![self.id];
        ids.extend(self.children.iter().flat_map(Shape::ids));
        ids
    }
}
