//! Ordered overlay shapes of a worksheet.
//!
//! Indices shift on removal; [`ShapeId`]s do not. Ids are assigned on
//! insertion and never reused within a collection.

use serde::{Serialize, Serializer};

use crate::anchor::AnchorRect;
use crate::types::{Shape, ShapeId};

#[derive(Debug, Clone, Default)]
pub struct ShapeCollection {
    shapes: Vec<Shape>,
    next_id: u64,
}

impl ShapeCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// Append a shape, assigning it a fresh id.
    pub fn add(&mut self, mut shape: Shape) -> ShapeId {
        self.next_id += 1;
        let id = ShapeId(self.next_id);
        shape.id = id;
        self.shapes.push(shape);
        id
    }

    /// Remove the shape with the given id.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.position(id)?;
        self.remove_at(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    #[must_use]
    pub fn position(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Index of the first shape occupying `rect`, in collection order.
    #[must_use]
    pub fn find_at_anchor(&self, rect: &AnchorRect) -> Option<usize> {
        self.shapes.iter().position(|s| rect.matches(s))
    }

    /// Number of shapes occupying `rect`. More than one means another
    /// editing path broke the one-signature-per-anchor rule.
    #[must_use]
    pub fn count_at_anchor(&self, rect: &AnchorRect) -> usize {
        self.shapes.iter().filter(|s| rect.matches(s)).count()
    }
}

impl<'a> IntoIterator for &'a ShapeCollection {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

impl Serialize for ShapeCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.shapes.iter())
    }
}
