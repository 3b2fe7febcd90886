//! In-memory transform hierarchies used as partition patterns.

use crate::float_types::Real;
use crate::traits::{HierarchySource, TransformTree};
use nalgebra::Isometry3;
use std::collections::HashMap;

/// One node of a transform hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub parent: Option<usize>,
    /// Transform relative to the parent pivot
    pub transform: Isometry3<Real>,
}

/// A named tree of pivots. Pivot 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    pub name: String,
    pub pivots: Vec<Pivot>,
}

impl Hierarchy {
    /// A hierarchy holding only its root pivot at the identity.
    pub fn new(name: impl Into<String>) -> Self {
        Hierarchy {
            name: name.into(),
            pivots: vec![Pivot {
                parent: None,
                transform: Isometry3::identity(),
            }],
        }
    }

    /// Append a pivot under `parent` and return its index.
    pub fn add_pivot(&mut self, parent: usize, transform: Isometry3<Real>) -> usize {
        self.pivots.push(Pivot {
            parent: Some(parent),
            transform,
        });
        self.pivots.len() - 1
    }

    /// Builder form of [`Hierarchy::add_pivot`].
    pub fn with_pivot(mut self, parent: usize, transform: Isometry3<Real>) -> Self {
        self.add_pivot(parent, transform);
        self
    }
}

impl TransformTree for Hierarchy {
    fn pivot_count(&self) -> usize {
        self.pivots.len()
    }

    fn parent_index_of(&self, index: usize) -> Option<usize> {
        self.pivots[index].parent
    }

    fn local_transform_of(&self, index: usize) -> Isometry3<Real> {
        self.pivots[index].transform
    }
}

/// Hierarchies keyed by name.
#[derive(Debug, Clone, Default)]
pub struct HierarchySet {
    trees: HashMap<String, Hierarchy>,
}

impl HierarchySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `hierarchy`, replacing any previous one with the same name.
    pub fn insert(&mut self, hierarchy: Hierarchy) {
        self.trees.insert(hierarchy.name.clone(), hierarchy);
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl FromIterator<Hierarchy> for HierarchySet {
    fn from_iter<I: IntoIterator<Item = Hierarchy>>(iter: I) -> Self {
        let mut set = HierarchySet::new();
        for hierarchy in iter {
            set.insert(hierarchy);
        }
        set
    }
}

impl HierarchySource for HierarchySet {
    type Tree = Hierarchy;

    fn transform_tree(&self, name: &str) -> Option<&Hierarchy> {
        self.trees.get(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{Point3, Translation3};

    #[test]
    fn pattern_transform_composes_parents() {
        let h = Hierarchy::new("p")
            .with_pivot(0, Isometry3::translation(1.0, 0.0, 0.0))
            .with_pivot(1, Isometry3::translation(0.0, 2.0, 0.0));
        let t = h.pattern_transform_of(2);
        assert_eq!(t.translation, Translation3::new(1.0, 2.0, 0.0));
        assert_eq!(t * Point3::origin(), Point3::new(1.0, 2.0, 0.0));
    }
}
