//! Binary space partitioning trees built from pattern hierarchies.

pub mod clip;
pub mod node;

pub use clip::ClipPools;
pub use node::{Child, Node};

use crate::errors::PatternError;
use crate::float_types::Real;
use crate::mesh::polygon::Polygon;
use crate::traits::TransformTree;
use nalgebra::{Isometry3, Point3};

/// A partition of shatter space into `leaf_count` convex regions.
///
/// Every point of space lies in exactly one leaf, and leaf indices are dense
/// in `0..leaf_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTree {
    root: Node,
    leaf_count: usize,
}

impl PartitionTree {
    /// Build a tree from a pattern hierarchy.
    ///
    /// Each pivot's local x-y plane becomes a cutting plane, and each child
    /// pivot refines the half-space its origin lies in. Pivot `root_bone`
    /// holds the first plane. Hierarchies with fewer than 2 or at least
    /// `max_fragments` pivots are rejected, as are hierarchies whose parents
    /// do not precede their children.
    pub fn from_hierarchy<T: TransformTree>(
        tree: &T,
        root_bone: usize,
        max_fragments: usize,
    ) -> Result<Self, PatternError> {
        let count = tree.pivot_count();
        if count < 2 {
            return Err(PatternError::TooFewPivots(count));
        }
        if count >= max_fragments {
            return Err(PatternError::TooManyPivots {
                count,
                limit: max_fragments,
            });
        }
        if root_bone >= count {
            return Err(PatternError::RootOutOfRange {
                root: root_bone,
                count,
            });
        }

        let parents: Vec<Option<usize>> = (0..count).map(|i| tree.parent_index_of(i)).collect();
        for (pivot, parent) in parents.iter().enumerate() {
            let valid = match parent {
                None => pivot == 0,
                Some(p) => *p < pivot,
            };
            if !valid {
                return Err(PatternError::InvalidParent {
                    pivot,
                    parent: *parent,
                });
            }
        }

        // Parents precede children, so one forward pass composes every
        // pattern-space transform.
        let mut transforms: Vec<Isometry3<Real>> = Vec::with_capacity(count);
        for (pivot, parent) in parents.iter().enumerate() {
            let local = tree.local_transform_of(pivot);
            let transform = match parent {
                Some(p) => transforms[*p] * local,
                None => local,
            };
            transforms.push(transform);
        }

        let mut leaf_count = 0;
        let root = Node::from_pivots(&transforms, &parents, root_bone, &mut leaf_count);
        Ok(PartitionTree { root, leaf_count })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub const fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Index of the leaf region containing `point`.
    pub fn locate(&self, point: &Point3<Real>) -> usize {
        self.root.locate(point)
    }

    /// Route `polygon` through the tree, appending each surviving piece to the
    /// pool of the leaf it ends in.
    ///
    /// `pools` must have been reset for this tree's leaf count.
    pub fn clip_polygon(&self, polygon: Polygon, pools: &mut ClipPools) {
        debug_assert!(pools.len() >= self.leaf_count);
        self.root.clip_polygon(polygon, pools);
    }
}
