//! Partition tree node data structure

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use log::debug;
use nalgebra::{Isometry3, Point3};

/// What lies on one side of a node's cutting plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// Another cutting plane refines this half-space.
    Node(Box<Node>),
    /// This half-space is a terminal region; polygons reaching it go to the
    /// leaf bucket with this index.
    Leaf(usize),
}

/// A partition tree node: a cutting plane plus what lies in front of and
/// behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub plane: Plane,
    pub front: Child,
    pub back: Child,
}

impl Node {
    /// Build the subtree rooted at pivot `bone`.
    ///
    /// `transforms` are pattern-space pivot transforms and `parents` the
    /// parent of every pivot; both must describe a valid hierarchy, where
    /// every parent precedes its children. Missing children take the next
    /// value of `leaf_counter`.
    pub(crate) fn from_pivots(
        transforms: &[Isometry3<Real>],
        parents: &[Option<usize>],
        bone: usize,
        leaf_counter: &mut usize,
    ) -> Self {
        let plane = Plane::from_transform(&transforms[bone]);

        // search for a front and back child of this bone
        let mut front = None;
        let mut back = None;
        for (pivot, parent) in parents.iter().enumerate() {
            if *parent != Some(bone) {
                continue;
            }
            let origin = Point3::from(transforms[pivot].translation.vector);
            let slot = if plane.in_front(&origin) { &mut front } else { &mut back };
            if let Some(previous) = slot.replace(pivot) {
                debug!("pattern pivot {bone}: child {previous} replaced by {pivot} on the same side");
            }
        }

        let front = match front {
            Some(pivot) => Child::Node(Box::new(Self::from_pivots(
                transforms,
                parents,
                pivot,
                leaf_counter,
            ))),
            None => Child::Leaf(next_leaf(leaf_counter)),
        };
        let back = match back {
            Some(pivot) => Child::Node(Box::new(Self::from_pivots(
                transforms,
                parents,
                pivot,
                leaf_counter,
            ))),
            None => Child::Leaf(next_leaf(leaf_counter)),
        };

        Node { plane, front, back }
    }

    /// Number of cutting planes in this subtree.
    pub fn plane_count(&self) -> usize {
        1 + [&self.front, &self.back]
            .iter()
            .map(|child| match child {
                Child::Node(node) => node.plane_count(),
                Child::Leaf(_) => 0,
            })
            .sum::<usize>()
    }

    /// Longest chain of planes from this node down to a leaf.
    pub fn depth(&self) -> usize {
        1 + [&self.front, &self.back]
            .iter()
            .map(|child| match child {
                Child::Node(node) => node.depth(),
                Child::Leaf(_) => 0,
            })
            .max()
            .unwrap_or(0)
    }

    /// Leaf slot containing `point`. Points on a plane count as in front.
    pub fn locate(&self, point: &Point3<Real>) -> usize {
        let child = if self.plane.signed_distance(point) >= 0.0 {
            &self.front
        } else {
            &self.back
        };
        match child {
            Child::Node(node) => node.locate(point),
            Child::Leaf(leaf) => *leaf,
        }
    }
}

fn next_leaf(counter: &mut usize) -> usize {
    let leaf = *counter;
    *counter += 1;
    leaf
}
