//! Interfaces to the collaborators a shatter request reads from.
//!
//! The shatter system never owns a renderer mesh or a hierarchy asset: it
//! reads them through these traits. [`crate::mesh::SourceMesh`] and
//! [`crate::hierarchy::HierarchySet`] are ready-made in-memory implementations.

use crate::float_types::parry3d::bounding_volume::BoundingSphere;
use crate::float_types::{Color, Real};
use nalgebra::{Isometry3, Point3, Vector2, Vector3};
use std::fmt::Debug;

/// A named tree of rigid transforms ("pivots").
pub trait TransformTree {
    /// Number of pivots, including the root pivot 0.
    fn pivot_count(&self) -> usize;

    /// Parent of pivot `index`; `None` for the root.
    fn parent_index_of(&self, index: usize) -> Option<usize>;

    /// Transform of pivot `index` relative to its parent.
    fn local_transform_of(&self, index: usize) -> Isometry3<Real>;

    /// Transform of pivot `index` relative to the hierarchy root, with the
    /// root itself placed at the identity.
    ///
    /// Callers must ensure every parent index precedes its child.
    fn pattern_transform_of(&self, index: usize) -> Isometry3<Real> {
        let mut transform = self.local_transform_of(index);
        let mut current = self.parent_index_of(index);
        while let Some(parent) = current {
            transform = self.local_transform_of(parent) * transform;
            current = self.parent_index_of(parent);
        }
        transform
    }
}

/// Name-based lookup of transform hierarchies.
pub trait HierarchySource {
    type Tree: TransformTree;

    fn transform_tree(&self, name: &str) -> Option<&Self::Tree>;
}

/// A rigid triangle mesh and its per-pass material description.
///
/// Attribute arrays are indexed by vertex; triangles index into them.
pub trait ShatterSource {
    /// Whatever the renderer uses to describe the material, shader and
    /// textures of one pass. It is cloned into every fragment.
    type Material: Clone + Debug;

    /// Name used in diagnostics.
    fn name(&self) -> &str;

    fn pass_count(&self) -> usize;
    fn vertex_count(&self) -> usize;
    fn triangle_count(&self) -> usize;

    /// Vertex indices of triangle `index`.
    fn triangle(&self, index: usize) -> [usize; 3];

    fn vertex_position(&self, index: usize) -> Point3<Real>;
    fn vertex_normal(&self, index: usize) -> Vector3<Real>;

    /// Object-space bounding sphere.
    fn bounding_sphere(&self) -> BoundingSphere;

    /// Placement of the mesh in the world.
    fn object_to_world(&self) -> Isometry3<Real>;

    fn direct_colors(&self, pass: usize) -> Option<&[Color]>;
    fn illumination_colors(&self, pass: usize) -> Option<&[Color]>;
    fn uvs(&self, pass: usize, stage: usize) -> Option<&[Vector2<Real>]>;

    fn has_per_polygon_material_array(&self, pass: usize) -> bool;
    fn has_per_polygon_shader_array(&self, pass: usize) -> bool;
    fn has_per_polygon_texture_array(&self, pass: usize, stage: usize) -> bool;

    /// The single material shared by every polygon of `pass`.
    fn pass_material(&self, pass: usize) -> Option<Self::Material>;

    /// Whether the mesh must be depth sorted when rendered.
    fn is_sorted(&self) -> bool {
        false
    }
}
