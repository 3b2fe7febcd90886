//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use meshshatter::{
    Hierarchy, HierarchySet, MeshPass, SourceMesh,
    float_types::{Real, parry3d::bounding_volume::BoundingSphere},
    mesh::{polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Isometry3, Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()));
    Polygon::new(verts, 0).expect("polygon capacity exceeded")
}

/// A pattern with a single cutting plane, `z = offset` in shatter space.
pub fn single_plane_pattern(name: &str, offset: Real) -> Hierarchy {
    Hierarchy::new(name).with_pivot(0, Isometry3::translation(0.0, 0.0, offset))
}

/// `pattern0`: one plane through the shatter-space origin.
pub fn single_plane_patterns() -> HierarchySet {
    [single_plane_pattern("pattern0", 0.0)].into_iter().collect()
}

/// A one-pass mesh whose bounding radius equals the default canonical radius,
/// so shatter space has the same scale as object space.
pub fn unit_scale_mesh(positions: &[[Real; 3]], triangles: Vec<[usize; 3]>) -> SourceMesh<&'static str> {
    let positions = positions
        .iter()
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();
    SourceMesh::new("test-mesh", positions, triangles)
        .with_bounding_sphere(BoundingSphere::new(Point3::origin(), 5.0))
        .with_pass(MeshPass::new("stone"))
}

/// Impact at the world origin looking down world `-Z`. With an untransformed
/// mesh this makes shatter space coincide with object space.
pub fn straight_down() -> (Point3<Real>, Vector3<Real>) {
    (Point3::origin(), Vector3::new(0.0, 0.0, -1.0))
}

/// Area of the triangle `a b c`.
pub fn triangle_area(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Real {
    (b - a).cross(&(c - a)).norm() * 0.5
}
