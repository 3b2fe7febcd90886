//! `SourceMesh`, an in-memory [`ShatterSource`], and the clipping geometry
//! types it is converted into.

use crate::float_types::{
    Color, Real,
    parry3d::bounding_volume::{Aabb, BoundingSphere},
};
use crate::mesh::vertex::MAX_TEX_STAGES;
use crate::traits::ShatterSource;
use nalgebra::{Isometry3, Point3, Vector2, Vector3};
use std::{fmt::Debug, sync::OnceLock};

pub mod plane;
pub mod polygon;
pub mod vertex;

/// Material description and vertex attributes of one rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPass<M> {
    /// Material, shader and textures shared by every polygon of the pass
    pub material: Option<M>,
    pub direct_colors: Option<Vec<Color>>,
    pub illumination_colors: Option<Vec<Color>>,
    /// Texture coordinates per stage
    pub uvs: [Option<Vec<Vector2<Real>>>; MAX_TEX_STAGES],

    // Per-polygon material arrays. A mesh with any of these set cannot be
    // shattered into single-material fragments.
    pub per_polygon_materials: bool,
    pub per_polygon_shaders: bool,
    pub per_polygon_textures: [bool; MAX_TEX_STAGES],
}

impl<M> Default for MeshPass<M> {
    fn default() -> Self {
        MeshPass {
            material: None,
            direct_colors: None,
            illumination_colors: None,
            uvs: std::array::from_fn(|_| None),
            per_polygon_materials: false,
            per_polygon_shaders: false,
            per_polygon_textures: [false; MAX_TEX_STAGES],
        }
    }
}

impl<M> MeshPass<M> {
    pub fn new(material: M) -> Self {
        MeshPass {
            material: Some(material),
            ..Default::default()
        }
    }

    pub fn with_direct_colors(mut self, colors: Vec<Color>) -> Self {
        self.direct_colors = Some(colors);
        self
    }

    pub fn with_illumination_colors(mut self, colors: Vec<Color>) -> Self {
        self.illumination_colors = Some(colors);
        self
    }

    /// # Panics
    /// If `stage` is not below [`MAX_TEX_STAGES`].
    pub fn with_uvs(mut self, stage: usize, uvs: Vec<Vector2<Real>>) -> Self {
        self.uvs[stage] = Some(uvs);
        self
    }
}

/// A rigid, indexed triangle mesh placed in the world.
#[derive(Debug, Clone)]
pub struct SourceMesh<M: Clone + Debug> {
    pub name: String,
    pub positions: Vec<Point3<Real>>,
    /// Per-vertex normals, parallel to `positions`
    pub normals: Vec<Vector3<Real>>,
    pub triangles: Vec<[usize; 3]>,
    pub transform: Isometry3<Real>,
    pub passes: Vec<MeshPass<M>>,
    /// Whether the mesh is drawn with depth sorting
    pub sorted: bool,

    /// Lazily calculated bounding sphere that spans `positions`.
    pub bounding_sphere: OnceLock<BoundingSphere>,
}

impl<M: Clone + Debug> SourceMesh<M> {
    /// Build a mesh at the world origin with no passes. Vertex normals are
    /// the area-weighted average of the adjacent face normals.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Point3<Real>>,
        triangles: Vec<[usize; 3]>,
    ) -> Self {
        let normals = smooth_normals(&positions, &triangles);
        SourceMesh {
            name: name.into(),
            positions,
            normals,
            triangles,
            transform: Isometry3::identity(),
            passes: Vec::new(),
            sorted: false,
            bounding_sphere: OnceLock::new(),
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vector3<Real>>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_transform(mut self, transform: Isometry3<Real>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_pass(mut self, pass: MeshPass<M>) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn with_sorting(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Use `sphere` instead of one computed from the vertices.
    pub fn with_bounding_sphere(mut self, sphere: BoundingSphere) -> Self {
        self.bounding_sphere = OnceLock::from(sphere);
        self
    }

    /// Sphere around the center of the vertex bounding box that contains
    /// every vertex.
    fn compute_bounding_sphere(&self) -> BoundingSphere {
        let Some(first) = self.positions.first() else {
            return BoundingSphere::new(Point3::origin(), 0.0);
        };
        let (mins, maxs) = self
            .positions
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        let center = Aabb::new(mins, maxs).center();
        let radius = self
            .positions
            .iter()
            .map(|p| (p - center).norm())
            .fold(0.0, Real::max);
        BoundingSphere::new(center, radius)
    }
}

fn smooth_normals(positions: &[Point3<Real>], triangles: &[[usize; 3]]) -> Vec<Vector3<Real>> {
    let mut normals = vec![Vector3::zeros(); positions.len()];
    for &[a, b, c] in triangles {
        let (Some(pa), Some(pb), Some(pc)) = (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        // cross product length is twice the area, which weights the sum
        let face = (pb - pa).cross(&(pc - pa));
        for i in [a, b, c] {
            normals[i] += face;
        }
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::z))
        .collect()
}

impl<M: Clone + Debug> ShatterSource for SourceMesh<M> {
    type Material = M;

    fn name(&self) -> &str {
        &self.name
    }

    fn pass_count(&self) -> usize {
        self.passes.len()
    }

    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn triangle(&self, index: usize) -> [usize; 3] {
        self.triangles[index]
    }

    fn vertex_position(&self, index: usize) -> Point3<Real> {
        self.positions[index]
    }

    fn vertex_normal(&self, index: usize) -> Vector3<Real> {
        self.normals.get(index).copied().unwrap_or_else(Vector3::z)
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        *self
            .bounding_sphere
            .get_or_init(|| self.compute_bounding_sphere())
    }

    fn object_to_world(&self) -> Isometry3<Real> {
        self.transform
    }

    fn direct_colors(&self, pass: usize) -> Option<&[Color]> {
        self.passes.get(pass)?.direct_colors.as_deref()
    }

    fn illumination_colors(&self, pass: usize) -> Option<&[Color]> {
        self.passes.get(pass)?.illumination_colors.as_deref()
    }

    fn uvs(&self, pass: usize, stage: usize) -> Option<&[Vector2<Real>]> {
        self.passes.get(pass)?.uvs.get(stage)?.as_deref()
    }

    fn has_per_polygon_material_array(&self, pass: usize) -> bool {
        self.passes.get(pass).is_some_and(|p| p.per_polygon_materials)
    }

    fn has_per_polygon_shader_array(&self, pass: usize) -> bool {
        self.passes.get(pass).is_some_and(|p| p.per_polygon_shaders)
    }

    fn has_per_polygon_texture_array(&self, pass: usize, stage: usize) -> bool {
        self.passes
            .get(pass)
            .and_then(|p| p.per_polygon_textures.get(stage))
            .copied()
            .unwrap_or(false)
    }

    fn pass_material(&self, pass: usize) -> Option<M> {
        self.passes.get(pass)?.material.clone()
    }

    fn is_sorted(&self) -> bool {
        self.sorted
    }
}
