//! Fragments and their assembly from clipped polygon pools.

use crate::bsp::ClipPools;
use crate::errors::UnsupportedReason;
use crate::float_types::{
    Color, Real,
    parry3d::bounding_volume::Aabb,
};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::{MAX_PASSES, MAX_TEX_STAGES, Vertex};
use crate::space::SpaceMapper;
use crate::traits::ShatterSource;
use log::{debug, trace};
use nalgebra::{Isometry3, Point3, Translation3, Vector2, Vector3};
use std::sync::Arc;

/// A vertex of a finished fragment, in the fragment's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentVertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
    /// Combined vertex color per pass; `None` when the source pass has no
    /// vertex colors
    pub colors: [Option<Color>; MAX_PASSES],
    /// Texture coordinates per pass and stage; `None` where the source has none
    pub uv: [[Option<Vector2<Real>>; MAX_TEX_STAGES]; MAX_PASSES],
}

/// One independently placeable piece of a shattered mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<M> {
    pub vertices: Vec<FragmentVertex>,
    pub triangles: Vec<[usize; 3]>,
    /// The source mesh's shared material of each pass
    pub materials: Vec<Option<M>>,
    /// Placement in the world. Applying it to the local vertices puts them
    /// where the corresponding part of the source mesh was.
    pub transform: Isometry3<Real>,
    /// Copied from the source mesh
    pub sorted: bool,
    /// Local-space bounds, centered on the origin
    pub bounding_box: Aabb,
    /// Partition leaf the fragment was built from
    pub leaf: usize,
}

impl<M> Fragment<M> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn pass_count(&self) -> usize {
        self.materials.len()
    }

    /// Position of vertex `index` in the world.
    pub fn world_position(&self, index: usize) -> Point3<Real> {
        self.transform * self.vertices[index].pos
    }

    /// Total surface area of the fragment's triangles.
    pub fn area(&self) -> Real {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let (pa, pb, pc) = (
                    self.vertices[a].pos,
                    self.vertices[b].pos,
                    self.vertices[c].pos,
                );
                (pb - pa).cross(&(pc - pa)).norm() * 0.5
            })
            .sum()
    }
}

/// Which optional attribute arrays each pass of the source mesh carries.
#[derive(Debug, Clone, Copy, Default)]
struct PassLayout {
    direct: bool,
    illumination: bool,
    uv: [bool; MAX_TEX_STAGES],
}

/// Converts source triangles into clipping polygons and clipped polygon
/// pools back into fragments, for one mesh and one shatter request.
pub struct FragmentAssembler<'a, S: ShatterSource + ?Sized> {
    mesh: &'a S,
    mapper: &'a SpaceMapper,
    passes: Vec<PassLayout>,
}

impl<'a, S: ShatterSource + ?Sized> FragmentAssembler<'a, S> {
    /// Check that `mesh` can be shattered into fragments that each use a
    /// single material per pass.
    pub fn validate(mesh: &S) -> Result<(), UnsupportedReason> {
        let pass_count = mesh.pass_count();
        if pass_count > MAX_PASSES {
            return Err(UnsupportedReason::TooManyPasses(pass_count));
        }
        for pass in 0..pass_count {
            if mesh.has_per_polygon_material_array(pass) {
                return Err(UnsupportedReason::MaterialArray(pass));
            }
            if mesh.has_per_polygon_shader_array(pass) {
                return Err(UnsupportedReason::ShaderArray(pass));
            }
            for stage in 0..MAX_TEX_STAGES {
                if mesh.has_per_polygon_texture_array(pass, stage) {
                    return Err(UnsupportedReason::TextureArray { pass, stage });
                }
            }
        }
        Ok(())
    }

    /// `mesh` must have passed [`FragmentAssembler::validate`].
    pub fn new(mesh: &'a S, mapper: &'a SpaceMapper) -> Self {
        let passes = (0..mesh.pass_count())
            .map(|pass| PassLayout {
                direct: mesh.direct_colors(pass).is_some(),
                illumination: mesh.illumination_colors(pass).is_some(),
                uv: std::array::from_fn(|stage| mesh.uvs(pass, stage).is_some()),
            })
            .collect();
        FragmentAssembler {
            mesh,
            mapper,
            passes,
        }
    }

    /// Clipping polygon for source triangle `index`, given the shatter-space
    /// positions of every source vertex.
    ///
    /// Returns `None` for triangles with out-of-range vertex indices and for
    /// degenerate triangles.
    pub fn source_polygon(&self, index: usize, positions: &[Point3<Real>]) -> Option<Polygon> {
        let mut vertices = [Vertex::default(); 3];
        for (vertex, vi) in vertices.iter_mut().zip(self.mesh.triangle(index)) {
            let Some(pos) = positions.get(vi) else {
                debug!(
                    "mesh {}: triangle {index} refers to missing vertex {vi}",
                    self.mesh.name()
                );
                return None;
            };
            *vertex = Vertex::new(*pos, self.mesh.vertex_normal(vi)).with_passes(self.passes.len());

            for pass in 0..self.passes.len() {
                if let Some(c) = self.mesh.direct_colors(pass).and_then(|a| a.get(vi)) {
                    vertex.dcg[pass] = *c;
                }
                if let Some(c) = self.mesh.illumination_colors(pass).and_then(|a| a.get(vi)) {
                    vertex.dig[pass] = *c;
                }
                for stage in 0..MAX_TEX_STAGES {
                    if let Some(uv) = self.mesh.uvs(pass, stage).and_then(|a| a.get(vi)) {
                        vertex.uv[pass][stage] = *uv;
                    }
                }
            }
        }

        let mut polygon = Polygon::new(vertices, 0)?;
        if polygon.is_degenerate() {
            trace!("mesh {}: skipping degenerate triangle {index}", self.mesh.name());
            return None;
        }
        Some(polygon)
    }

    /// Build a fragment from every nonempty pool, in leaf order.
    pub fn assemble_all(&self, pools: &ClipPools) -> Vec<Arc<Fragment<S::Material>>> {
        pools
            .iter()
            .enumerate()
            .filter_map(|(leaf, pool)| self.assemble(leaf, pool))
            .map(Arc::new)
            .collect()
    }

    /// Build one fragment from the polygons of a leaf. Returns `None` for an
    /// empty pool.
    pub fn assemble(&self, leaf: usize, pool: &[Polygon]) -> Option<Fragment<S::Material>> {
        if pool.is_empty() {
            return None;
        }

        let vertex_count: usize = pool.iter().map(Polygon::vertex_count).sum();
        let triangle_count: usize = pool.iter().map(|p| p.vertex_count() - 2).sum();

        let mut vertices = Vec::with_capacity(vertex_count);
        let mut triangles = Vec::with_capacity(triangle_count);
        for polygon in pool {
            let base = vertices.len();
            triangles.extend(
                polygon
                    .fan_triangles()
                    .map(|[a, b, c]| [base + a, base + b, base + c]),
            );
            vertices.extend(polygon.vertices.iter().map(|v| self.output_vertex(v)));
        }

        // recenter on the bounding box center
        let first = vertices.first()?.pos;
        let (mins, maxs) = vertices
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.inf(&v.pos), hi.sup(&v.pos)));
        let center = Aabb::new(mins, maxs).center();
        for v in &mut vertices {
            v.pos -= center.coords;
        }
        let bounding_box = Aabb::new(mins - center.coords, maxs - center.coords);

        trace!(
            "mesh {}: fragment from leaf {leaf} with {} vertices, {} triangles",
            self.mesh.name(),
            vertices.len(),
            triangles.len()
        );

        Some(Fragment {
            vertices,
            triangles,
            materials: (0..self.passes.len())
                .map(|pass| self.mesh.pass_material(pass))
                .collect(),
            transform: self.mesh.object_to_world() * Translation3::from(center.coords),
            sorted: self.mesh.is_sorted(),
            bounding_box,
            leaf,
        })
    }

    fn output_vertex(&self, v: &Vertex) -> FragmentVertex {
        let mut colors = [None; MAX_PASSES];
        let mut uv = [[None; MAX_TEX_STAGES]; MAX_PASSES];
        for (pass, layout) in self.passes.iter().enumerate() {
            if layout.direct || layout.illumination {
                let (dcg, dig) = (v.dcg[pass], v.dig[pass]);
                colors[pass] = Some(Color::new(
                    dcg.x * dig.x,
                    dcg.y * dig.y,
                    dcg.z * dig.z,
                    dcg.w,
                ));
            }
            for stage in 0..MAX_TEX_STAGES {
                if layout.uv[stage] {
                    uv[pass][stage] = Some(v.uv[pass][stage]);
                }
            }
        }

        FragmentVertex {
            pos: self.mapper.to_object(&v.pos),
            normal: v.normal,
            colors,
            uv,
        }
    }
}
