//! Convex polygons as they are carried through the partition tree.

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane, SPANNING};
use crate::mesh::vertex::Vertex;
use arrayvec::ArrayVec;
use log::trace;
use nalgebra::{Point3, Vector3};

/// Vertex capacity of a clipping polygon. A triangle gains at most one
/// vertex per cutting plane, so this bounds the depth of patterns that can be
/// clipped without dropping pieces.
pub const MAX_POLYGON_VERTICES: usize = 24;

pub type PolygonVertices = ArrayVec<Vertex, MAX_POLYGON_VERTICES>;

/// A convex polygon with a cached supporting plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: PolygonVertices,

    /// Index into the source mesh's material set
    pub material_id: usize,

    /// Supporting plane, `None` until computed or when the vertices span no area
    pub plane: Option<Plane>,
}

impl Polygon {
    /// Build a polygon and compute its plane. Returns `None` if there are more
    /// than [`MAX_POLYGON_VERTICES`] vertices.
    pub fn new(vertices: impl IntoIterator<Item = Vertex>, material_id: usize) -> Option<Self> {
        let mut verts = PolygonVertices::new();
        for v in vertices {
            verts.try_push(v).ok()?;
        }
        let mut polygon = Polygon {
            vertices: verts,
            material_id,
            plane: None,
        };
        polygon.compute_plane();
        Some(polygon)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Newell's method normal, unnormalized, accumulated in double precision.
    /// Its length is twice the polygon's area.
    fn newell_normal(&self) -> Vector3<f64> {
        let n = self.vertices.len();
        let mut normal = Vector3::<f64>::zeros();
        for i in 0..n {
            let a = self.vertices[i].pos.cast::<f64>();
            let b = self.vertices[(i + 1) % n].pos.cast::<f64>();
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal
    }

    /// Recompute the cached plane from every edge of the polygon, with the
    /// vertex centroid as its point.
    pub fn compute_plane(&mut self) -> Option<Plane> {
        self.plane = None;
        if self.vertices.is_empty() {
            return None;
        }

        let normal = self.newell_normal();
        let len = normal.norm();
        if len <= f64::EPSILON {
            return None;
        }
        let centroid = self
            .vertices
            .iter()
            .fold(Vector3::<f64>::zeros(), |acc, v| acc + v.pos.coords.cast::<f64>())
            / self.vertices.len() as f64;

        let plane = Plane::from_normal_and_point(
            (normal / len).cast::<Real>(),
            &Point3::from(centroid.cast::<Real>()),
        );
        self.plane = Some(plane);
        self.plane
    }

    pub fn area(&self) -> Real {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        (self.newell_normal().norm() * 0.5) as Real
    }

    /// Classify the polygon against `plane`: [`COPLANAR`] if every vertex is
    /// on it, [`FRONT`]/[`BACK`] if every vertex is on that side or on the
    /// plane, otherwise [`SPANNING`].
    pub fn classify(&self, plane: &Plane) -> i8 {
        self.vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | v.which_side(plane))
    }

    /// Split a spanning polygon into its front and back parts.
    ///
    /// The walk starts at the first vertex that is not on the plane. Vertices
    /// on the plane join whichever side the walk last left; an edge that goes
    /// straight from one side to the other contributes an interpolated vertex
    /// to both halves. A half with fewer than three vertices, too many
    /// vertices, or an unrepairable degeneracy is returned as `None`.
    pub fn split(&self, plane: &Plane) -> (Option<Polygon>, Option<Polygon>) {
        debug_assert_eq!(self.classify(plane), SPANNING);

        let n = self.vertices.len();
        let mut front = SplitHalf::default();
        let mut back = SplitHalf::default();

        let Some(start) = self
            .vertices
            .iter()
            .position(|v| v.which_side(plane) != COPLANAR)
        else {
            return (None, None);
        };

        let mut iprev = start;
        let mut side_prev = self.vertices[start].which_side(plane);
        let mut last_definite = COPLANAR;
        let mut i = (start + 1) % n;

        for _ in 0..n {
            let vert = self.vertices[i];
            let prev = self.vertices[iprev];
            let side = vert.which_side(plane);

            match (side_prev, side) {
                (FRONT, FRONT) => front.push(vert),
                (FRONT, COPLANAR) => {
                    last_definite = FRONT;
                    front.push(vert);
                },
                (FRONT, _) => {
                    let point = Vertex::intersect_plane(&prev, &vert, plane);
                    front.push(point);
                    back.push(point);
                    back.push(vert);
                },
                (BACK, FRONT) => {
                    let point = Vertex::intersect_plane(&prev, &vert, plane);
                    back.push(point);
                    front.push(point);
                    front.push(vert);
                },
                (BACK, COPLANAR) => {
                    last_definite = BACK;
                    back.push(vert);
                },
                (BACK, _) => back.push(vert),
                // previous vertex was on the plane
                (_, FRONT) => {
                    if last_definite == BACK {
                        front.push(prev);
                    }
                    front.push(vert);
                },
                (_, COPLANAR) => {
                    if last_definite == FRONT {
                        front.push(vert);
                    } else {
                        back.push(vert);
                    }
                },
                (_, _) => {
                    if last_definite == FRONT {
                        back.push(prev);
                    }
                    back.push(vert);
                },
            }

            side_prev = side;
            iprev = i;
            i = (i + 1) % n;
        }

        (
            front.finish(self.material_id),
            back.finish(self.material_id),
        )
    }

    /// Whether the polygon cannot be used as a face: fewer than three
    /// vertices, two coincident vertices, no area, or a vertex off the cached
    /// plane even after recomputing it once.
    pub fn is_degenerate(&mut self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            trace!("degenerate polygon: fewer than 3 vertices");
            return true;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if self.vertices[i].coincides_with(&self.vertices[j]) {
                    trace!("degenerate polygon: coincident vertices {i} and {j}");
                    return true;
                }
            }
        }

        let plane = match self.plane {
            Some(plane) => plane,
            None => match self.compute_plane() {
                Some(plane) => plane,
                None => {
                    trace!("degenerate polygon: no area");
                    return true;
                },
            },
        };

        if self.off_plane(&plane) {
            let Some(plane) = self.compute_plane() else {
                trace!("degenerate polygon: no area");
                return true;
            };
            if self.off_plane(&plane) {
                trace!("degenerate polygon: invalid plane");
                return true;
            }
        }

        false
    }

    fn off_plane(&self, plane: &Plane) -> bool {
        self.vertices
            .iter()
            .any(|v| v.which_side(plane) != COPLANAR)
    }

    /// Merge runs of adjacent coincident vertices, then re-test.
    /// Returns `true` if the polygon is usable afterwards.
    pub fn salvage_degenerate(&mut self) -> bool {
        let mut i = 0;
        while self.vertices.len() > 1 && i < self.vertices.len() {
            let j = (i + 1) % self.vertices.len();
            if self.vertices[i].coincides_with(&self.vertices[j]) {
                self.vertices.remove(j);
            } else {
                i += 1;
            }
        }

        self.compute_plane();
        !self.is_degenerate()
    }

    /// Fan triangulation from the first vertex, as local vertex indices.
    pub fn fan_triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (1..self.vertices.len().saturating_sub(1)).map(|i| [0, i, i + 1])
    }
}

/// One side of a split under construction.
#[derive(Default)]
struct SplitHalf {
    vertices: PolygonVertices,
    overflow: bool,
}

impl SplitHalf {
    fn push(&mut self, v: Vertex) {
        if self.vertices.try_push(v).is_err() {
            self.overflow = true;
        }
    }

    fn finish(self, material_id: usize) -> Option<Polygon> {
        if self.overflow {
            trace!("dropping split polygon: more than {MAX_POLYGON_VERTICES} vertices");
            return None;
        }
        if self.vertices.len() < 3 {
            return None;
        }

        let mut polygon = Polygon {
            vertices: self.vertices,
            material_id,
            plane: None,
        };
        polygon.compute_plane();

        if polygon.is_degenerate() && !polygon.salvage_degenerate() {
            trace!("dropping split polygon: degenerate after salvage");
            return None;
        }
        Some(polygon)
    }
}
