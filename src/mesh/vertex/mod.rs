//! Struct and functions for working with `Vertex`s from which clipping `Polygon`s are composed.

use crate::float_types::{COINCIDENCE_EPSILON, Color, Real, white};
use crate::mesh::plane::Plane;
use nalgebra::{Point3, Vector2, Vector3};

mod interpolation_methods;

/// Maximum number of rendering passes a shatterable mesh may use.
pub const MAX_PASSES: usize = 4;

/// Texture stages carried per pass.
pub const MAX_TEX_STAGES: usize = 2;

/// A clipping-time vertex: position, normal and every per-pass material
/// attribute that must survive a split.
///
/// Only the first `pass_count` entries of the per-pass arrays are meaningful.
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
    pub pass_count: usize,
    /// Direct (diffuse) color per pass
    pub dcg: [Color; MAX_PASSES],
    /// Illumination color per pass
    pub dig: [Color; MAX_PASSES],
    /// Texture coordinates per pass and stage
    pub uv: [[Vector2<Real>; MAX_TEX_STAGES]; MAX_PASSES],
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            pos: Point3::origin(),
            normal: Vector3::z(),
            pass_count: 0,
            dcg: [white(); MAX_PASSES],
            dig: [white(); MAX_PASSES],
            uv: [[Vector2::zeros(); MAX_TEX_STAGES]; MAX_PASSES],
        }
    }
}

impl Vertex {
    /// Create a new [`Vertex`] with no material passes.
    ///
    /// Non-finite components of `pos` and `normal` are replaced with zero.
    #[inline]
    pub fn new(mut pos: Point3<Real>, mut normal: Vector3<Real>) -> Self {
        // Sanitise position
        for c in pos.coords.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        // Sanitise normal
        for c in normal.iter_mut() {
            if !c.is_finite() {
                *c = 0.0;
            }
        }

        Vertex {
            pos,
            normal,
            ..Default::default()
        }
    }

    /// Same vertex carrying `pass_count` material passes.
    ///
    /// # Panics
    /// If `pass_count` exceeds [`MAX_PASSES`].
    pub fn with_passes(mut self, pass_count: usize) -> Self {
        assert!(pass_count <= MAX_PASSES, "at most {MAX_PASSES} passes are supported");
        self.pass_count = pass_count;
        self
    }

    /// Classify this vertex against `plane`, see [`Plane::orient_point`].
    #[inline]
    pub fn which_side(&self, plane: &Plane) -> i8 {
        plane.orient_point(&self.pos)
    }

    pub fn distance_to(&self, other: &Vertex) -> Real {
        (self.pos - other.pos).norm()
    }

    /// Whether the two positions are the same point for clipping purposes.
    #[inline]
    pub fn coincides_with(&self, other: &Vertex) -> bool {
        self.distance_to(other) < COINCIDENCE_EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct VertexEpsilon {
    pub position: <Point3<Real> as approx::AbsDiffEq>::Epsilon,
    pub normal: <Vector3<Real> as approx::AbsDiffEq>::Epsilon,
    /// Shared by colors and texture coordinates
    pub attribute: Real,
}

impl Vertex {
    fn attributes_eq(&self, other: &Self, eps: Real) -> bool {
        use approx::AbsDiffEq;
        let passes = self.pass_count;
        passes == other.pass_count
            && (0..passes).all(|p| {
                self.dcg[p].abs_diff_eq(&other.dcg[p], eps)
                    && self.dig[p].abs_diff_eq(&other.dig[p], eps)
                    && self.uv[p]
                        .iter()
                        .zip(other.uv[p].iter())
                        .all(|(a, b)| a.abs_diff_eq(b, eps))
            })
    }
}

impl approx::AbsDiffEq for Vertex {
    type Epsilon = VertexEpsilon;

    fn default_epsilon() -> Self::Epsilon {
        Self::Epsilon {
            position: <Point3<Real> as approx::AbsDiffEq>::default_epsilon(),
            normal: <Vector3<Real> as approx::AbsDiffEq>::default_epsilon(),
            attribute: <Real as approx::AbsDiffEq>::default_epsilon(),
        }
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        approx::AbsDiffEq::abs_diff_eq(&self.pos, &other.pos, epsilon.position)
            && approx::AbsDiffEq::abs_diff_eq(&self.normal, &other.normal, epsilon.normal)
            && self.attributes_eq(other, epsilon.attribute)
    }
}

impl approx::RelativeEq for Vertex {
    fn default_max_relative() -> Self::Epsilon {
        Self::Epsilon {
            position: <Point3<Real> as approx::RelativeEq>::default_max_relative(),
            normal: <Vector3<Real> as approx::RelativeEq>::default_max_relative(),
            attribute: <Real as approx::RelativeEq>::default_max_relative(),
        }
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        approx::RelativeEq::relative_eq(
            &self.pos,
            &other.pos,
            epsilon.position,
            max_relative.position,
        ) && approx::RelativeEq::relative_eq(
            &self.normal,
            &other.normal,
            epsilon.normal,
            max_relative.normal,
        ) && self.attributes_eq(other, epsilon.attribute.max(max_relative.attribute))
    }
}
