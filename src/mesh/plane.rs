//! Cutting planes and side classification.

use crate::float_types::{Real, tolerance};
use nalgebra::{Isometry3, Point3, Vector3};

// Plane classification constants. A polygon's class is the bit-or of its
// vertex classes, so `FRONT | BACK == SPANNING`.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane, `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal
    pub w: Real,
}

impl Plane {
    /// Create a new plane from a normal vector and offset. The normal is
    /// normalized; `w` is taken as given.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Plane through `point` facing along `normal`.
    pub fn from_normal_and_point(normal: Vector3<Real>, point: &Point3<Real>) -> Self {
        let normal = normal.normalize();
        Plane {
            normal,
            w: normal.dot(&point.coords),
        }
    }

    /// The x-y plane of a coordinate frame: its z axis is the normal and its
    /// origin lies on the plane.
    pub fn from_transform(transform: &Isometry3<Real>) -> Self {
        let normal = transform.rotation * Vector3::z();
        let origin = Point3::from(transform.translation.vector);
        Self::from_normal_and_point(normal, &origin)
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Signed distance of `point` from the plane; positive in front.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Strict half-space test with no tolerance band.
    #[inline]
    pub fn in_front(&self, point: &Point3<Real>) -> bool {
        self.signed_distance(point) > 0.0
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`] using the
    /// global clipping tolerance.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let eps = tolerance();
        let d = self.signed_distance(point);
        if d > eps {
            FRONT
        } else if d < -eps {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Parameter `t` along `p0 → p1` where the segment meets the plane, or
    /// `None` when the segment is parallel to it.
    pub fn intersection_parameter(&self, p0: &Point3<Real>, p1: &Point3<Real>) -> Option<Real> {
        let denom = self.normal.dot(&(p1 - p0));
        if denom.abs() <= Real::EPSILON {
            return None;
        }
        Some((self.w - self.normal.dot(&p0.coords)) / denom)
    }
}
