//! Mapping between a mesh's object space and shatter space.
//!
//! Shatter space is the frame patterns are authored in: the impact point is
//! the origin, the impact direction is `-Z`, and the mesh is uniformly scaled
//! so its bounding sphere has the canonical radius.

use crate::errors::ShatterError;
use crate::float_types::{EPSILON, Real};
use crate::traits::ShatterSource;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

/// `|cos|` of the angle between the impact direction and world `+Z` above
/// which `+Y` is used as the up vector instead.
const VERTICAL_COSINE: Real = 0.999;

/// The transforms of one shatter request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceMapper {
    shatter_to_world: Isometry3<Real>,
    world_to_shatter: Isometry3<Real>,
    object_to_shatter: Matrix4<Real>,
    shatter_to_object: Matrix4<Real>,
    scale: Real,
}

impl SpaceMapper {
    /// Set up shatter space for hitting `mesh` at `point` (world space) along
    /// `direction`.
    ///
    /// Fails if the direction has no usable length or the mesh's bounding
    /// radius is not larger than the clipping epsilon.
    pub fn new<S: ShatterSource + ?Sized>(
        mesh: &S,
        point: &Point3<Real>,
        direction: &Vector3<Real>,
        canonical_radius: Real,
    ) -> Result<Self, ShatterError> {
        let radius = mesh.bounding_sphere().radius();
        if !radius.is_finite() || radius <= EPSILON {
            return Err(ShatterError::DegenerateBoundingRadius {
                mesh: mesh.name().to_string(),
                radius,
            });
        }

        let world_to_shatter = look_from(point, direction)?;
        let shatter_to_world = world_to_shatter.inverse();
        let object_to_world = mesh.object_to_world();

        let scale = canonical_radius / radius;
        let object_to_shatter = Matrix4::new_scaling(scale)
            * (world_to_shatter * object_to_world).to_homogeneous();
        let shatter_to_object = (object_to_world.inverse() * shatter_to_world).to_homogeneous()
            * Matrix4::new_scaling(1.0 / scale);

        Ok(SpaceMapper {
            shatter_to_world,
            world_to_shatter,
            object_to_shatter,
            shatter_to_object,
            scale,
        })
    }

    pub const fn shatter_to_world(&self) -> &Isometry3<Real> {
        &self.shatter_to_world
    }

    pub const fn world_to_shatter(&self) -> &Isometry3<Real> {
        &self.world_to_shatter
    }

    pub const fn object_to_shatter(&self) -> &Matrix4<Real> {
        &self.object_to_shatter
    }

    pub const fn shatter_to_object(&self) -> &Matrix4<Real> {
        &self.shatter_to_object
    }

    /// Object-to-shatter scale factor, canonical radius over mesh radius.
    pub const fn scale(&self) -> Real {
        self.scale
    }

    #[inline]
    pub fn to_shatter(&self, p: &Point3<Real>) -> Point3<Real> {
        self.object_to_shatter.transform_point(p)
    }

    #[inline]
    pub fn to_object(&self, p: &Point3<Real>) -> Point3<Real> {
        self.shatter_to_object.transform_point(p)
    }
}

/// World-to-shatter isometry of a viewer at `point` looking along `direction`.
fn look_from(point: &Point3<Real>, direction: &Vector3<Real>) -> Result<Isometry3<Real>, ShatterError> {
    if !direction.iter().all(|c| c.is_finite()) {
        return Err(ShatterError::DegenerateDirection);
    }
    let Some(dir) = direction.try_normalize(Real::EPSILON) else {
        return Err(ShatterError::DegenerateDirection);
    };

    let up = if dir.z.abs() > VERTICAL_COSINE {
        Vector3::y()
    } else {
        Vector3::z()
    };
    Ok(Isometry3::look_at_rh(point, &(point + dir), &up))
}
