//! Traits and structure needed to cast rays.

use crate::math::{Isometry, Point, Real, Vector};

/// A ray for ray-casting queries.
///
/// Points of the ray are `origin + dir * t` for `t ≥ 0`. The direction does not
/// need to be normalized but times of impact are expressed in multiples of its
/// length.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Transforms this ray by the given isometry.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        Self::new(m * self.origin, m * self.dir)
    }

    /// Transforms this ray by the inverse of the given isometry.
    #[inline]
    pub fn inverse_transform_by(&self, m: &Isometry<Real>) -> Self {
        Self::new(
            m.inverse_transform_point(&self.origin),
            m.inverse_transform_vector(&self.dir),
        )
    }

    /// Computes the point at the given parameter on this ray.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// Traits of convex shapes that can be tested for intersection with a ray.
pub trait RayCast {
    /// Computes the parameters `(t_enter, t_exit)` bounding the part of the
    /// line supporting `ray` lying inside of this shape.
    ///
    /// The parameters may be negative: the whole line is considered, not only
    /// the half-line starting at the ray origin.
    fn line_interval(&self, ray: &Ray) -> Option<(Real, Real)>;

    /// Computes the time of impact between this shape and a ray.
    ///
    /// If `solid` is `true`, a ray starting inside of the shape hits at time `0`.
    /// Otherwise it hits where it leaves the shape.
    fn cast_ray(&self, ray: &Ray, max_toi: Real, solid: bool) -> Option<Real> {
        let (t_enter, t_exit) = self.line_interval(ray)?;

        let toi = if t_exit < 0.0 {
            return None;
        } else if t_enter >= 0.0 {
            t_enter
        } else if solid {
            0.0
        } else {
            t_exit
        };

        if toi <= max_toi {
            Some(toi)
        } else {
            None
        }
    }

    /// Tests whether a ray intersects this shape.
    #[inline]
    fn intersects_ray(&self, ray: &Ray, max_toi: Real) -> bool {
        self.cast_ray(ray, max_toi, true).is_some()
    }
}
