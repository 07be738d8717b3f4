//! Definition of the cutting plane.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use na::Unit;

/// An infinite plane made of all the points `x` such that `normal.dot(x) == bias`.
///
/// The positive half-space (the "front" of a cut) is the side the normal points to.
#[derive(PartialEq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Plane {
    /// The plane's unit normal.
    pub normal: UnitVector<Real>,
    /// The signed distance of the plane from the origin, along `normal`.
    pub bias: Real,
}

impl Plane {
    /// Builds a new plane from its normal and its offset from the origin.
    #[inline]
    pub fn new(normal: UnitVector<Real>, bias: Real) -> Plane {
        Plane { normal, bias }
    }

    /// Builds the plane passing through `point` with the (not necessarily normalized) `normal`.
    ///
    /// Returns `None` if `normal` is too close to zero.
    pub fn from_point_normal(point: &Point<Real>, normal: &Vector<Real>) -> Option<Plane> {
        let normal = Unit::try_new(*normal, crate::math::DEFAULT_EPSILON)?;
        Some(Plane::new(normal, normal.dot(&point.coords)))
    }

    /// The signed distance of `pt` to this plane: positive in front, negative behind.
    #[inline]
    pub fn signed_distance(&self, pt: &Point<Real>) -> Real {
        self.normal.dot(&pt.coords) - self.bias
    }

    /// The orthogonal projection of `pt` on this plane.
    #[inline]
    pub fn project_point(&self, pt: &Point<Real>) -> Point<Real> {
        pt - *self.normal * self.signed_distance(pt)
    }

    /// The point of this plane closest to the origin.
    #[inline]
    pub fn origin(&self) -> Point<Real> {
        Point::from(*self.normal * self.bias)
    }

    /// The same plane with its front and back sides swapped.
    #[inline]
    pub fn flipped(&self) -> Plane {
        Plane::new(-self.normal, -self.bias)
    }

    /// Applies the isometry `m` to this plane.
    #[inline]
    pub fn transformed(&self, m: &Isometry<Real>) -> Plane {
        let normal = m.rotation * self.normal;
        let origin = m * self.origin();
        Plane::new(normal, normal.dot(&origin.coords))
    }

    /// Two unit vectors `(tangent, binormal)` spanning this plane.
    ///
    /// They satisfy `tangent.cross(&binormal) == normal`, so counter-clockwise
    /// polygons in the `(tangent, binormal)` coordinates are counter-clockwise
    /// around the plane normal.
    pub fn basis(&self) -> (Vector<Real>, Vector<Real>) {
        let n = self.normal.into_inner();
        let helper = if n.x.abs() < 0.57 {
            Vector::x()
        } else if n.y.abs() < 0.57 {
            Vector::y()
        } else {
            Vector::z()
        };
        let tangent = helper.cross(&n).normalize();
        let binormal = n.cross(&tangent);
        (tangent, binormal)
    }
}
