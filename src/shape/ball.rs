//! Support mapping based Ball shape.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Vector};
use na::RealField;

/// A sphere placed in space.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Ball {
    /// The center of the ball.
    pub center: Point<Real>,
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a new ball with the given center and radius.
    #[inline]
    pub fn new(center: Point<Real>, radius: Real) -> Ball {
        Ball { center, radius }
    }

    /// Applies the isometry `m` to this ball.
    #[inline]
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        Ball::new(m * self.center, self.radius)
    }

    /// The volume of this ball.
    pub fn volume(&self) -> Real {
        Real::pi() * self.radius * self.radius * self.radius * 4.0 / 3.0
    }

    /// The AABB of this ball.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(self.center, Vector::repeat(self.radius))
    }

    /// Tests if the given point is inside of this ball.
    #[inline]
    pub fn contains_point(&self, pt: &Point<Real>) -> bool {
        na::distance_squared(&self.center, pt) <= self.radius * self.radius
    }
}
