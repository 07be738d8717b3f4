//! Axis Aligned Bounding Box.

use crate::math::{Isometry, Point, Real, Vector, DIM};
use crate::query::PlaneSide;
use crate::shape::Plane;

/// An Axis Aligned Bounding Box.
///
/// Used both as a collider variant and as the cheap culling volume of the slicer.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "bytemuck-serialize",
    derive(bytemuck::Pod, bytemuck::Zeroable)
)]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB.
    ///
    /// # Arguments:
    ///   * `mins` - position of the point with the smallest coordinates.
    ///   * `maxs` - position of the point with the highest coordinates. Each component of `mins`
    ///     must be smaller than the related components of `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `Real::MAX` and `maxs`
    /// components set to `-Real::MAX`.
    ///
    /// This is often used as the initial values of some AABB merging algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new AABB from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB enclosing a set of points.
    ///
    /// Returns an invalid AABB (see [`Aabb::new_invalid`]) if `pts` is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// Is this AABB valid, i.e., are its `mins` smaller or equal to its `maxs`?
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..DIM).all(|i| self.mins[i] <= self.maxs[i])
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The volume of this AABB.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Enlarges this AABB so it also contains `other`.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    /// Returns the smallest AABB containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// Returns a copy of this AABB enlarged by `amount` along every direction.
    #[inline]
    pub fn loosened(&self, amount: Real) -> Aabb {
        Aabb {
            mins: self.mins - Vector::repeat(amount),
            maxs: self.maxs + Vector::repeat(amount),
        }
    }

    /// Computes the AABB bounding `self` transformed by `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        let center = m * self.center();
        let abs_rot = m.rotation.to_rotation_matrix().into_inner().abs();
        let ws_half_extents = abs_rot * self.half_extents();

        Aabb::new(center - ws_half_extents, center + ws_half_extents)
    }

    /// Computes the AABB bounding `self` with each of its axis scaled by `scale`.
    ///
    /// Negative scales are supported (the result remains valid).
    #[inline]
    pub fn scaled(self, scale: &Vector<Real>) -> Self {
        let a = self.mins.coords.component_mul(scale);
        let b = self.maxs.coords.component_mul(scale);
        Self {
            mins: a.inf(&b).into(),
            maxs: a.sup(&b).into(),
        }
    }

    /// Returns a copy of this AABB translated by `translation`.
    #[inline]
    pub fn translated(mut self, translation: &Vector<Real>) -> Self {
        self.mins += translation;
        self.maxs += translation;
        self
    }

    /// Does this AABB intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..DIM).all(|i| self.mins[i] <= other.maxs[i] && self.maxs[i] >= other.mins[i])
    }

    /// Computes the intersection of this AABB and another one.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let result = Aabb {
            mins: Point::from(self.mins.coords.sup(&other.mins.coords)),
            maxs: Point::from(self.maxs.coords.inf(&other.maxs.coords)),
        };

        if result.is_valid() {
            Some(result)
        } else {
            None
        }
    }

    /// Does this AABB contain the given point?
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Projects a point on this AABB, clamping it to its boundary if it lies outside.
    #[inline]
    pub fn clamp_point(&self, point: &Point<Real>) -> Point<Real> {
        point.coords.sup(&self.mins.coords).inf(&self.maxs.coords).into()
    }

    /// Computes the vertices of this AABB.
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 8] {
        [
            Point::new(self.mins.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.maxs.y, self.maxs.z),
            Point::new(self.mins.x, self.maxs.y, self.maxs.z),
        ]
    }

    /// Locates this AABB relative to `plane`.
    ///
    /// The AABB is projected on the plane normal: if its projected interval is
    /// entirely above `epsilon` (resp. below `-epsilon`) the whole box lies on the
    /// positive (resp. negative) side of the plane.
    pub fn plane_side(&self, plane: &Plane, epsilon: Real) -> PlaneSide {
        let center_dist = plane.signed_distance(&self.center());
        let radius = self.half_extents().dot(&plane.normal.abs());

        if center_dist - radius > epsilon {
            PlaneSide::Positive
        } else if center_dist + radius < -epsilon {
            PlaneSide::Negative
        } else {
            PlaneSide::Crossing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Isometry, Vector};

    #[test]
    fn rotated_aabb_encloses_rotated_vertices() {
        let aabb = Aabb::new(Point::new(-1.0, -2.0, -0.5), Point::new(1.0, 2.0, 0.5));
        let pos = Isometry::new(Vector::new(3.0, 0.0, 1.0), Vector::new(0.3, 1.1, -0.4));
        let transformed = aabb.transform_by(&pos).loosened(1.0e-4);

        for pt in aabb.vertices() {
            assert!(transformed.contains_local_point(&(pos * pt)));
        }
    }

    #[test]
    fn plane_side_of_unit_box() {
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let up = Vector::y_axis();
        assert_eq!(
            aabb.plane_side(&Plane::new(up, 0.0), 1.0e-4),
            PlaneSide::Crossing
        );
        assert_eq!(
            aabb.plane_side(&Plane::new(up, -2.0), 1.0e-4),
            PlaneSide::Positive
        );
        assert_eq!(
            aabb.plane_side(&Plane::new(up, 2.0), 1.0e-4),
            PlaneSide::Negative
        );
    }

    #[test]
    fn negative_scale_keeps_aabb_valid() {
        let aabb = Aabb::new(Point::new(0.0, 1.0, 2.0), Point::new(1.0, 2.0, 3.0));
        let scaled = aabb.scaled(&Vector::new(-1.0, 2.0, 1.0));
        assert!(scaled.is_valid());
        assert_eq!(scaled.mins, Point::new(-1.0, 2.0, 2.0));
        assert_eq!(scaled.maxs, Point::new(0.0, 4.0, 3.0));
    }
}
