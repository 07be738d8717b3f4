use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Rotation, Vector};
use crate::shape::Segment;
use na::RealField;

/// A segment inflated by a radius.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Capsule {
    /// The axis of the capsule.
    pub segment: Segment,
    /// The radius of the capsule.
    pub radius: Real,
}

impl Capsule {
    /// Creates a new capsule defined as the segment between `a` and `b` and with the given `radius`.
    pub fn new(a: Point<Real>, b: Point<Real>, radius: Real) -> Self {
        let segment = Segment::new(a, b);
        Self { segment, radius }
    }

    /// The height of this capsule.
    pub fn height(&self) -> Real {
        (self.segment.b - self.segment.a).norm()
    }

    /// The half-height of this capsule.
    pub fn half_height(&self) -> Real {
        self.height() / 2.0
    }

    /// The center of this capsule.
    pub fn center(&self) -> Point<Real> {
        na::center(&self.segment.a, &self.segment.b)
    }

    /// Creates a new capsule equal to `self` with all its endpoints transformed by `pos`.
    pub fn transform_by(&self, pos: &Isometry<Real>) -> Self {
        Self::new(pos * self.segment.a, pos * self.segment.b, self.radius)
    }

    /// The rotation `r` such that `r * Y` is collinear with `b - a`.
    pub fn rotation_wrt_y(&self) -> Rotation<Real> {
        let mut dir = self.segment.b - self.segment.a;
        if dir.y < 0.0 {
            dir = -dir;
        }

        Rotation::rotation_between(&Vector::y(), &dir).unwrap_or(Rotation::identity())
    }

    /// The volume of this capsule: a cylinder plus two half-balls.
    pub fn volume(&self) -> Real {
        let r2 = self.radius * self.radius;
        Real::pi() * r2 * self.height() + Real::pi() * r2 * self.radius * 4.0 / 3.0
    }

    /// The AABB of this capsule.
    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::from_points([self.segment.a, self.segment.b]);
        aabb = aabb.loosened(self.radius);
        aabb
    }
}
