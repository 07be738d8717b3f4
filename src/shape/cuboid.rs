//! Oriented box shape.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Rotation, Vector, DIM};

/// An oriented box (OBB) defined by its center, half-extents and orientation.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Cuboid {
    /// The center of the box.
    pub center: Point<Real>,
    /// The half-extents of the box along its local axes.
    pub half_extents: Vector<Real>,
    /// The orientation of the box.
    pub rotation: Rotation<Real>,
}

impl Cuboid {
    /// Creates a new oriented box.
    #[inline]
    pub fn new(center: Point<Real>, half_extents: Vector<Real>, rotation: Rotation<Real>) -> Self {
        Cuboid {
            center,
            half_extents,
            rotation,
        }
    }

    /// Creates an oriented box covering exactly the given AABB.
    #[inline]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.half_extents(), Rotation::identity())
    }

    /// The rigid transformation from the local-space of this box to world-space.
    #[inline]
    pub fn position(&self) -> Isometry<Real> {
        Isometry::from_parts(self.center.coords.into(), self.rotation)
    }

    /// Applies the isometry `m` to this box.
    #[inline]
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        Self::new(m * self.center, self.half_extents, m.rotation * self.rotation)
    }

    /// The three world-space unit axes of this box.
    #[inline]
    pub fn axes(&self) -> [Vector<Real>; 3] {
        let rot = self.rotation.to_rotation_matrix();
        let m = rot.matrix();
        [
            m.column(0).into_owned(),
            m.column(1).into_owned(),
            m.column(2).into_owned(),
        ]
    }

    /// The volume of this box.
    pub fn volume(&self) -> Real {
        self.half_extents.x * self.half_extents.y * self.half_extents.z * 8.0
    }

    /// The world-space vertices of this box.
    pub fn vertices(&self) -> [Point<Real>; 8] {
        let local = Aabb::from_half_extents(Point::origin(), self.half_extents);
        let pos = self.position();
        local.vertices().map(|pt| pos * pt)
    }

    /// The AABB of this box.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_half_extents(Point::origin(), self.half_extents).transform_by(&self.position())
    }

    /// The half-length of the projection of this box on the unit axis `dir`.
    #[inline]
    pub fn projected_radius(&self, dir: &Vector<Real>) -> Real {
        let axes = self.axes();
        (0..DIM)
            .map(|i| self.half_extents[i] * axes[i].dot(dir).abs())
            .sum()
    }

    /// The vertex of this box furthest along the direction `dir`.
    pub fn support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = self.rotation.inverse_transform_vector(dir);
        let mut local = self.half_extents;
        for i in 0..DIM {
            if local_dir[i] < 0.0 {
                local[i] = -local[i];
            }
        }
        self.position() * Point::from(local)
    }

    /// Expresses a world-space point in the local-space of this box.
    #[inline]
    pub fn to_local(&self, pt: &Point<Real>) -> Point<Real> {
        self.rotation.inverse_transform_point(&Point::from(pt - self.center))
    }

    /// Tests if the given point is inside of this box, with a tolerance of `margin`.
    pub fn contains_point(&self, pt: &Point<Real>, margin: Real) -> bool {
        let local = self.to_local(pt);
        (0..DIM).all(|i| local[i].abs() <= self.half_extents[i] + margin)
    }
}
