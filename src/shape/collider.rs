use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Rotation, Vector};
use crate::shape::{Ball, Capsule, Cuboid, Triangle};

/// Enum representing the type of a collider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum ColliderType {
    /// A sphere.
    Sphere,
    /// An oriented box.
    Obb,
    /// An axis-aligned box.
    Aabb,
    /// A capsule.
    Capsule,
    /// A triangle.
    Triangle,
}

/// A collision shape along with its placement in space.
///
/// The active variant fully determines the payload: changing the shape of a
/// collider always means assigning a whole new `Collider`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Collider {
    /// A sphere.
    Sphere(Ball),
    /// An oriented box.
    Obb(Cuboid),
    /// An axis-aligned box.
    Aabb(Aabb),
    /// A capsule.
    Capsule(Capsule),
    /// A triangle.
    Triangle(Triangle),
}

impl Collider {
    /// A sphere collider.
    pub fn sphere(center: Point<Real>, radius: Real) -> Self {
        Collider::Sphere(Ball::new(center, radius))
    }

    /// An oriented box collider.
    pub fn obb(center: Point<Real>, half_extents: Vector<Real>, rotation: Rotation<Real>) -> Self {
        Collider::Obb(Cuboid::new(center, half_extents, rotation))
    }

    /// An axis-aligned box collider.
    pub fn aabb(mins: Point<Real>, maxs: Point<Real>) -> Self {
        Collider::Aabb(Aabb::new(mins, maxs))
    }

    /// A capsule collider around the segment `[a, b]`.
    pub fn capsule(a: Point<Real>, b: Point<Real>, radius: Real) -> Self {
        Collider::Capsule(Capsule::new(a, b, radius))
    }

    /// A triangle collider.
    pub fn triangle(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Self {
        Collider::Triangle(Triangle::new(a, b, c))
    }

    /// The type tag of this collider.
    pub fn shape_type(&self) -> ColliderType {
        match self {
            Collider::Sphere(_) => ColliderType::Sphere,
            Collider::Obb(_) => ColliderType::Obb,
            Collider::Aabb(_) => ColliderType::Aabb,
            Collider::Capsule(_) => ColliderType::Capsule,
            Collider::Triangle(_) => ColliderType::Triangle,
        }
    }

    /// Applies the rigid transformation `m` to this collider.
    ///
    /// An axis-aligned box stays axis-aligned: the result is the AABB bounding
    /// the transformed box.
    pub fn transformed(&self, m: &Isometry<Real>) -> Collider {
        match self {
            Collider::Sphere(s) => Collider::Sphere(s.transformed(m)),
            Collider::Obb(c) => Collider::Obb(c.transformed(m)),
            Collider::Aabb(a) => Collider::Aabb(a.transform_by(m)),
            Collider::Capsule(c) => Collider::Capsule(c.transform_by(m)),
            Collider::Triangle(t) => Collider::Triangle(t.transformed(m)),
        }
    }

    /// The AABB of this collider.
    pub fn compute_aabb(&self) -> Aabb {
        match self {
            Collider::Sphere(s) => s.aabb(),
            Collider::Obb(c) => c.aabb(),
            Collider::Aabb(a) => *a,
            Collider::Capsule(c) => c.aabb(),
            Collider::Triangle(t) => t.aabb(),
        }
    }

    /// The geometric center of this collider.
    pub fn center(&self) -> Point<Real> {
        match self {
            Collider::Sphere(s) => s.center,
            Collider::Obb(c) => c.center,
            Collider::Aabb(a) => a.center(),
            Collider::Capsule(c) => c.center(),
            Collider::Triangle(t) => t.center(),
        }
    }

    /// The volume enclosed by this collider. Triangles have a zero volume.
    pub fn volume(&self) -> Real {
        match self {
            Collider::Sphere(s) => s.volume(),
            Collider::Obb(c) => c.volume(),
            Collider::Aabb(a) => a.volume(),
            Collider::Capsule(c) => c.volume(),
            Collider::Triangle(_) => 0.0,
        }
    }

    /// Builds a collider of type `ty` approximating the box `aabb`.
    ///
    /// Spheres use the mean half-extent as radius. Capsules are aligned with the
    /// longest axis of the box. Triangles cannot approximate a volume so an
    /// oriented box is returned instead.
    pub fn fit_to_aabb(ty: ColliderType, aabb: &Aabb) -> Collider {
        let center = aabb.center();
        let he = aabb.half_extents();

        match ty {
            ColliderType::Sphere => Collider::sphere(center, (he.x + he.y + he.z) / 3.0),
            ColliderType::Aabb => Collider::Aabb(*aabb),
            ColliderType::Obb | ColliderType::Triangle => {
                Collider::obb(center, he, Rotation::identity())
            }
            ColliderType::Capsule => {
                let axis = he.imax();
                let radius = (he.sum() - he[axis]) / 2.0;
                let half_height = (he[axis] - radius).max(0.0);
                let mut dir = Vector::zeros();
                dir[axis] = half_height;
                Collider::capsule(center - dir, center + dir, radius)
            }
        }
    }

    /// Scales the dimensions of this collider component-wise, relative to the origin.
    ///
    /// Rotated shapes (spheres, oriented boxes and capsule radii) use the mean of
    /// the scale factors where a non-uniform scale cannot be represented.
    pub fn scaled(&self, scale: &Vector<Real>) -> Collider {
        let mean = (scale.x.abs() + scale.y.abs() + scale.z.abs()) / 3.0;
        let scale_pt = |pt: &Point<Real>| Point::from(pt.coords.component_mul(scale));

        match self {
            Collider::Sphere(s) => Collider::sphere(scale_pt(&s.center), s.radius * mean),
            Collider::Obb(c) => {
                let local_scale = c.rotation.inverse_transform_vector(scale).abs();
                Collider::obb(
                    scale_pt(&c.center),
                    c.half_extents.component_mul(&local_scale),
                    c.rotation,
                )
            }
            Collider::Aabb(a) => Collider::Aabb(a.scaled(scale)),
            Collider::Capsule(c) => Collider::capsule(
                scale_pt(&c.segment.a),
                scale_pt(&c.segment.b),
                c.radius * mean,
            ),
            Collider::Triangle(t) => {
                Collider::triangle(scale_pt(&t.a), scale_pt(&t.b), scale_pt(&t.c))
            }
        }
    }
}
