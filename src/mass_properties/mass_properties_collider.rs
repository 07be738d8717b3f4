use crate::mass_properties::MassProperties;
use crate::math::{Real, Rotation};
use crate::shape::Collider;

impl MassProperties {
    /// Computes the mass properties of a collider with uniform density.
    ///
    /// Triangles have no volume: the box bounding them is used instead.
    pub fn from_collider(density: Real, collider: &Collider) -> Self {
        match collider {
            Collider::Sphere(s) => Self::from_ball(density, s.center, s.radius),
            Collider::Obb(c) => {
                Self::from_oriented_cuboid(density, c.center, c.half_extents, c.rotation)
            }
            Collider::Aabb(a) => Self::from_oriented_cuboid(
                density,
                a.center(),
                a.half_extents(),
                Rotation::identity(),
            ),
            Collider::Capsule(c) => Self::from_capsule(density, c),
            Collider::Triangle(t) => {
                let aabb = t.aabb();
                Self::from_oriented_cuboid(
                    density,
                    aabb.center(),
                    aabb.half_extents(),
                    Rotation::identity(),
                )
            }
        }
    }

    /// Computes the mass properties of a collider with the given total mass.
    ///
    /// Shapes with a zero volume get a unit inertia scaled by `mass`.
    pub fn from_collider_with_mass(mass: Real, collider: &Collider) -> Self {
        let unit = Self::from_collider(1.0, collider);
        if unit.inv_mass == 0.0 {
            Self::new(
                unit.local_com,
                mass,
                crate::math::AngVector::repeat(mass),
            )
        } else {
            unit.with_mass(mass)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Vector};

    #[test]
    fn ball_inertia() {
        let collider = Collider::sphere(Point::origin(), 1.0);
        let props = MassProperties::from_collider_with_mass(5.0, &collider);
        assert_relative_eq!(props.mass(), 5.0, epsilon = 1.0e-4);
        assert_relative_eq!(props.principal_inertia(), Vector::repeat(2.0), epsilon = 1.0e-4);
    }

    #[test]
    fn flat_triangle_still_has_a_finite_inertia() {
        let collider = Collider::triangle(
            Point::origin(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        );
        let props = MassProperties::from_collider_with_mass(2.0, &collider);
        assert_relative_eq!(props.mass(), 2.0, epsilon = 1.0e-4);
        assert!(props.inv_principal_inertia.iter().all(|e| e.is_finite()));
    }
}
