use crate::query::contact::*;
use crate::query::{Hit, Unsupported};
use crate::shape::{Collider, Cuboid};

/// Computes the contact between two world-space colliders.
///
/// Dispatches on the pair of shape types. The normal of the returned hit points
/// from `b` toward `a`. Returns `Ok(None)` if the colliders do not overlap and
/// `Err(Unsupported)` for pairs without a narrow-phase routine (two triangles).
pub fn try_detect(a: &Collider, b: &Collider) -> Result<Option<Hit>, Unsupported> {
    use Collider::*;

    let hit = match (a, b) {
        (Sphere(s1), Sphere(s2)) => contact_ball_ball(s1, s2),
        (Sphere(s), Obb(c)) => contact_ball_cuboid(s, c),
        (Sphere(s), Aabb(aabb)) => contact_ball_cuboid(s, &Cuboid::from_aabb(aabb)),
        (Sphere(s), Capsule(c)) => contact_capsule_ball(c, s).map(Hit::flipped),
        (Sphere(s), Triangle(t)) => contact_ball_triangle(s, t),

        (Obb(c), Sphere(s)) => contact_ball_cuboid(s, c).map(Hit::flipped),
        (Obb(c1), Obb(c2)) => contact_cuboid_cuboid(c1, c2),
        (Obb(c), Aabb(aabb)) => contact_cuboid_cuboid(c, &Cuboid::from_aabb(aabb)),
        (Obb(c), Capsule(cap)) => contact_capsule_cuboid(cap, c).map(Hit::flipped),
        (Obb(c), Triangle(t)) => contact_cuboid_triangle(c, t),

        (Aabb(aabb), Sphere(s)) => contact_ball_cuboid(s, &Cuboid::from_aabb(aabb)).map(Hit::flipped),
        (Aabb(aabb), Obb(c)) => contact_cuboid_cuboid(&Cuboid::from_aabb(aabb), c),
        (Aabb(aabb1), Aabb(aabb2)) => contact_aabb_aabb(aabb1, aabb2),
        (Aabb(aabb), Capsule(cap)) => {
            contact_capsule_cuboid(cap, &Cuboid::from_aabb(aabb)).map(Hit::flipped)
        }
        (Aabb(aabb), Triangle(t)) => contact_cuboid_triangle(&Cuboid::from_aabb(aabb), t),

        (Capsule(cap), Sphere(s)) => contact_capsule_ball(cap, s),
        (Capsule(cap), Obb(c)) => contact_capsule_cuboid(cap, c),
        (Capsule(cap), Aabb(aabb)) => contact_capsule_cuboid(cap, &Cuboid::from_aabb(aabb)),
        (Capsule(cap1), Capsule(cap2)) => contact_capsule_capsule(cap1, cap2),
        (Capsule(cap), Triangle(t)) => contact_capsule_triangle(cap, t),

        (Triangle(_), Triangle(_)) => return Err(Unsupported),
        (Triangle(_), _) => return try_detect(b, a).map(|hit| hit.map(Hit::flipped)),
    };

    Ok(hit)
}

/// Computes the contact between two world-space colliders.
///
/// Same as [`try_detect`] except that unsupported pairs are reported as not
/// overlapping. The normal of the returned hit points from `b` toward `a`.
///
/// ```
/// use cleave3d::math::{Point, Vector};
/// use cleave3d::query::detect;
/// use cleave3d::shape::Collider;
///
/// let a = Collider::sphere(Point::new(0.0, 1.5, 0.0), 1.0);
/// let b = Collider::aabb(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
/// let hit = detect(&a, &b).unwrap();
/// assert!((*hit.normal - Vector::y()).norm() < 1.0e-5);
/// assert!((hit.depth - 0.5).abs() < 1.0e-5);
/// ```
#[inline]
pub fn detect(a: &Collider, b: &Collider) -> Option<Hit> {
    match try_detect(a, b) {
        Ok(hit) => hit,
        Err(Unsupported) => {
            log::trace!(
                "unsupported contact pair {:?}/{:?}",
                a.shape_type(),
                b.shape_type()
            );
            None
        }
    }
}
