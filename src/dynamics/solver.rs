//! Impulse-based resolution of the contacts between rigid bodies.

use crate::dynamics::consts::{CORRECTION_PERCENT, CORRECTION_SLOP, MAX_IMPULSE};
use crate::dynamics::{RigidBody, StaticMaterial};
use crate::math::{Matrix, Point, Real, Vector};
use crate::query::{self, Hit};
use crate::shape::Collider;

/// The impulses applied while resolving one contact.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContactImpulse {
    /// The magnitude of the impulse along the contact normal.
    pub normal: Real,
    /// The friction impulse, tangent to the contact.
    pub friction: Vector<Real>,
    /// The distance the bodies were pushed apart.
    pub correction: Real,
}

struct ContactPoint {
    inv_mass: Real,
    inv_inertia: Matrix<Real>,
    arm: Vector<Real>,
    velocity: Vector<Real>,
    restitution: Real,
    friction: Real,
}

impl ContactPoint {
    fn from_body(body: &RigidBody, point: &Point<Real>) -> Self {
        ContactPoint {
            inv_mass: body.inv_mass(),
            inv_inertia: *body.world_inv_inertia(),
            arm: point - body.center_of_mass(),
            velocity: body.velocity_at_point(point),
            restitution: body.params().restitution,
            friction: body.params().friction,
        }
    }

    fn from_static(material: &StaticMaterial) -> Self {
        ContactPoint {
            inv_mass: 0.0,
            inv_inertia: Matrix::zeros(),
            arm: Vector::zeros(),
            velocity: Vector::zeros(),
            restitution: material.restitution,
            friction: material.friction,
        }
    }

    /// The inverse effective mass of this point along `dir`.
    fn inv_effective_mass(&self, dir: &Vector<Real>) -> Real {
        let rn = self.arm.cross(dir);
        self.inv_mass + dir.dot(&(self.inv_inertia * rn).cross(&self.arm))
    }
}

/// Detects and resolves the collision between two bodies.
///
/// Pairs of sleeping bodies, pairs of siblings still ignoring each other, and
/// pairs with two infinite masses are skipped. Returns the contact if one was resolved.
pub fn solve_collision(a: &mut RigidBody, b: &mut RigidBody) -> Option<Hit> {
    if (a.is_sleeping() && b.is_sleeping())
        || a.ignores_collision_with(b)
        || (a.is_static_like() && b.is_static_like())
    {
        return None;
    }

    if !a
        .world_collider()
        .compute_aabb()
        .intersects(&b.world_collider().compute_aabb())
    {
        return None;
    }

    let hit = query::detect(a.world_collider(), b.world_collider())?;
    let _ = resolve_contact(a, Some(b), &hit, &StaticMaterial::default());
    Some(hit)
}

/// Detects and resolves the collision between a body and an immovable collider.
pub fn solve_static_collision(
    body: &mut RigidBody,
    collider: &Collider,
    material: &StaticMaterial,
) -> Option<Hit> {
    if body.is_sleeping() || body.is_static_like() {
        return None;
    }

    let hit = query::detect(body.world_collider(), collider)?;
    let _ = resolve_contact(body, None, &hit, material);
    Some(hit)
}

/// Resolves a contact between `a` and `b` (or an immovable object described by
/// `static_material` if `b` is `None`).
///
/// `hit.normal` must point from `b` toward `a`. Nothing happens if the bodies
/// are already separating. Otherwise a normal impulse (clamped to
/// [`MAX_IMPULSE`]) and a Coulomb friction impulse are applied with opposite
/// signs to both bodies, then the bodies are pushed apart proportionally to
/// their inverse masses. Sleeping bodies involved in a contact are woken up.
pub fn resolve_contact(
    a: &mut RigidBody,
    mut b: Option<&mut RigidBody>,
    hit: &Hit,
    static_material: &StaticMaterial,
) -> ContactImpulse {
    let normal = hit.normal.into_inner();
    let pa = ContactPoint::from_body(a, &hit.point);
    let pb = match &b {
        Some(b) => ContactPoint::from_body(b, &hit.point),
        None => ContactPoint::from_static(static_material),
    };

    let rel_vel = pa.velocity - pb.velocity;
    let normal_vel = rel_vel.dot(&normal);
    if normal_vel > 0.0 {
        return ContactImpulse::default();
    }

    let inv_k = pa.inv_effective_mass(&normal) + pb.inv_effective_mass(&normal);
    if inv_k <= crate::math::DEFAULT_EPSILON {
        return ContactImpulse::default();
    }

    let restitution = (pa.restitution + pb.restitution) / 2.0;
    let friction = (pa.friction.max(0.0) * pb.friction.max(0.0)).sqrt();

    let j = (-(1.0 + restitution) * normal_vel / inv_k).min(MAX_IMPULSE);
    apply_pair_impulse(a, b.as_deref_mut(), normal * j, &hit.point);

    // Friction, from the velocities updated by the normal impulse.
    let mut friction_impulse = Vector::zeros();
    let rel_vel = a.velocity_at_point(&hit.point)
        - b.as_deref()
            .map(|b| b.velocity_at_point(&hit.point))
            .unwrap_or_else(Vector::zeros);
    let tangent_vel = rel_vel - normal * rel_vel.dot(&normal);

    if let Some(tangent) = tangent_vel.try_normalize(crate::math::DEFAULT_EPSILON) {
        let inv_kt = pa.inv_effective_mass(&tangent) + pb.inv_effective_mass(&tangent);
        if inv_kt > crate::math::DEFAULT_EPSILON {
            let max_friction = friction * j;
            let jt = (-rel_vel.dot(&tangent) / inv_kt).clamp(-max_friction, max_friction);
            friction_impulse = tangent * jt;
            apply_pair_impulse(a, b.as_deref_mut(), friction_impulse, &hit.point);
        }
    }

    // Positional correction.
    let inv_mass_sum = pa.inv_mass + pb.inv_mass;
    let mut correction = 0.0;
    if inv_mass_sum > 0.0 {
        let push = (hit.depth - CORRECTION_SLOP).max(0.0) * CORRECTION_PERCENT / inv_mass_sum;
        if push > 0.0 {
            a.translate(&(normal * (push * pa.inv_mass)));
            if let Some(b) = b.as_deref_mut() {
                b.translate(&(-normal * (push * pb.inv_mass)));
            }
            correction = push * inv_mass_sum;
        }
    }

    ContactImpulse {
        normal: j,
        friction: friction_impulse,
        correction,
    }
}

fn apply_pair_impulse(
    a: &mut RigidBody,
    b: Option<&mut RigidBody>,
    impulse: Vector<Real>,
    point: &Point<Real>,
) {
    a.apply_impulse_at_point(impulse, point);
    if let Some(b) = b {
        b.apply_impulse_at_point(-impulse, point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::RigidBodyParams;
    use crate::math::Isometry;

    fn ball(x: Real, mass: Real, vx: Real) -> RigidBody {
        let mut body = RigidBody::new(
            Isometry::translation(x, 0.0, 0.0),
            Collider::sphere(Point::origin(), 0.5),
            RigidBodyParams {
                mass,
                use_gravity: false,
                friction: 0.0,
                ..Default::default()
            },
        );
        body.set_linvel(Vector::new(vx, 0.0, 0.0));
        body
    }

    #[test]
    fn head_on_impulses_are_symmetric() {
        let mut a = ball(-0.45, 2.0, 3.0);
        let mut b = ball(0.45, 1.0, -1.0);
        let momentum = a.linvel() * a.mass() + b.linvel() * b.mass();

        let hit = solve_collision(&mut a, &mut b).unwrap();
        // The normal points from b toward a.
        assert!(hit.normal.x < 0.0);

        let after = a.linvel() * a.mass() + b.linvel() * b.mass();
        assert_relative_eq!(after, momentum, epsilon = 1.0e-4);
        let separating = (a.linvel() - b.linvel()).dot(&hit.normal);
        assert!(separating >= -1.0e-5);
        // The bodies were pushed apart.
        assert!(b.position().translation.x - a.position().translation.x > 0.9);
    }

    #[test]
    fn separating_bodies_are_left_alone() {
        let mut a = ball(-0.45, 1.0, -1.0);
        let mut b = ball(0.45, 1.0, 1.0);
        let hit = query::detect(a.world_collider(), b.world_collider()).unwrap();
        let impulse = resolve_contact(&mut a, Some(&mut b), &hit, &StaticMaterial::default());
        assert_eq!(impulse, ContactImpulse::default());
        assert_relative_eq!(a.linvel().x, -1.0);
    }

    #[test]
    fn impulses_are_clamped() {
        let mut a = ball(-0.45, 100.0, 50.0);
        let mut b = ball(0.45, 100.0, -50.0);
        let hit = query::detect(a.world_collider(), b.world_collider()).unwrap();
        let impulse = resolve_contact(&mut a, Some(&mut b), &hit, &StaticMaterial::default());
        assert_relative_eq!(impulse.normal, MAX_IMPULSE);
    }

    #[test]
    fn sleeping_pairs_are_skipped_but_one_sleeper_wakes_up() {
        let mut a = ball(-0.45, 1.0, 0.0);
        let mut b = ball(0.45, 1.0, 0.0);
        a.sleep();
        b.sleep();
        assert!(solve_collision(&mut a, &mut b).is_none());

        let mut c = ball(-0.45, 1.0, 2.0);
        assert!(solve_collision(&mut c, &mut b).is_some());
        assert!(!b.is_sleeping());
        assert!(b.linvel().x > 0.0);
    }

    #[test]
    fn friction_slows_sliding() {
        let floor = Collider::aabb(Point::new(-10.0, -1.0, -10.0), Point::new(10.0, 0.0, 10.0));
        let mut body = RigidBody::new(
            Isometry::translation(0.0, 0.45, 0.0),
            Collider::sphere(Point::origin(), 0.5),
            RigidBodyParams {
                friction: 1.0,
                ..Default::default()
            },
        );
        body.set_linvel(Vector::new(2.0, -1.0, 0.0));
        let material = StaticMaterial {
            restitution: 0.0,
            friction: 1.0,
        };

        let hit = solve_static_collision(&mut body, &floor, &material).unwrap();
        assert!(hit.normal.y > 0.99);
        assert!(body.linvel().y >= -1.0e-5);
        assert!(body.linvel().x < 2.0);
        assert!(body.position().translation.y > 0.45);
    }
}
