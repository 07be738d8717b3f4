//! Capsule contacts.
//!
//! Every routine reduces the capsule to the ball centered at the point of its
//! inner segment closest to the other shape, then runs the matching ball test.

use crate::math::{Real, Vector};
use crate::query::closest_points::{
    closest_point_on_segment, closest_points_segment_cuboid, closest_points_segment_segment,
    closest_points_segment_triangle,
};
use crate::query::contact::{contact_ball_ball, contact_ball_cuboid};
use crate::query::Hit;
use crate::shape::{Ball, Capsule, Cuboid, Triangle};
use na::Unit;

/// Contact between a capsule and a ball.
pub fn contact_capsule_ball(capsule: &Capsule, ball: &Ball) -> Option<Hit> {
    let (center, _) = closest_point_on_segment(&capsule.segment, &ball.center);
    contact_ball_ball(&Ball::new(center, capsule.radius), ball)
}

/// Contact between two capsules.
pub fn contact_capsule_capsule(capsule1: &Capsule, capsule2: &Capsule) -> Option<Hit> {
    let (p1, p2) = closest_points_segment_segment(&capsule1.segment, &capsule2.segment);
    contact_ball_ball(
        &Ball::new(p1, capsule1.radius),
        &Ball::new(p2, capsule2.radius),
    )
}

/// Contact between a capsule and an oriented box.
pub fn contact_capsule_cuboid(capsule: &Capsule, cuboid: &Cuboid) -> Option<Hit> {
    let (center, _) = closest_points_segment_cuboid(&capsule.segment, cuboid);
    contact_ball_cuboid(&Ball::new(center, capsule.radius), cuboid)
}

/// Contact between a capsule and a triangle.
///
/// If the inner segment of the capsule pierces the triangle, the triangle
/// normal (oriented toward the capsule center) is used and the depth accounts
/// for the segment endpoint lying the furthest behind the triangle.
pub fn contact_capsule_triangle(capsule: &Capsule, triangle: &Triangle) -> Option<Hit> {
    let (on_seg, on_tri) = closest_points_segment_triangle(&capsule.segment, triangle);
    let delta = on_seg - on_tri;
    let sq_dist = delta.norm_squared();
    let eps = crate::math::DEFAULT_EPSILON;

    if sq_dist > eps * eps {
        if sq_dist >= capsule.radius * capsule.radius {
            return None;
        }

        let dist = sq_dist.sqrt();
        let normal = Unit::new_unchecked(delta / dist);
        return Some(Hit::new(normal, capsule.radius - dist, on_tri));
    }

    // The segment touches or pierces the triangle.
    let mut normal = triangle.normal().unwrap_or(Vector::y_axis());
    if normal.dot(&(capsule.center() - triangle.a)) < 0.0 {
        normal = -normal;
    }

    let behind = [capsule.segment.a, capsule.segment.b]
        .iter()
        .map(|pt| -normal.dot(&(pt - triangle.a)))
        .fold(0.0 as Real, Real::max);

    Some(Hit::new(normal, capsule.radius + behind, on_tri))
}
