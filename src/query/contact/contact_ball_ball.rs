use crate::math::{Real, Vector};
use crate::query::Hit;
use crate::shape::Ball;
use na::Unit;

/// Contact between balls.
#[inline]
pub fn contact_ball_ball(b1: &Ball, b2: &Ball) -> Option<Hit> {
    let delta = b1.center - b2.center;
    let distance_squared = delta.norm_squared();
    let sum_radius = b1.radius + b2.radius;

    if distance_squared < sum_radius * sum_radius {
        let distance = distance_squared.sqrt();
        let normal = if distance > crate::math::DEFAULT_EPSILON {
            Unit::new_unchecked(delta / distance)
        } else {
            Vector::y_axis()
        };

        let depth = sum_radius - distance;
        // Midpoint of the two deepest points.
        let point1 = b1.center - *normal * b1.radius;
        let point2 = b2.center + *normal * b2.radius;
        Some(Hit::new(normal, depth, na::center(&point1, &point2)))
    } else {
        None
    }
}

/// Tests if two balls overlap.
#[inline]
pub fn intersection_test_ball_ball(b1: &Ball, b2: &Ball) -> bool {
    let sum_radius: Real = b1.radius + b2.radius;
    na::distance_squared(&b1.center, &b2.center) <= sum_radius * sum_radius
}
