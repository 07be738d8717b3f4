use crate::math::Vector;
use crate::query::closest_points::closest_point_on_triangle;
use crate::query::Hit;
use crate::shape::{Ball, Triangle};
use na::Unit;

/// Contact between a ball and a triangle.
///
/// The normal points from the triangle toward the ball center. When the center
/// lies exactly on the triangle, the triangle normal is used.
pub fn contact_ball_triangle(ball: &Ball, triangle: &Triangle) -> Option<Hit> {
    let closest = closest_point_on_triangle(triangle, &ball.center);
    let delta = ball.center - closest;
    let sq_dist = delta.norm_squared();

    if sq_dist >= ball.radius * ball.radius {
        return None;
    }

    let dist = sq_dist.sqrt();
    let normal = if dist > crate::math::DEFAULT_EPSILON {
        Unit::new_unchecked(delta / dist)
    } else {
        triangle.normal().unwrap_or(Vector::y_axis())
    };

    Some(Hit::new(normal, ball.radius - dist, closest))
}
