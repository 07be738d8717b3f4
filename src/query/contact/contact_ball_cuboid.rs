use crate::math::{Real, Vector, DIM};
use crate::query::Hit;
use crate::shape::{Ball, Cuboid};
use na::Unit;

/// Contact between a ball and an oriented box.
///
/// The normal points from the box toward the ball.
pub fn contact_ball_cuboid(ball: &Ball, cuboid: &Cuboid) -> Option<Hit> {
    let local = cuboid.to_local(&ball.center);
    let he = cuboid.half_extents;
    let mut clamped = local;
    for i in 0..DIM {
        clamped[i] = na::clamp(local[i], -he[i], he[i]);
    }

    let pos = cuboid.position();
    let diff = local - clamped;
    let sq_dist = diff.norm_squared();

    if sq_dist > crate::math::DEFAULT_EPSILON * crate::math::DEFAULT_EPSILON {
        // The center is outside of the box.
        if sq_dist >= ball.radius * ball.radius {
            return None;
        }

        let dist = sq_dist.sqrt();
        let local_normal = diff / dist;
        let normal = Unit::new_unchecked(cuboid.rotation * local_normal);
        return Some(Hit::new(normal, ball.radius - dist, pos * clamped));
    }

    // The center is inside of the box: push out through the closest face.
    let mut best_axis = 0;
    let mut best_dist = Real::MAX;
    for i in 0..DIM {
        let face_dist = he[i] - local[i].abs();
        if face_dist < best_dist {
            best_dist = face_dist;
            best_axis = i;
        }
    }

    let sign = if local[best_axis] < 0.0 { -1.0 } else { 1.0 };
    let mut local_normal = Vector::zeros();
    local_normal[best_axis] = sign;
    let mut face_point = local;
    face_point[best_axis] = sign * he[best_axis];

    let normal = Unit::new_unchecked(cuboid.rotation * local_normal);
    Some(Hit::new(normal, ball.radius + best_dist, pos * face_point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Rotation};

    #[test]
    fn ball_touching_box_face() {
        let cuboid = Cuboid::new(Point::origin(), Vector::repeat(1.0), Rotation::identity());
        let ball = Ball::new(Point::new(0.0, 1.4, 0.0), 0.5);
        let hit = contact_ball_cuboid(&ball, &cuboid).unwrap();
        assert_relative_eq!(*hit.normal, Vector::y(), epsilon = 1.0e-6);
        assert_relative_eq!(hit.depth, 0.1, epsilon = 1.0e-5);
        assert_relative_eq!(hit.point, Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn ball_center_inside_box() {
        let cuboid = Cuboid::new(Point::origin(), Vector::new(2.0, 1.0, 2.0), Rotation::identity());
        let ball = Ball::new(Point::new(0.0, -0.8, 0.0), 0.5);
        let hit = contact_ball_cuboid(&ball, &cuboid).unwrap();
        assert_relative_eq!(*hit.normal, -Vector::y(), epsilon = 1.0e-6);
        assert_relative_eq!(hit.depth, 0.7, epsilon = 1.0e-5);
    }

    #[test]
    fn ball_far_from_box() {
        let cuboid = Cuboid::new(Point::origin(), Vector::repeat(1.0), Rotation::identity());
        let ball = Ball::new(Point::new(3.0, 3.0, 0.0), 0.5);
        assert!(contact_ball_cuboid(&ball, &cuboid).is_none());
    }
}
