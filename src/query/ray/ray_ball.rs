use crate::math::{Point, Real};
use crate::query::{Ray, RayCast};
use crate::shape::Ball;

impl RayCast for Ball {
    #[inline]
    fn line_interval(&self, ray: &Ray) -> Option<(Real, Real)> {
        line_interval_with_ball(&self.center, self.radius, ray)
    }
}

/// Computes the parameters where the line supporting `ray` enters and leaves a ball.
#[inline]
pub fn line_interval_with_ball(
    center: &Point<Real>,
    radius: Real,
    ray: &Ray,
) -> Option<(Real, Real)> {
    let dcenter = ray.origin - *center;

    let a = ray.dir.norm_squared();
    let b = dcenter.dot(&ray.dir);
    let c = dcenter.norm_squared() - radius * radius;

    // Special case for when the dir is zero.
    if a <= crate::math::DEFAULT_EPSILON {
        return if c > 0.0 {
            None
        } else {
            Some((-Real::MAX, Real::MAX))
        };
    }

    let delta = b * b - a * c;
    if delta < 0.0 {
        // no solution
        None
    } else {
        let sqrt_delta = delta.sqrt();
        Some(((-b - sqrt_delta) / a, (-b + sqrt_delta) / a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector;

    #[test]
    fn ray_toward_ball() {
        let ball = Ball::new(Point::new(5.0, 0.0, 0.0), 1.0);
        let ray = Ray::new(Point::origin(), Vector::x());
        assert_relative_eq!(ball.cast_ray(&ray, Real::MAX, true).unwrap(), 4.0);
        assert!(ball.cast_ray(&ray, 3.0, true).is_none());

        let away = Ray::new(Point::origin(), -Vector::x());
        assert!(ball.cast_ray(&away, Real::MAX, true).is_none());
    }

    #[test]
    fn ray_from_inside_ball() {
        let ball = Ball::new(Point::origin(), 2.0);
        let ray = Ray::new(Point::origin(), Vector::y());
        assert_eq!(ball.cast_ray(&ray, Real::MAX, true), Some(0.0));
        assert_relative_eq!(ball.cast_ray(&ray, Real::MAX, false).unwrap(), 2.0);
    }
}
