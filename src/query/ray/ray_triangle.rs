use crate::math::Real;
use crate::query::{Ray, RayCast};
use crate::shape::Triangle;

impl RayCast for Triangle {
    /// The interval is reduced to the single parameter where the line crosses the triangle.
    fn line_interval(&self, ray: &Ray) -> Option<(Real, Real)> {
        // Möller–Trumbore.
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        let p = ray.dir.cross(&ac);
        let det = ab.dot(&p);

        if det.abs() <= crate::math::DEFAULT_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let ao = ray.origin - self.a;
        let u = ao.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = ao.cross(&ab);
        let v = ray.dir.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = ac.dot(&q) * inv_det;
        Some((t, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Vector};

    #[test]
    fn ray_through_triangle() {
        let tri = Triangle::new(
            Point::new(-1.0, 0.0, -1.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, -1.0),
        );
        let ray = Ray::new(Point::new(0.0, 3.0, 0.0), -Vector::y());
        assert_relative_eq!(tri.cast_ray(&ray, Real::MAX, true).unwrap(), 3.0, epsilon = 1.0e-6);

        let miss = Ray::new(Point::new(2.0, 3.0, 0.0), -Vector::y());
        assert!(tri.cast_ray(&miss, Real::MAX, true).is_none());
    }
}
