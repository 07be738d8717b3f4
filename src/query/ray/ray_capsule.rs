use crate::math::Real;
use crate::query::ray::ray_ball::line_interval_with_ball;
use crate::query::{Ray, RayCast};
use crate::shape::Capsule;

impl RayCast for Capsule {
    fn line_interval(&self, ray: &Ray) -> Option<(Real, Real)> {
        // A capsule is the convex union of two balls and a cylinder, so the line
        // interval is the hull of the intervals of its parts.
        let mut result: Option<(Real, Real)> = None;
        let mut merge = |interval: Option<(Real, Real)>| {
            if let Some((t0, t1)) = interval {
                result = Some(match result {
                    Some((r0, r1)) => (r0.min(t0), r1.max(t1)),
                    None => (t0, t1),
                });
            }
        };

        merge(line_interval_with_ball(&self.segment.a, self.radius, ray));
        merge(line_interval_with_ball(&self.segment.b, self.radius, ray));
        merge(line_interval_with_cylinder(self, ray));

        result
    }
}

/// The line interval inside of the cylindrical part of the capsule.
fn line_interval_with_cylinder(capsule: &Capsule, ray: &Ray) -> Option<(Real, Real)> {
    let axis = capsule.segment.direction()?;
    let height = capsule.height();
    let m = ray.origin - capsule.segment.a;

    let dir_axial = ray.dir.dot(&axis);
    let m_axial = m.dot(&axis);
    let dir_perp = ray.dir - *axis * dir_axial;
    let m_perp = m - *axis * m_axial;

    // Radial constraint.
    let a = dir_perp.norm_squared();
    let b = m_perp.dot(&dir_perp);
    let c = m_perp.norm_squared() - capsule.radius * capsule.radius;

    let (mut t0, mut t1) = if a <= crate::math::DEFAULT_EPSILON {
        if c > 0.0 {
            return None;
        }
        (-Real::MAX, Real::MAX)
    } else {
        let delta = b * b - a * c;
        if delta < 0.0 {
            return None;
        }
        let sqrt_delta = delta.sqrt();
        ((-b - sqrt_delta) / a, (-b + sqrt_delta) / a)
    };

    // Axial constraint: 0 <= m_axial + t * dir_axial <= height.
    if dir_axial.abs() <= crate::math::DEFAULT_EPSILON {
        if m_axial < 0.0 || m_axial > height {
            return None;
        }
    } else {
        let mut s0 = -m_axial / dir_axial;
        let mut s1 = (height - m_axial) / dir_axial;
        if s0 > s1 {
            core::mem::swap(&mut s0, &mut s1);
        }
        t0 = t0.max(s0);
        t1 = t1.min(s1);
    }

    if t0 > t1 {
        None
    } else {
        Some((t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Vector};

    #[test]
    fn ray_hits_capsule_side_and_cap() {
        let capsule = Capsule::new(Point::new(0.0, -1.0, 0.0), Point::new(0.0, 1.0, 0.0), 0.5);

        let side = Ray::new(Point::new(-5.0, 0.5, 0.0), Vector::x());
        assert_relative_eq!(capsule.cast_ray(&side, Real::MAX, true).unwrap(), 4.5, epsilon = 1.0e-5);

        let cap = Ray::new(Point::new(0.0, 5.0, 0.0), -Vector::y());
        assert_relative_eq!(capsule.cast_ray(&cap, Real::MAX, true).unwrap(), 3.5, epsilon = 1.0e-5);

        let miss = Ray::new(Point::new(-5.0, 2.0, 0.0), Vector::x());
        assert!(capsule.cast_ray(&miss, Real::MAX, true).is_none());
    }

    #[test]
    fn degenerate_capsule_behaves_like_a_ball() {
        let capsule = Capsule::new(Point::origin(), Point::origin(), 1.0);
        let ray = Ray::new(Point::new(-3.0, 0.0, 0.0), Vector::x());
        assert_relative_eq!(capsule.cast_ray(&ray, Real::MAX, true).unwrap(), 2.0, epsilon = 1.0e-5);
    }
}
