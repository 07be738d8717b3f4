use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::query::{Ray, RayCast};
use crate::shape::Cuboid;

impl RayCast for Cuboid {
    #[inline]
    fn line_interval(&self, ray: &Ray) -> Option<(Real, Real)> {
        // The parameters are preserved by rigid transformations.
        let local_ray = ray.inverse_transform_by(&self.position());
        Aabb::from_half_extents(Point::origin(), self.half_extents).line_interval(&local_ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Rotation, Vector};

    #[test]
    fn ray_against_rotated_box() {
        let rot = Rotation::from_axis_angle(&Vector::y_axis(), core::f32::consts::FRAC_PI_4);
        let cuboid = Cuboid::new(Point::new(5.0, 0.0, 0.0), Vector::repeat(1.0), rot);
        let ray = Ray::new(Point::origin(), Vector::x());
        let toi = cuboid.cast_ray(&ray, Real::MAX, true).unwrap();
        assert_relative_eq!(toi, 5.0 - 2.0f32.sqrt(), epsilon = 1.0e-5);
    }
}
