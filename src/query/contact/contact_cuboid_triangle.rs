use crate::math::Real;
use crate::query::closest_points::closest_point_on_triangle;
use crate::query::contact::contact_cuboid_cuboid::deepest_feature_center;
use crate::query::sat;
use crate::query::Hit;
use crate::shape::{Cuboid, Triangle};
use na::Unit;

/// Contact between an oriented box and a triangle.
///
/// The normal points from the triangle toward the box.
pub fn contact_cuboid_triangle(cuboid: &Cuboid, triangle: &Triangle) -> Option<Hit> {
    let sat = sat::cuboid_triangle_find_min_overlap_axis(cuboid, triangle)?;
    let normal = Unit::try_new(sat.axis, crate::math::DEFAULT_EPSILON)
        .or_else(|| triangle.normal())
        .unwrap_or(crate::math::Vector::y_axis());

    let box_point = deepest_feature_center(cuboid, &-*normal);
    let tri_point = closest_point_on_triangle(triangle, &box_point);
    let point = na::center(&box_point, &tri_point);

    Some(Hit::new(normal, sat.overlap as Real, point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Rotation, Vector};

    #[test]
    fn box_on_ground_triangle() {
        let cuboid = Cuboid::new(Point::new(1.0, 0.95, 1.0), Vector::repeat(1.0), Rotation::identity());
        let tri = Triangle::new(
            Point::new(-10.0, 0.0, -10.0),
            Point::new(0.0, 0.0, 10.0),
            Point::new(10.0, 0.0, -10.0),
        );
        let hit = contact_cuboid_triangle(&cuboid, &tri).unwrap();
        assert_relative_eq!(*hit.normal, Vector::y(), epsilon = 1.0e-5);
        assert_relative_eq!(hit.depth, 0.05, epsilon = 1.0e-5);
        assert_relative_eq!(hit.point.x, 1.0, epsilon = 1.0e-4);
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn box_far_from_triangle() {
        let cuboid = Cuboid::new(Point::new(0.0, 5.0, 0.0), Vector::repeat(1.0), Rotation::identity());
        let tri = Triangle::new(
            Point::new(-1.0, 0.0, -1.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, -1.0),
        );
        assert!(contact_cuboid_triangle(&cuboid, &tri).is_none());
    }
}
