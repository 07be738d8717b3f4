use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DIM};
use crate::query::sat;
use crate::query::Hit;
use crate::shape::Cuboid;
use na::Unit;

/// Tolerance used to decide which vertices of a box lie inside of the other box.
const VERTEX_INSIDE_MARGIN: Real = 1.0e-4;

/// Contact between two oriented boxes.
///
/// The normal and depth are those of the separating axis with minimal overlap.
/// The contact point is the average of the vertices of each box lying inside
/// of the other one, or the midpoint of the deepest features if there is none
/// (edge-edge contacts).
pub fn contact_cuboid_cuboid(cuboid1: &Cuboid, cuboid2: &Cuboid) -> Option<Hit> {
    let sat = sat::cuboid_cuboid_find_min_overlap_axis(cuboid1, cuboid2)?;
    let normal = Unit::try_new(sat.axis, crate::math::DEFAULT_EPSILON).unwrap_or(Vector::y_axis());

    let mut sum = Vector::zeros();
    let mut count = 0;
    for pt in cuboid1.vertices().iter() {
        if cuboid2.contains_point(pt, VERTEX_INSIDE_MARGIN) {
            sum += pt.coords;
            count += 1;
        }
    }
    for pt in cuboid2.vertices().iter() {
        if cuboid1.contains_point(pt, VERTEX_INSIDE_MARGIN) {
            sum += pt.coords;
            count += 1;
        }
    }

    let point = if count > 0 {
        Point::from(sum / count as Real)
    } else {
        let deepest1 = deepest_feature_center(cuboid1, &-*normal);
        let deepest2 = deepest_feature_center(cuboid2, &normal);
        na::center(&deepest1, &deepest2)
    };

    Some(Hit::new(normal, sat.overlap, point))
}

/// The center of the vertices of `cuboid` lying furthest along `dir`.
pub(crate) fn deepest_feature_center(cuboid: &Cuboid, dir: &Vector<Real>) -> Point<Real> {
    let vertices = cuboid.vertices();
    let max = vertices
        .iter()
        .map(|pt| pt.coords.dot(dir))
        .fold(-Real::MAX, Real::max);

    let mut sum = Vector::zeros();
    let mut count = 0;
    for pt in vertices.iter() {
        if pt.coords.dot(dir) >= max - VERTEX_INSIDE_MARGIN {
            sum += pt.coords;
            count += 1;
        }
    }

    if count == 0 {
        cuboid.support_point(dir)
    } else {
        Point::from(sum / count as Real)
    }
}

/// Contact between two axis-aligned boxes.
///
/// The normal is the world axis of minimum overlap and the contact point is the
/// center of the intersection of both boxes.
pub fn contact_aabb_aabb(aabb1: &Aabb, aabb2: &Aabb) -> Option<Hit> {
    let inter = aabb1.intersection(aabb2)?;
    let delta = aabb1.center() - aabb2.center();
    let overlaps = inter.extents();

    let mut best_axis = 0;
    for i in 1..DIM {
        if overlaps[i] < overlaps[best_axis] {
            best_axis = i;
        }
    }

    if overlaps[best_axis] <= 0.0 {
        return None;
    }

    let mut normal = Vector::zeros();
    normal[best_axis] = if delta[best_axis] < 0.0 { -1.0 } else { 1.0 };

    Some(Hit::new(
        Unit::new_unchecked(normal),
        overlaps[best_axis],
        inter.center(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rotation;

    #[test]
    fn stacked_boxes() {
        let top = Cuboid::new(Point::new(0.0, 1.9, 0.0), Vector::repeat(1.0), Rotation::identity());
        let bottom = Cuboid::new(Point::origin(), Vector::new(3.0, 1.0, 3.0), Rotation::identity());
        let hit = contact_cuboid_cuboid(&top, &bottom).unwrap();
        assert_relative_eq!(*hit.normal, Vector::y(), epsilon = 1.0e-5);
        assert_relative_eq!(hit.depth, 0.1, epsilon = 1.0e-5);
        assert_relative_eq!(hit.point.x, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(hit.point.z, 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn overlapping_aabbs() {
        let a = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point::new(0.8, -1.0, -1.0), Point::new(2.8, 1.0, 1.0));
        let hit = contact_aabb_aabb(&a, &b).unwrap();
        assert_relative_eq!(*hit.normal, -Vector::x(), epsilon = 1.0e-6);
        assert_relative_eq!(hit.depth, 0.2, epsilon = 1.0e-5);
        assert_relative_eq!(hit.point, Point::new(0.9, 0.0, 0.0), epsilon = 1.0e-5);
    }
}
