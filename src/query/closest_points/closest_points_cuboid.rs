use crate::math::{Point, Real, DIM};
use crate::query::closest_points::closest_point_on_segment;
use crate::shape::{Cuboid, Segment};

const GOLDEN_RATIO_INV: Real = 0.618_034;
const LINE_SEARCH_ITERATIONS: usize = 40;

/// Projects `pt` on the oriented box `cuboid`.
///
/// Points inside of the box are their own projection.
#[inline]
pub fn closest_point_on_cuboid(cuboid: &Cuboid, pt: &Point<Real>) -> Point<Real> {
    let mut local = cuboid.to_local(pt);
    for i in 0..DIM {
        local[i] = na::clamp(local[i], -cuboid.half_extents[i], cuboid.half_extents[i]);
    }
    cuboid.position() * local
}

/// Signed depth of `pt` inside of `cuboid`: the distance to the closest face,
/// negative when the point is outside.
#[inline]
fn inside_depth(cuboid: &Cuboid, pt: &Point<Real>) -> Real {
    let local = cuboid.to_local(pt);
    (0..DIM)
        .map(|i| cuboid.half_extents[i] - local[i].abs())
        .fold(Real::MAX, Real::min)
}

/// Minimizes a unimodal function over `[0, 1]` using golden-section search.
fn golden_section_min(f: impl Fn(Real) -> Real) -> Real {
    let mut lo: Real = 0.0;
    let mut hi: Real = 1.0;
    let mut x1 = hi - GOLDEN_RATIO_INV * (hi - lo);
    let mut x2 = lo + GOLDEN_RATIO_INV * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    for _ in 0..LINE_SEARCH_ITERATIONS {
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - GOLDEN_RATIO_INV * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + GOLDEN_RATIO_INV * (hi - lo);
            f2 = f(x2);
        }
    }

    // The extremities are not visited by the search itself.
    let mid = (lo + hi) * 0.5;
    [0.0, mid, 1.0]
        .into_iter()
        .min_by(|a, b| f(*a).partial_cmp(&f(*b)).unwrap_or(core::cmp::Ordering::Equal))
        .unwrap_or(mid)
}

/// Computes a pair of closest points between a segment and an oriented box.
///
/// Returns `(p1, p2)` with `p1` on `seg` and `p2` on (or inside) `cuboid`.
/// When the segment enters the box, `p1 == p2` is the point of the segment
/// lying deepest inside of the box.
pub fn closest_points_segment_cuboid(
    seg: &Segment,
    cuboid: &Cuboid,
) -> (Point<Real>, Point<Real>) {
    if seg.length() <= crate::math::DEFAULT_EPSILON {
        return (seg.a, closest_point_on_cuboid(cuboid, &seg.a));
    }

    // The face depth is concave along a line so its maximum is found by the same search.
    let deepest_t = golden_section_min(|t| -inside_depth(cuboid, &seg.point_at(t)));
    let deepest = seg.point_at(deepest_t);
    if inside_depth(cuboid, &deepest) >= 0.0 {
        return (deepest, deepest);
    }

    let t = golden_section_min(|t| {
        let pt = seg.point_at(t);
        na::distance_squared(&pt, &closest_point_on_cuboid(cuboid, &pt))
    });
    let on_seg = seg.point_at(t);
    let on_box = closest_point_on_cuboid(cuboid, &on_seg);

    // Refine the segment point against the box point to remove the line-search error.
    let (refined, _) = closest_point_on_segment(seg, &on_box);
    if na::distance_squared(&refined, &on_box) < na::distance_squared(&on_seg, &on_box) {
        (refined, on_box)
    } else {
        (on_seg, on_box)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Rotation, Vector};

    #[test]
    fn segment_above_box() {
        let cuboid = Cuboid::new(Point::origin(), Vector::repeat(1.0), Rotation::identity());
        let seg = Segment::new(Point::new(-3.0, 2.0, 0.0), Point::new(3.0, 2.0, 0.0));
        let (p1, p2) = closest_points_segment_cuboid(&seg, &cuboid);
        assert_relative_eq!(p1.y, 2.0, epsilon = 1.0e-4);
        assert_relative_eq!(p2.y, 1.0, epsilon = 1.0e-4);
        assert!(p1.x.abs() <= 1.0 + 1.0e-3);
    }

    #[test]
    fn segment_through_box_returns_deepest_point() {
        let cuboid = Cuboid::new(Point::origin(), Vector::repeat(1.0), Rotation::identity());
        let seg = Segment::new(Point::new(-3.0, 0.0, 0.0), Point::new(3.0, 0.0, 0.0));
        let (p1, p2) = closest_points_segment_cuboid(&seg, &cuboid);
        assert_eq!(p1, p2);
        assert!(cuboid.contains_point(&p1, 0.0));
    }
}
