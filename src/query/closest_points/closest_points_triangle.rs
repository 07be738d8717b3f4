use crate::math::{Point, Real, DEFAULT_EPSILON};
use crate::query::closest_points::closest_points_segment_segment;
use crate::shape::{Segment, Triangle};

/// Projects `pt` on the triangle `tri` (its interior included).
pub fn closest_point_on_triangle(tri: &Triangle, pt: &Point<Real>) -> Point<Real> {
    // Voronoï regions tests, from Real-time collision detection by Christer Ericson.
    let ab = tri.b - tri.a;
    let ac = tri.c - tri.a;
    let ap = pt - tri.a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return tri.a;
    }

    let bp = pt - tri.b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return tri.b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return tri.a + ab * v;
    }

    let cp = pt - tri.c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return tri.c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return tri.a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return tri.b + (tri.c - tri.b) * w;
    }

    let denom = va + vb + vc;
    if denom.abs() <= DEFAULT_EPSILON {
        // Degenerate triangle: fall back to the closest edge.
        return tri
            .edges()
            .iter()
            .map(|e| crate::query::closest_points::closest_point_on_segment(e, pt).0)
            .min_by(|p1, p2| {
                na::distance_squared(p1, pt)
                    .partial_cmp(&na::distance_squared(p2, pt))
                    .unwrap_or(core::cmp::Ordering::Equal)
            })
            .unwrap_or(tri.a);
    }

    let v = vb / denom;
    let w = vc / denom;
    tri.a + ab * v + ac * w
}

/// Computes the pair of closest points between a segment and a triangle.
///
/// Returns `(p1, p2)` with `p1` on `seg` and `p2` on `tri`. If the segment
/// pierces the triangle both points are the piercing point.
pub fn closest_points_segment_triangle(
    seg: &Segment,
    tri: &Triangle,
) -> (Point<Real>, Point<Real>) {
    let n = tri.scaled_normal();
    let da = n.dot(&(seg.a - tri.a));
    let db = n.dot(&(seg.b - tri.a));

    if da * db <= 0.0 && (da - db).abs() > DEFAULT_EPSILON {
        let t = da / (da - db);
        let pierce = seg.point_at(t);
        let proj = closest_point_on_triangle(tri, &pierce);
        if na::distance_squared(&proj, &pierce) <= 1.0e-10 {
            return (pierce, pierce);
        }
    }

    let mut best = (seg.a, closest_point_on_triangle(tri, &seg.a));
    let mut best_dist = na::distance_squared(&best.0, &best.1);

    let mut candidates = arrayvec::ArrayVec::<(Point<Real>, Point<Real>), 4>::new();
    candidates.push((seg.b, closest_point_on_triangle(tri, &seg.b)));
    for edge in tri.edges().iter() {
        candidates.push(closest_points_segment_segment(seg, edge));
    }

    for (p1, p2) in candidates {
        let dist = na::distance_squared(&p1, &p2);
        if dist < best_dist {
            best_dist = dist;
            best = (p1, p2);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn projection_on_face_and_vertices() {
        let tri = unit_triangle();
        let inside = closest_point_on_triangle(&tri, &Point::new(0.2, 3.0, 0.2));
        assert_relative_eq!(inside, Point::new(0.2, 0.0, 0.2), epsilon = 1.0e-6);

        let vertex = closest_point_on_triangle(&tri, &Point::new(-1.0, 0.0, -1.0));
        assert_relative_eq!(vertex, tri.a, epsilon = 1.0e-6);

        let edge = closest_point_on_triangle(&tri, &Point::new(1.0, 0.0, 1.0));
        assert_relative_eq!(edge, Point::new(0.5, 0.0, 0.5), epsilon = 1.0e-6);
    }

    #[test]
    fn piercing_segment() {
        let tri = unit_triangle();
        let seg = Segment::new(Point::new(0.25, 1.0, 0.25), Point::new(0.25, -1.0, 0.25));
        let (p1, p2) = closest_points_segment_triangle(&seg, &tri);
        assert_relative_eq!(p1, Point::new(0.25, 0.0, 0.25), epsilon = 1.0e-6);
        assert_relative_eq!(p1, p2, epsilon = 1.0e-6);
    }
}
