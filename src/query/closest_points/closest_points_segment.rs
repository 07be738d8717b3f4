use crate::math::{Point, Real, DEFAULT_EPSILON};
use crate::shape::Segment;

/// Projects `pt` on the segment `seg`.
///
/// Returns the projected point and its parameter `t` along the segment
/// (`0` at `seg.a`, `1` at `seg.b`). Degenerate segments project on `seg.a`.
#[inline]
pub fn closest_point_on_segment(seg: &Segment, pt: &Point<Real>) -> (Point<Real>, Real) {
    let ab = seg.b - seg.a;
    let ap = pt - seg.a;
    let sqnab = ab.norm_squared();

    if sqnab <= DEFAULT_EPSILON {
        return (seg.a, 0.0);
    }

    let t = na::clamp(ab.dot(&ap) / sqnab, 0.0, 1.0);
    (seg.a + ab * t, t)
}

/// Computes the pair of closest points between two segments.
///
/// Returns `(p1, p2)` with `p1` on `seg1` and `p2` on `seg2`.
pub fn closest_points_segment_segment(
    seg1: &Segment,
    seg2: &Segment,
) -> (Point<Real>, Point<Real>) {
    // Inspired by Real-time collision detection by Christer Ericson.
    let d1 = seg1.b - seg1.a;
    let d2 = seg2.b - seg2.a;
    let r = seg1.a - seg2.a;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let mut s;
    let mut t;

    let eps = DEFAULT_EPSILON;
    if a <= eps && e <= eps {
        s = 0.0;
        t = 0.0;
    } else if a <= eps {
        s = 0.0;
        t = na::clamp(f / e, 0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e <= eps {
            t = 0.0;
            s = na::clamp(-c / a, 0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let ae = a * e;
            let bb = b * b;
            let denom = ae - bb;

            // Use absolute and ulps error to test collinearity.
            if denom > eps && !ulps_eq!(ae, bb) {
                s = na::clamp((b * f - c * e) / denom, 0.0, 1.0);
            } else {
                s = 0.0;
            }

            t = (b * s + f) / e;

            if t < 0.0 {
                t = 0.0;
                s = na::clamp(-c / a, 0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = na::clamp((b - c) / a, 0.0, 1.0);
            }
        }
    }

    (seg1.point_at(s), seg2.point_at(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        let s1 = Segment::new(Point::new(-1.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0));
        let s2 = Segment::new(Point::new(0.0, 1.0, -1.0), Point::new(0.0, 1.0, 1.0));
        let (p1, p2) = closest_points_segment_segment(&s1, &s2);
        assert_relative_eq!(p1, Point::origin(), epsilon = 1.0e-6);
        assert_relative_eq!(p2, Point::new(0.0, 1.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn degenerate_segment_projects_on_endpoint() {
        let seg = Segment::new(Point::new(1.0, 2.0, 3.0), Point::new(1.0, 2.0, 3.0));
        let (proj, t) = closest_point_on_segment(&seg, &Point::origin());
        assert_eq!(proj, seg.a);
        assert_eq!(t, 0.0);
    }
}
