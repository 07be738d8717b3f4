//! Function to check if a point is inside a triangle and related functions.

use crate::math::{Point2, Real};

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
/// The orientation or winding direction of a corner or polygon.
pub enum Orientation {
    /// Counter-clockwise
    Ccw,
    /// Clockwise
    Cw,
    /// Neither (a straight line)
    None,
}

/// Returns the direction of a line through `p1`, `p2` and `p3`.
///
/// Counter-clockwise example:
/// o p1
///  .        o p3
///   .     .
///    .  .
///     o p2
///
/// Degenerate corners, including corners with NaN coordinates, have the
/// orientation `None`.
pub fn corner_direction(
    p1: &Point2<Real>,
    p2: &Point2<Real>,
    p3: &Point2<Real>,
) -> Orientation {
    let v1 = p1 - p2;
    let v2 = p3 - p2;
    let cross: Real = v1.perp(&v2);

    if cross < 0.0 {
        Orientation::Ccw
    } else if cross > 0.0 {
        Orientation::Cw
    } else {
        Orientation::None
    }
}

/// Twice the signed area of a 2D polygon. Positive for counter-clockwise polygons.
pub fn signed_area2(points: &[Point2<Real>]) -> Real {
    let n = points.len();
    (0..n)
        .map(|i| {
            let p = &points[i];
            let q = &points[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum()
}

/// Returns `true` if point `p` is in triangle with corners `v1`, `v2` and `v3`.
/// Returns `None` if the triangle is invalid i.e. all points are the same or on a straight line.
pub fn is_point_in_triangle(
    p: &Point2<Real>,
    v1: &Point2<Real>,
    v2: &Point2<Real>,
    v3: &Point2<Real>,
) -> Option<bool> {
    let d1 = corner_direction(p, v1, v2);
    let d2 = corner_direction(p, v2, v3);
    let d3 = corner_direction(p, v3, v1);

    let has_cw = d1 == Orientation::Cw || d2 == Orientation::Cw || d3 == Orientation::Cw;
    let has_ccw = d1 == Orientation::Ccw || d2 == Orientation::Ccw || d3 == Orientation::Ccw;

    if d1 == Orientation::None && d2 == Orientation::None && d3 == Orientation::None {
        None
    } else {
        Some(!(has_cw && has_ccw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_orientation() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_relative_eq!(signed_area2(&square), 2.0);
        assert_eq!(
            corner_direction(&square[0], &square[1], &square[2]),
            Orientation::Ccw
        );
    }

    #[test]
    fn nan_corner_is_degenerate() {
        let nan = Point2::new(Real::NAN, 0.0);
        assert_eq!(
            corner_direction(&nan, &Point2::origin(), &Point2::new(1.0, 0.0)),
            Orientation::None
        );
    }
}
