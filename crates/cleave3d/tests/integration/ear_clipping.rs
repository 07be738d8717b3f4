use cleave3d::math::{Point2, Real};
use cleave3d::transformation::{triangulate_ear_clipping, triangulate_polygon};

fn area(a: &Point2<Real>, b: &Point2<Real>, c: &Point2<Real>) -> Real {
    ((b - a).perp(&(c - a))) / 2.0
}

fn polygon_area(pts: &[Point2<Real>]) -> Real {
    let n = pts.len();
    (0..n)
        .map(|i| pts[i].coords.perp(&pts[(i + 1) % n].coords))
        .sum::<Real>()
        / 2.0
}

/// A simple star-shaped polygon with random radii.
fn star(rng: &mut oorandom::Rand32, n: usize) -> Vec<Point2<Real>> {
    (0..n)
        .map(|i| {
            let angle = i as Real / n as Real * core::f32::consts::TAU;
            let radius = 0.5 + rng.rand_float();
            Point2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

#[test]
fn simple_polygons_produce_n_minus_two_triangles() {
    let mut rng = oorandom::Rand32::new(42);

    for n in 3..40 {
        let pts = star(&mut rng, n);
        let triangles = triangulate_ear_clipping(&pts).unwrap();
        assert_eq!(triangles.len(), n - 2);

        let covered: Real = triangles
            .iter()
            .map(|t| {
                let a = area(&pts[t[0] as usize], &pts[t[1] as usize], &pts[t[2] as usize]);
                assert!(a >= 0.0);
                a
            })
            .sum();
        assert_relative_eq!(covered, polygon_area(&pts), epsilon = 1.0e-4);
    }
}

#[test]
fn clockwise_polygons_are_reversed() {
    let mut rng = oorandom::Rand32::new(3);
    let mut pts = star(&mut rng, 12);
    pts.reverse();

    let triangles = triangulate_polygon(&pts);
    assert_eq!(triangles.len(), 10);
    for t in &triangles {
        assert!(area(&pts[t[0] as usize], &pts[t[1] as usize], &pts[t[2] as usize]) >= 0.0);
    }
}
