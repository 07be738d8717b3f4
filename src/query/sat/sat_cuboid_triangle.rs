use crate::math::{Real, Vector};
use crate::query::sat::{SatAxis, SAT_AXIS_EPSILON};
use crate::shape::{Cuboid, Triangle};

/// Tests the 13 candidate separating axes between an oriented box and a triangle.
///
/// Returns `None` if the shapes are separated. Otherwise returns the axis of
/// minimum overlap, oriented from `triangle` toward `cuboid`.
pub fn cuboid_triangle_find_min_overlap_axis(
    cuboid: &Cuboid,
    triangle: &Triangle,
) -> Option<SatAxis> {
    let box_axes = cuboid.axes();
    let tri_edges = [
        triangle.b - triangle.a,
        triangle.c - triangle.b,
        triangle.a - triangle.c,
    ];

    let test_axis = |axis: Vector<Real>, is_edge_axis: bool| -> Option<SatAxis> {
        let sq_norm = axis.norm_squared();
        if sq_norm < SAT_AXIS_EPSILON {
            return Some(SatAxis {
                overlap: Real::MAX,
                axis,
                is_edge_axis,
            });
        }

        let axis = axis / sq_norm.sqrt();
        let center = cuboid.center.coords.dot(&axis);
        let radius = cuboid.projected_radius(&axis);
        let (tri_min, tri_max) = triangle.extents_on_dir(&axis);

        // Overlap when pushing the box toward +axis or toward -axis.
        let push_pos = tri_max - (center - radius);
        let push_neg = (center + radius) - tri_min;

        if push_pos < 0.0 || push_neg < 0.0 {
            None
        } else if push_pos <= push_neg {
            Some(SatAxis {
                overlap: push_pos,
                axis,
                is_edge_axis,
            })
        } else {
            Some(SatAxis {
                overlap: push_neg,
                axis: -axis,
                is_edge_axis,
            })
        }
    };

    let mut best = SatAxis {
        overlap: Real::MAX,
        axis: Vector::y(),
        is_edge_axis: false,
    };

    best = best.keep_best(test_axis(triangle.scaled_normal(), false)?);

    for axis in box_axes.iter() {
        best = best.keep_best(test_axis(*axis, false)?);
    }

    for axis in box_axes.iter() {
        for edge in tri_edges.iter() {
            best = best.keep_best(test_axis(axis.cross(edge), true)?);
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Rotation};

    #[test]
    fn box_resting_on_triangle() {
        let cuboid = Cuboid::new(Point::new(0.0, 0.9, 0.0), Vector::repeat(1.0), Rotation::identity());
        let tri = Triangle::new(
            Point::new(-5.0, 0.0, -5.0),
            Point::new(0.0, 0.0, 5.0),
            Point::new(5.0, 0.0, -5.0),
        );
        let sat = cuboid_triangle_find_min_overlap_axis(&cuboid, &tri).unwrap();
        assert_relative_eq!(sat.overlap, 0.1, epsilon = 1.0e-5);
        assert_relative_eq!(sat.axis, Vector::y(), epsilon = 1.0e-5);
    }
}
