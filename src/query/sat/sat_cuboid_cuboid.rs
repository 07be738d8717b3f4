use crate::math::{Real, Vector};
use crate::query::sat::{SatAxis, SAT_AXIS_EPSILON};
use crate::shape::Cuboid;

/// Tests the 15 candidate separating axes between two oriented boxes.
///
/// Returns `None` if the boxes are separated. Otherwise returns the axis of
/// minimum overlap, oriented from `cuboid2` toward `cuboid1`.
pub fn cuboid_cuboid_find_min_overlap_axis(cuboid1: &Cuboid, cuboid2: &Cuboid) -> Option<SatAxis> {
    let axes1 = cuboid1.axes();
    let axes2 = cuboid2.axes();
    let delta = cuboid1.center - cuboid2.center;

    let test_axis = |axis: Vector<Real>, is_edge_axis: bool| -> Option<SatAxis> {
        let sq_norm = axis.norm_squared();
        if sq_norm < SAT_AXIS_EPSILON {
            // Parallel edges: this axis is already covered by the face normals.
            return Some(SatAxis {
                overlap: Real::MAX,
                axis,
                is_edge_axis,
            });
        }

        let axis = axis / sq_norm.sqrt();
        let dist = delta.dot(&axis);
        let overlap =
            cuboid1.projected_radius(&axis) + cuboid2.projected_radius(&axis) - dist.abs();

        if overlap < 0.0 {
            None
        } else {
            Some(SatAxis {
                overlap,
                axis: if dist < 0.0 { -axis } else { axis },
                is_edge_axis,
            })
        }
    };

    let mut best = SatAxis {
        overlap: Real::MAX,
        axis: Vector::y(),
        is_edge_axis: false,
    };

    for axis in axes1.iter().chain(axes2.iter()) {
        best = best.keep_best(test_axis(*axis, false)?);
    }

    for a1 in axes1.iter() {
        for a2 in axes2.iter() {
            best = best.keep_best(test_axis(a1.cross(a2), true)?);
        }
    }

    Some(best)
}
