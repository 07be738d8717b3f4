//! Application of the Separating Axis Theorem (SAT) for collision detection.
//!
//! Two convex shapes do not intersect if and only if there exists an axis onto
//! which their projections do not overlap. For boxes and triangles a finite set
//! of candidate axes is enough: the face normals of both shapes and the cross
//! products of their edge directions.
//!
//! The functions of this module return the candidate axis with the smallest
//! overlap, oriented from the second shape toward the first one, or `None` as
//! soon as a separating axis is found.

pub use self::sat_cuboid_cuboid::cuboid_cuboid_find_min_overlap_axis;
pub use self::sat_cuboid_triangle::cuboid_triangle_find_min_overlap_axis;

mod sat_cuboid_cuboid;
mod sat_cuboid_triangle;

use crate::math::{Real, Vector};

/// Candidate axes with a squared norm below this value are ignored.
pub(crate) const SAT_AXIS_EPSILON: Real = 1.0e-8;

/// Edge-edge axes must beat face axes by this relative margin to be selected.
///
/// Face contacts are more stable and produce better contact points.
pub(crate) const SAT_EDGE_BIAS: Real = 0.95;

/// The overlap along an axis, together with the axis oriented from the second
/// shape toward the first one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SatAxis {
    /// The overlap of both projections. Always non-negative.
    pub overlap: Real,
    /// The unit axis, oriented from the second shape toward the first.
    pub axis: Vector<Real>,
    /// Was this axis generated by an edge-edge cross product?
    pub is_edge_axis: bool,
}

impl SatAxis {
    /// Keeps the best of `self` and `other`, favoring face axes.
    pub(crate) fn keep_best(self, other: SatAxis) -> SatAxis {
        let other_overlap = if other.is_edge_axis && !self.is_edge_axis {
            other.overlap / SAT_EDGE_BIAS
        } else {
            other.overlap
        };

        if other_overlap < self.overlap {
            other
        } else {
            self
        }
    }
}
