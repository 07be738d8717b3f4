//! Closest-point computations between points, segments, triangles and boxes.
//!
//! These feed the narrow-phase: capsule tests reduce to a closest point on the
//! capsule axis followed by a ball test.

pub use self::closest_points_cuboid::{closest_point_on_cuboid, closest_points_segment_cuboid};
pub use self::closest_points_segment::{
    closest_point_on_segment, closest_points_segment_segment,
};
pub use self::closest_points_triangle::{
    closest_point_on_triangle, closest_points_segment_triangle,
};

mod closest_points_cuboid;
mod closest_points_segment;
mod closest_points_triangle;
