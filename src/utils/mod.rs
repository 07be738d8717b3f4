//! Various unsorted geometrical and logical operators.

pub use self::clamp_magnitude::clamp_magnitude;
pub(crate) use self::inv::inv;
pub use self::point_in_triangle::{corner_direction, is_point_in_triangle, signed_area2, Orientation};
pub use self::sorted_pair::SortedPair;
pub use self::vertex_welder::VertexWelder;

mod clamp_magnitude;
pub mod hashmap;
mod inv;
mod point_in_triangle;
mod sorted_pair;
mod vertex_welder;
