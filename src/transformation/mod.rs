//! Polygon triangulation and cut-loop reconstruction.

pub use self::cut_loops::{extract_loops, CutLoop, LoopExtractionOptions, RawEdge};
pub use self::ear_clipping::{triangulate_ear_clipping, triangulate_polygon};

mod cut_loops;
mod ear_clipping;
