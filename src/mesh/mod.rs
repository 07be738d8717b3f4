//! Render-side mesh data consumed and produced by the slicer.

pub use self::mesh_data::{MeshData, MeshDataError};
pub use self::model::{Model, ModelTransform, SharedModel};
pub use self::vertex::Vertex;

mod mesh_data;
mod model;
pub mod primitives;
mod vertex;
