//! Plane slicing of models and the worker pool running it off the main thread.

pub use self::cap::{build_cap, CapUvMode};
pub use self::slicer::{MeshSplit, MeshUploader, SliceOptions, SliceOutput, SlicedUpload, Slicer};
pub use self::task_manager::{
    BodySnapshot, SliceRequest, SliceResult, SliceTaskError, SliceTaskManager,
    SliceTaskManagerConfig,
};

use crate::math::Real;
use crate::mesh::MeshDataError;
use crate::query::PlaneSide;

mod cap;
mod slicer;
mod task_manager;

/// Tolerance used to weld cut vertices and to snap vertices onto the cutting plane.
pub const EPSILON: Real = 1.0e-4;

/// Errors that can occur when slicing a model.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SliceError {
    /// The model has no triangle.
    #[error("the model to slice has no triangle.")]
    EmptyModel,
    /// One of the sub-meshes has a malformed index buffer.
    #[error("cannot slice a malformed mesh: {0}")]
    InvalidMesh(#[from] MeshDataError),
    /// The cutting plane could not be expressed in the model's local space.
    #[error("the cutting plane is degenerate in the model's local space.")]
    DegeneratePlane,
    /// The plane does not cross the model: every triangle lies on `side`.
    #[error("the cutting plane does not cross the model (all the geometry is on the {side:?} side).")]
    NotCrossed {
        /// The side of the plane containing the whole model.
        side: PlaneSide,
    },
    /// The slicing code panicked on a worker thread.
    #[error("the slicing task panicked.")]
    Panicked,
}
