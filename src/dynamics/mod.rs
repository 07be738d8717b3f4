//! Rigid bodies, contact resolution and the models they drive.

pub use self::physics_model::{AutoDestroy, PhysicsModel, PhysicsModelConfig};
pub use self::rigid_body::{LockedAxes, RigidBody, RigidBodyParams};
pub use self::solver::{resolve_contact, solve_collision, solve_static_collision, ContactImpulse};
pub use self::static_world::{StaticCollider, StaticMaterial, StaticWorld};

pub mod consts;
mod physics_model;
mod rigid_body;
mod solver;
mod static_world;
