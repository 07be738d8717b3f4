/*!
cleave3d
========

**cleave3d** slices triangle meshes along arbitrary planes and turns the
resulting pieces into independently simulated rigid bodies.

The crate is organised leaf-first:

- [`shape`] and [`query`] define the collider primitives and the narrow-phase
  routines answering "do these two shapes overlap, and how?".
- [`dynamics`] contains the rigid-body integrator, the impulse solver and the
  [`PhysicsModel`](dynamics::PhysicsModel) pairing a body with a mesh.
- [`slicing`] implements the plane bisection of meshes, the capping of the
  exposed cross-sections and the worker pool running slices off the main thread.
- [`scene`] is the driving caller: a pool of sliceable props that issues slice
  requests and reintegrates their results every frame.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod dynamics;
pub mod mass_properties;
pub mod mesh;
pub mod query;
pub mod scene;
pub mod shape;
pub mod slicing;
pub mod transformation;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    pub use f32 as Real;
}

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use super::real::*;
    pub use na::{
        Isometry3, Matrix3, Point2, Point3, Translation3, UnitQuaternion, UnitVector3, Vector2,
        Vector3, Vector4,
    };

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The matrix type.
    pub use Matrix3 as Matrix;

    /// The transformation matrix type.
    pub use Isometry3 as Isometry;

    /// The translation type.
    pub use Translation3 as Translation;

    /// The rotation type.
    pub type Rotation<N> = UnitQuaternion<N>;

    /// The angular vector type.
    pub type AngVector<N> = Vector3<N>;

    /// The principal angular inertia of a rigid body.
    pub type PrincipalAngularInertia<N> = Vector3<N>;
}
