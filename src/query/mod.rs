//! Non-persistent geometric queries.
//!
//! # General cases
//! The most general functions provided by this module are:
//!
//! * [`query::detect()`](detect) to compute the [`Hit`] (normal, depth, contact point) between two colliders.
//! * [`query::try_detect()`](try_detect) which also reports unsupported shape pairs.
//! * [`query::intersection_test()`](intersection_test) to determine if two colliders are intersecting or not.
//!
//! Ray-casting is achieved by importing the [`RayCast`] trait.
//!
//! # Specific cases
//! The functions exported by the `details` submodule are more specific versions of the ones described above.
//! They have the form `[operation]_[shape1]_[shape2]()`, e.g., `contact_ball_cuboid`.

pub use self::contact::{detect, try_detect, Hit};
pub use self::error::Unsupported;
pub use self::intersection_test::intersection_test;
pub use self::ray::{Ray, RayCast};
pub use self::split::{PlaneSide, SplitResult};

pub mod closest_points;
pub mod contact;
mod error;
mod intersection_test;
mod ray;
pub mod sat;
mod split;

/// Queries dedicated to specific pairs of shapes.
pub mod details {
    pub use super::closest_points::*;
    pub use super::contact::{
        contact_aabb_aabb, contact_ball_ball, contact_ball_cuboid, contact_ball_triangle,
        contact_capsule_ball, contact_capsule_capsule, contact_capsule_cuboid,
        contact_capsule_triangle, contact_cuboid_cuboid, contact_cuboid_triangle,
        intersection_test_ball_ball,
    };
    pub use super::ray::line_interval_with_ball;
}
