//! Ray-casting related definitions and implementations.

pub use self::ray::{Ray, RayCast};
pub use self::ray_ball::line_interval_with_ball;

mod ray;
mod ray_aabb;
mod ray_ball;
mod ray_capsule;
mod ray_collider;
mod ray_cuboid;
mod ray_triangle;
