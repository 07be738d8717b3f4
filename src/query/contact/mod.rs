//! Narrow-phase contact computation between colliders.

pub use self::contact_ball_ball::{contact_ball_ball, intersection_test_ball_ball};
pub use self::contact_ball_cuboid::contact_ball_cuboid;
pub use self::contact_ball_triangle::contact_ball_triangle;
pub use self::contact_capsule::{
    contact_capsule_ball, contact_capsule_capsule, contact_capsule_cuboid,
    contact_capsule_triangle,
};
pub use self::contact_collider_collider::{detect, try_detect};
pub use self::contact_cuboid_cuboid::{contact_aabb_aabb, contact_cuboid_cuboid};
pub use self::contact_cuboid_triangle::contact_cuboid_triangle;
pub use self::hit::Hit;

mod contact_ball_ball;
mod contact_ball_cuboid;
mod contact_ball_triangle;
mod contact_capsule;
mod contact_collider_collider;
mod contact_cuboid_cuboid;
mod contact_cuboid_triangle;
mod hit;
