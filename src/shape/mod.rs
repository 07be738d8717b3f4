//! Shapes supported by cleave3d.

pub use self::ball::Ball;
pub use self::capsule::Capsule;
pub use self::collider::{Collider, ColliderType};
pub use self::cuboid::Cuboid;
pub use self::plane::Plane;
pub use self::segment::Segment;
pub use self::triangle::Triangle;

mod ball;
mod capsule;
mod collider;
mod cuboid;
mod plane;
mod segment;
mod triangle;
