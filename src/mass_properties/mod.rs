//! Mass properties (mass, center of mass, angular inertia) of collider shapes.

pub use self::mass_properties::MassProperties;

mod mass_properties;
mod mass_properties_ball;
mod mass_properties_capsule;
mod mass_properties_collider;
mod mass_properties_cuboid;
