use crate::mass_properties::MassProperties;
use crate::math::{Point, PrincipalAngularInertia, Real, Rotation, Vector};

impl MassProperties {
    pub(crate) fn cuboid_volume_unit_inertia(
        half_extents: Vector<Real>,
    ) -> (Real, PrincipalAngularInertia<Real>) {
        let volume = half_extents.x * half_extents.y * half_extents.z * 8.0;
        let ix = (half_extents.x * half_extents.x) / 3.0;
        let iy = (half_extents.y * half_extents.y) / 3.0;
        let iz = (half_extents.z * half_extents.z) / 3.0;

        (volume, Vector::new(iy + iz, ix + iz, ix + iy))
    }

    /// Computes the mass properties of an oriented box.
    pub fn from_cuboid(density: Real, half_extents: Vector<Real>) -> Self {
        Self::from_oriented_cuboid(density, Point::origin(), half_extents, Rotation::identity())
    }

    /// Computes the mass properties of a box centered at `center` with the orientation `rotation`.
    pub fn from_oriented_cuboid(
        density: Real,
        center: Point<Real>,
        half_extents: Vector<Real>,
        rotation: Rotation<Real>,
    ) -> Self {
        let (vol, unit_i) = Self::cuboid_volume_unit_inertia(half_extents);
        let mass = vol * density;
        Self::with_principal_inertia_frame(center, mass, unit_i * mass, rotation)
    }
}
