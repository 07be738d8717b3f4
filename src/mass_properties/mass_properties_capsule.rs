use crate::mass_properties::MassProperties;
use crate::math::{PrincipalAngularInertia, Real, Vector};
use crate::shape::Capsule;
use na::RealField;

impl MassProperties {
    pub(crate) fn cylinder_y_volume_unit_inertia(
        half_height: Real,
        radius: Real,
    ) -> (Real, PrincipalAngularInertia<Real>) {
        let volume = half_height * radius * radius * Real::pi() * 2.0;
        let sq_radius = radius * radius;
        let sq_height = half_height * half_height * 4.0;
        let off_principal = (sq_radius * 3.0 + sq_height) / 12.0;

        (volume, Vector::new(off_principal, sq_radius / 2.0, off_principal))
    }

    /// Computes the mass properties of a capsule.
    pub fn from_capsule(density: Real, capsule: &Capsule) -> Self {
        let half_height = capsule.half_height();
        let radius = capsule.radius;
        let (cyl_vol, cyl_unit_i) = Self::cylinder_y_volume_unit_inertia(half_height, radius);
        let (ball_vol, ball_unit_i) = Self::ball_volume_unit_angular_inertia(radius);
        let cap_vol = cyl_vol + ball_vol;
        let cap_mass = cap_vol * density;
        let mut cap_i = (cyl_unit_i * cyl_vol + ball_unit_i * ball_vol) * density;

        // Parallel axis contribution of the two hemispheres.
        let h = half_height * 2.0;
        let extra = (h * h * 0.25 + h * radius * 3.0 / 8.0) * ball_vol * density;
        cap_i.x += extra;
        cap_i.z += extra;

        Self::with_principal_inertia_frame(
            capsule.center(),
            cap_mass,
            cap_i,
            capsule.rotation_wrt_y(),
        )
    }
}
