use crate::math::{AngVector, Matrix, Point, Real, Rotation};
use crate::utils;

/// The local mass properties of a rigid body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// The center of mass, in the local-space of the rigid body.
    pub local_com: Point<Real>,
    /// The inverse of the mass of the rigid body.
    ///
    /// If this is zero, the rigid body is assumed to have infinite mass.
    pub inv_mass: Real,
    /// The inverse of the principal angular inertia of the rigid body.
    ///
    /// Components set to zero are assumed to be infinite along the corresponding principal axis.
    pub inv_principal_inertia: AngVector<Real>,
    /// The principal vectors of the local angular inertia tensor of the rigid body.
    pub principal_inertia_local_frame: Rotation<Real>,
}

impl MassProperties {
    /// Initializes the mass properties with the given center-of-mass, mass, and angular inertia.
    pub fn new(local_com: Point<Real>, mass: Real, principal_inertia: AngVector<Real>) -> Self {
        Self::with_principal_inertia_frame(local_com, mass, principal_inertia, Rotation::identity())
    }

    /// Initializes the mass properties from the given center-of-mass, mass, and principal
    /// angular inertia expressed in the given local frame.
    pub fn with_principal_inertia_frame(
        local_com: Point<Real>,
        mass: Real,
        principal_inertia: AngVector<Real>,
        principal_inertia_local_frame: Rotation<Real>,
    ) -> Self {
        Self {
            local_com,
            inv_mass: utils::inv(mass),
            inv_principal_inertia: principal_inertia.map(utils::inv),
            principal_inertia_local_frame,
        }
    }

    /// The mass properties of a body with infinite mass and inertia.
    pub fn infinite() -> Self {
        Self::new(Point::origin(), 0.0, AngVector::zeros())
    }

    /// The mass.
    pub fn mass(&self) -> Real {
        utils::inv(self.inv_mass)
    }

    /// The angular inertia along the principal inertia axes.
    pub fn principal_inertia(&self) -> AngVector<Real> {
        self.inv_principal_inertia.map(utils::inv)
    }

    /// The same mass distribution, rescaled so that the total mass is `mass`.
    pub fn with_mass(&self, mass: Real) -> Self {
        let ratio = mass * self.inv_mass;
        Self {
            inv_mass: utils::inv(mass),
            inv_principal_inertia: self.inv_principal_inertia * utils::inv(ratio),
            ..*self
        }
    }

    /// The inverse angular inertia tensor, expressed in the local-space of the body.
    pub fn local_inv_inertia_tensor(&self) -> Matrix<Real> {
        self.world_inv_inertia_tensor(&Rotation::identity())
    }

    /// The inverse angular inertia tensor of a body with the orientation `rot`.
    pub fn world_inv_inertia_tensor(&self, rot: &Rotation<Real>) -> Matrix<Real> {
        let frame = (rot * self.principal_inertia_local_frame)
            .to_rotation_matrix()
            .into_inner();
        frame * Matrix::from_diagonal(&self.inv_principal_inertia) * frame.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector;

    #[test]
    fn rescaling_the_mass_rescales_the_inertia() {
        let props = MassProperties::from_cuboid(1.0, Vector::repeat(1.0));
        assert_relative_eq!(props.mass(), 8.0, epsilon = 1.0e-5);
        let heavier = props.with_mass(16.0);
        assert_relative_eq!(heavier.mass(), 16.0, epsilon = 1.0e-4);
        assert_relative_eq!(
            heavier.principal_inertia(),
            props.principal_inertia() * 2.0,
            epsilon = 1.0e-4
        );
    }

    #[test]
    fn rotated_inverse_inertia_tensor() {
        let props = MassProperties::new(Point::origin(), 1.0, Vector::new(1.0, 2.0, 4.0));
        let rot = Rotation::from_axis_angle(&Vector::z_axis(), core::f32::consts::FRAC_PI_2);
        let tensor = props.world_inv_inertia_tensor(&rot);
        // The local x axis is now the world y axis.
        assert_relative_eq!(tensor[(1, 1)], 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(tensor[(0, 0)], 0.5, epsilon = 1.0e-5);
        assert_relative_eq!(tensor[(2, 2)], 0.25, epsilon = 1.0e-5);
    }

    #[test]
    fn infinite_mass_has_zero_inverse() {
        let props = MassProperties::infinite();
        assert_eq!(props.inv_mass, 0.0);
        assert_eq!(props.local_inv_inertia_tensor(), Matrix::zeros());
    }
}
