use crate::dynamics::consts::{
    DEFAULT_SLEEP_THRESHOLD, GRAVITY, MAX_DELTA_TIME, MAX_ROTATION_PER_FRAME, MIN_MASS,
    SLEEP_TIME_THRESHOLD,
};
use crate::mass_properties::MassProperties;
use crate::math::{AngVector, Isometry, Matrix, Point, Real, Rotation, Translation, Vector};
use crate::shape::Collider;
use crate::utils::clamp_magnitude;

/// Flags blocking the motion of a rigid body along some world axes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct LockedAxes(u8);

bitflags::bitflags! {
    impl LockedAxes: u8 {
        /// The translation along the world `x` axis is blocked.
        const TRANSLATION_LOCKED_X = 1 << 0;
        /// The translation along the world `y` axis is blocked.
        const TRANSLATION_LOCKED_Y = 1 << 1;
        /// The translation along the world `z` axis is blocked.
        const TRANSLATION_LOCKED_Z = 1 << 2;
        /// All translations are blocked.
        const TRANSLATION_LOCKED = Self::TRANSLATION_LOCKED_X.bits() | Self::TRANSLATION_LOCKED_Y.bits() | Self::TRANSLATION_LOCKED_Z.bits();
        /// The rotation around the world `x` axis is blocked.
        const ROTATION_LOCKED_X = 1 << 3;
        /// The rotation around the world `y` axis is blocked.
        const ROTATION_LOCKED_Y = 1 << 4;
        /// The rotation around the world `z` axis is blocked.
        const ROTATION_LOCKED_Z = 1 << 5;
        /// All rotations are blocked.
        const ROTATION_LOCKED = Self::ROTATION_LOCKED_X.bits() | Self::ROTATION_LOCKED_Y.bits() | Self::ROTATION_LOCKED_Z.bits();
    }
}

impl LockedAxes {
    fn mask(self, x: Self, y: Self, z: Self) -> Vector<Real> {
        let free = |flag: Self| if self.contains(flag) { 0.0 } else { 1.0 };
        Vector::new(free(x), free(y), free(z))
    }

    /// Zeroes the locked components of a linear velocity.
    pub fn constrain_linear(self, v: &Vector<Real>) -> Vector<Real> {
        v.component_mul(&self.mask(
            Self::TRANSLATION_LOCKED_X,
            Self::TRANSLATION_LOCKED_Y,
            Self::TRANSLATION_LOCKED_Z,
        ))
    }

    /// Zeroes the locked components of an angular velocity.
    pub fn constrain_angular(self, w: &AngVector<Real>) -> AngVector<Real> {
        w.component_mul(&self.mask(
            Self::ROTATION_LOCKED_X,
            Self::ROTATION_LOCKED_Y,
            Self::ROTATION_LOCKED_Z,
        ))
    }
}

/// The physical parameters of a rigid body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyParams {
    /// The mass of the body. Clamped to [`MIN_MASS`].
    pub mass: Real,
    /// The linear damping coefficient.
    pub linear_drag: Real,
    /// The angular damping coefficient.
    pub angular_drag: Real,
    /// Is the body affected by gravity?
    pub use_gravity: bool,
    /// The largest norm of the linear velocity.
    pub max_linear_velocity: Real,
    /// The largest norm of the angular velocity.
    pub max_angular_velocity: Real,
    /// The restitution coefficient, in `[0, 1]`.
    pub restitution: Real,
    /// The Coulomb friction coefficient.
    pub friction: Real,
    /// A kinematic body has an infinite mass and is moved by the caller only.
    pub kinematic: bool,
    /// The kinetic energy under which the body starts falling asleep.
    pub sleep_threshold: Real,
    /// The blocked degrees of freedom.
    pub locked_axes: LockedAxes,
}

impl Default for RigidBodyParams {
    fn default() -> Self {
        RigidBodyParams {
            mass: 1.0,
            linear_drag: 0.05,
            angular_drag: 0.1,
            use_gravity: true,
            max_linear_velocity: 50.0,
            max_angular_velocity: 4.0 * core::f32::consts::PI,
            restitution: 0.2,
            friction: 0.5,
            kinematic: false,
            sleep_threshold: DEFAULT_SLEEP_THRESHOLD,
            locked_axes: LockedAxes::empty(),
        }
    }
}

/// A rigid body with a single collider.
///
/// The collider is expressed in the local-space of the body. The body position
/// is the world-space placement of that local-space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBody {
    params: RigidBodyParams,
    collider: Collider,
    world_collider: Collider,
    mprops: MassProperties,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    angvel: AngVector<Real>,
    force: Vector<Real>,
    torque: AngVector<Real>,
    world_inv_inertia: Matrix<Real>,
    sleeping: bool,
    sleep_timer: Real,
    generation: u32,
    ignore_collision_timer: Real,
}

impl RigidBody {
    /// Creates an awake body at rest.
    pub fn new(position: Isometry<Real>, collider: Collider, params: RigidBodyParams) -> Self {
        let params = RigidBodyParams {
            mass: params.mass.max(MIN_MASS),
            ..params
        };
        let mut body = RigidBody {
            params,
            collider,
            world_collider: collider.transformed(&position),
            mprops: MassProperties::from_collider_with_mass(params.mass, &collider),
            position,
            linvel: Vector::zeros(),
            angvel: AngVector::zeros(),
            force: Vector::zeros(),
            torque: AngVector::zeros(),
            world_inv_inertia: Matrix::zeros(),
            sleeping: false,
            sleep_timer: 0.0,
            generation: 0,
            ignore_collision_timer: 0.0,
        };
        body.update_derived();
        body
    }

    /// The parameters of this body.
    #[inline]
    pub fn params(&self) -> &RigidBodyParams {
        &self.params
    }

    /// Replaces the parameters of this body, recomputing its mass properties.
    pub fn set_params(&mut self, params: RigidBodyParams) {
        self.params = RigidBodyParams {
            mass: params.mass.max(MIN_MASS),
            ..params
        };
        self.mprops = MassProperties::from_collider_with_mass(self.params.mass, &self.collider);
        self.update_derived();
    }

    /// The local-space collider.
    #[inline]
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    /// The collider placed in the world.
    #[inline]
    pub fn world_collider(&self) -> &Collider {
        &self.world_collider
    }

    /// Replaces the collider, keeping the mass of the body.
    pub fn set_collider(&mut self, collider: Collider) {
        self.collider = collider;
        self.mprops = MassProperties::from_collider_with_mass(self.params.mass, &collider);
        self.update_derived();
    }

    /// The local mass properties of this body.
    #[inline]
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mprops
    }

    /// The world-space placement of this body.
    #[inline]
    pub fn position(&self) -> &Isometry<Real> {
        &self.position
    }

    /// Teleports this body.
    pub fn set_position(&mut self, position: Isometry<Real>) {
        self.position = position;
        self.update_derived();
    }

    /// Moves this body by `displacement`.
    pub fn translate(&mut self, displacement: &Vector<Real>) {
        self.position.translation.vector += displacement;
        self.world_collider = self.collider.transformed(&self.position);
    }

    /// The world-space center of mass.
    #[inline]
    pub fn center_of_mass(&self) -> Point<Real> {
        self.position * self.mprops.local_com
    }

    /// The linear velocity.
    #[inline]
    pub fn linvel(&self) -> &Vector<Real> {
        &self.linvel
    }

    /// Sets the linear velocity, without waking up the body.
    pub fn set_linvel(&mut self, linvel: Vector<Real>) {
        self.linvel = self.params.locked_axes.constrain_linear(&linvel);
    }

    /// The angular velocity.
    #[inline]
    pub fn angvel(&self) -> &AngVector<Real> {
        &self.angvel
    }

    /// Sets the angular velocity, without waking up the body.
    pub fn set_angvel(&mut self, angvel: AngVector<Real>) {
        self.angvel = self.params.locked_axes.constrain_angular(&angvel);
    }

    /// The mass of this body.
    #[inline]
    pub fn mass(&self) -> Real {
        self.params.mass
    }

    /// The inverse mass used by the solver. Zero for kinematic bodies.
    #[inline]
    pub fn inv_mass(&self) -> Real {
        if self.params.kinematic {
            0.0
        } else {
            self.mprops.inv_mass
        }
    }

    /// The world-space inverse inertia tensor. Zero for kinematic bodies.
    #[inline]
    pub fn world_inv_inertia(&self) -> &Matrix<Real> {
        &self.world_inv_inertia
    }

    /// Is this body moved by the caller only?
    #[inline]
    pub fn is_kinematic(&self) -> bool {
        self.params.kinematic
    }

    /// Does this body have an infinite mass?
    #[inline]
    pub fn is_static_like(&self) -> bool {
        self.inv_mass() == 0.0
    }

    /// The velocity of the material point located at `point`.
    #[inline]
    pub fn velocity_at_point(&self, point: &Point<Real>) -> Vector<Real> {
        self.linvel + self.angvel.cross(&(point - self.center_of_mass()))
    }

    /// The kinetic energy of this body.
    pub fn kinetic_energy(&self) -> Real {
        let linear = self.linvel.norm_squared() * self.params.mass;
        let local_angvel = self.position.rotation.inverse_transform_vector(&self.angvel);
        let frame_angvel = self
            .mprops
            .principal_inertia_local_frame
            .inverse_transform_vector(&local_angvel);
        let angular = frame_angvel
            .component_mul(&frame_angvel)
            .dot(&self.mprops.principal_inertia());
        (linear + angular) / 2.0
    }

    /// Accumulates a force applied at the center of mass until the next integration.
    pub fn apply_force(&mut self, force: Vector<Real>) {
        self.force += force;
    }

    /// Accumulates a torque until the next integration.
    pub fn apply_torque(&mut self, torque: AngVector<Real>) {
        self.torque += torque;
    }

    /// Accumulates a force applied at a world-space point until the next integration.
    pub fn apply_force_at_point(&mut self, force: Vector<Real>, point: &Point<Real>) {
        self.force += force;
        self.torque += (point - self.center_of_mass()).cross(&force);
    }

    /// Applies an impulse at the center of mass. Wakes the body up.
    pub fn apply_impulse(&mut self, impulse: Vector<Real>) {
        self.wake_up();
        self.set_linvel(self.linvel + impulse * self.inv_mass());
    }

    /// Applies an angular impulse. Wakes the body up.
    pub fn apply_angular_impulse(&mut self, impulse: AngVector<Real>) {
        self.wake_up();
        self.set_angvel(self.angvel + self.world_inv_inertia * impulse);
    }

    /// Applies an impulse at a world-space point. Wakes the body up.
    pub fn apply_impulse_at_point(&mut self, impulse: Vector<Real>, point: &Point<Real>) {
        let torque_impulse = (point - self.center_of_mass()).cross(&impulse);
        self.apply_impulse(impulse);
        self.apply_angular_impulse(torque_impulse);
    }

    /// Is this body sleeping?
    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Wakes this body up. Does nothing else on an awake body.
    pub fn wake_up(&mut self) {
        self.sleeping = false;
        self.sleep_timer = 0.0;
    }

    /// Puts this body to sleep immediately, stopping it.
    pub fn sleep(&mut self) {
        self.sleeping = true;
        self.linvel = Vector::zeros();
        self.angvel = AngVector::zeros();
        self.force = Vector::zeros();
        self.torque = AngVector::zeros();
    }

    /// Accumulates the time spent below the sleep threshold and falls asleep once
    /// it exceeds [`SLEEP_TIME_THRESHOLD`].
    ///
    /// Returns `true` if the body fell asleep during this call.
    pub fn check_sleep_state(&mut self, dt: Real) -> bool {
        if self.sleeping || self.params.kinematic {
            return false;
        }

        let resting = self.force == Vector::zeros() && self.torque == AngVector::zeros();
        if resting && self.kinetic_energy() < self.params.sleep_threshold {
            self.sleep_timer += dt;
            if self.sleep_timer >= SLEEP_TIME_THRESHOLD {
                self.sleep();
                return true;
            }
        } else {
            self.sleep_timer = 0.0;
        }

        false
    }

    /// The id of the slice that created this body. Zero if it was not created by a slice.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The time left during which this body ignores the bodies of its own generation.
    #[inline]
    pub fn ignore_collision_timer(&self) -> Real {
        self.ignore_collision_timer
    }

    /// Tags this body with a slice generation, ignoring its siblings for `duration` seconds.
    pub fn set_generation(&mut self, generation: u32, duration: Real) {
        self.generation = generation;
        self.ignore_collision_timer = duration.max(0.0);
    }

    /// Should the collisions between `self` and `other` be ignored?
    pub fn ignores_collision_with(&self, other: &RigidBody) -> bool {
        self.generation != 0
            && self.generation == other.generation
            && (self.ignore_collision_timer > 0.0 || other.ignore_collision_timer > 0.0)
    }

    /// Advances this body by one step of at most [`MAX_DELTA_TIME`].
    ///
    /// The sleep state is evaluated first, on the velocities left by the last
    /// collision resolution. Then gravity and accumulated forces are applied,
    /// velocities are damped, clamped and constrained, and the pose is integrated.
    /// Forces are cleared afterward.
    pub fn integrate(&mut self, dt: Real) {
        let dt = dt.clamp(0.0, MAX_DELTA_TIME);
        self.ignore_collision_timer = (self.ignore_collision_timer - dt).max(0.0);

        if self.params.kinematic {
            self.force = Vector::zeros();
            self.torque = AngVector::zeros();
            self.update_derived();
            return;
        }

        let _ = self.check_sleep_state(dt);
        if self.sleeping {
            return;
        }

        if self.params.use_gravity {
            self.linvel += GRAVITY * dt;
        }
        self.linvel += self.force * (self.mprops.inv_mass * dt);
        self.angvel += self.world_inv_inertia * self.torque * dt;

        self.linvel /= 1.0 + self.params.linear_drag.max(0.0) * dt;
        self.angvel /= 1.0 + self.params.angular_drag.max(0.0) * dt;
        self.set_linvel(clamp_magnitude(self.linvel, self.params.max_linear_velocity));
        self.set_angvel(clamp_magnitude(self.angvel, self.params.max_angular_velocity));

        let com = self.center_of_mass();
        let rotation_step = clamp_magnitude(self.angvel * dt, MAX_ROTATION_PER_FRAME);
        let rotation = Rotation::from_scaled_axis(rotation_step);
        let new_com = com + self.linvel * dt;
        // Rotate around the center of mass.
        let new_rotation = rotation * self.position.rotation;
        let com_offset = new_rotation * self.mprops.local_com.coords;
        self.position = Isometry::from_parts(
            Translation::from(new_com.coords - com_offset),
            Rotation::new_normalize(new_rotation.into_inner()),
        );

        self.force = Vector::zeros();
        self.torque = AngVector::zeros();
        self.update_derived();
    }

    fn update_derived(&mut self) {
        self.world_collider = self.collider.transformed(&self.position);
        self.world_inv_inertia = if self.params.kinematic {
            Matrix::zeros()
        } else {
            let inv_inertia = self
                .mprops
                .world_inv_inertia_tensor(&self.position.rotation);
            let locks = self.params.locked_axes.constrain_angular(&Vector::repeat(1.0));
            let lock = Matrix::from_diagonal(&locks);
            lock * inv_inertia * lock
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_body(params: RigidBodyParams) -> RigidBody {
        RigidBody::new(
            Isometry::translation(0.0, 5.0, 0.0),
            Collider::sphere(Point::origin(), 0.5),
            params,
        )
    }

    #[test]
    fn free_fall() {
        let mut body = ball_body(RigidBodyParams {
            linear_drag: 0.0,
            ..Default::default()
        });
        for _ in 0..30 {
            body.integrate(1.0 / 60.0);
        }
        assert_relative_eq!(body.linvel().y, -4.9, epsilon = 1.0e-3);
        assert!(body.position().translation.y < 5.0);
        assert_relative_eq!(
            body.world_collider().center(),
            Point::from(body.position().translation.vector),
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn large_steps_are_clamped() {
        let mut a = ball_body(RigidBodyParams::default());
        let mut b = a.clone();
        a.integrate(1.0);
        b.integrate(MAX_DELTA_TIME);
        assert_eq!(a.position(), b.position());
    }

    #[test]
    fn mass_is_clamped() {
        let body = ball_body(RigidBodyParams {
            mass: 0.0,
            ..Default::default()
        });
        assert_eq!(body.mass(), MIN_MASS);
    }

    #[test]
    fn kinematic_bodies_do_not_move() {
        let mut body = ball_body(RigidBodyParams {
            kinematic: true,
            ..Default::default()
        });
        body.apply_impulse(Vector::new(10.0, 0.0, 0.0));
        body.integrate(1.0 / 60.0);
        assert_eq!(body.inv_mass(), 0.0);
        assert_eq!(*body.world_inv_inertia(), Matrix::zeros());
        assert_eq!(*body.linvel(), Vector::zeros());
        assert_relative_eq!(body.position().translation.y, 5.0);
    }

    #[test]
    fn falls_asleep_once_and_wakes_up() {
        let mut body = ball_body(RigidBodyParams {
            use_gravity: false,
            ..Default::default()
        });
        let dt = 1.0 / 60.0;
        let mut transitions = 0;
        for _ in 0..120 {
            let was_sleeping = body.is_sleeping();
            body.integrate(dt);
            if !was_sleeping && body.is_sleeping() {
                transitions += 1;
            }
        }
        assert_eq!(transitions, 1);
        assert!(body.is_sleeping());

        let pos = *body.position();
        body.integrate(dt);
        assert_eq!(*body.position(), pos);

        body.apply_impulse(Vector::new(0.0, 0.0, 1.0));
        assert!(!body.is_sleeping());
        assert_relative_eq!(body.linvel().z, 1.0, epsilon = 1.0e-6);
    }

    #[test]
    fn waking_an_awake_body_changes_nothing() {
        let mut body = ball_body(RigidBodyParams::default());
        body.set_linvel(Vector::new(1.0, 2.0, 3.0));
        let before = body.clone();
        body.wake_up();
        assert_eq!(body.linvel(), before.linvel());
        assert_eq!(body.position(), before.position());
    }

    #[test]
    fn locked_axes_are_respected() {
        let mut body = ball_body(RigidBodyParams {
            locked_axes: LockedAxes::TRANSLATION_LOCKED_Y | LockedAxes::ROTATION_LOCKED,
            ..Default::default()
        });
        body.apply_impulse_at_point(Vector::new(1.0, 1.0, 0.0), &Point::new(0.0, 5.5, 0.0));
        body.integrate(1.0 / 60.0);
        assert_eq!(body.linvel().y, 0.0);
        assert_eq!(*body.angvel(), AngVector::zeros());
        assert_relative_eq!(body.position().translation.y, 5.0);
        assert!(body.linvel().x > 0.0);
    }

    #[test]
    fn rotation_per_step_is_bounded() {
        let mut body = ball_body(RigidBodyParams {
            use_gravity: false,
            angular_drag: 0.0,
            max_angular_velocity: 1000.0,
            ..Default::default()
        });
        body.set_angvel(Vector::new(0.0, 500.0, 0.0));
        body.integrate(MAX_DELTA_TIME);
        assert!(body.position().rotation.angle() <= MAX_ROTATION_PER_FRAME + 1.0e-5);
    }

    #[test]
    fn siblings_ignore_each_other_for_a_while() {
        let mut a = ball_body(RigidBodyParams::default());
        let mut b = ball_body(RigidBodyParams::default());
        a.set_generation(3, 0.1);
        b.set_generation(3, 0.1);
        assert!(a.ignores_collision_with(&b));

        for _ in 0..10 {
            a.integrate(1.0 / 60.0);
            b.integrate(1.0 / 60.0);
        }
        assert!(!a.ignores_collision_with(&b));
    }
}
