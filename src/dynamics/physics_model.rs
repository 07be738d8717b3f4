use crate::dynamics::consts::MIN_MASS;
use crate::dynamics::{RigidBody, RigidBodyParams, StaticWorld};
use crate::math::{Isometry, Real, Translation, Vector};
use crate::mesh::{Model, ModelTransform, SharedModel};
use crate::shape::{Collider, ColliderType, Plane};
use crate::slicing::{BodySnapshot, SliceRequest, SliceResult};
use std::sync::Arc;

/// The parameters of the fragments produced by slicing a [`PhysicsModel`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PhysicsModelConfig {
    /// The parameters of the fragment bodies. Their mass is replaced by the
    /// share of the parent mass matching the fragment volume.
    pub body_params: RigidBodyParams,
    /// Fragments whose volume is smaller than this fraction of the root volume
    /// shrink and disappear right away.
    pub death_volume_ratio: Real,
    /// The lifetime of every other fragment, or `None` to keep them forever.
    pub fragment_lifetime: Option<Real>,
    /// The time a dying fragment takes to shrink to nothing.
    pub shrink_duration: Real,
    /// The speed at which both halves move away from the cutting plane.
    pub separation_speed: Real,
    /// The time during which both halves of a slice ignore each other.
    pub sibling_ignore_time: Real,
}

impl Default for PhysicsModelConfig {
    fn default() -> Self {
        PhysicsModelConfig {
            body_params: RigidBodyParams::default(),
            death_volume_ratio: 0.05,
            fragment_lifetime: Some(5.0),
            shrink_duration: 1.0,
            separation_speed: 1.5,
            sibling_ignore_time: 0.2,
        }
    }
}

/// A countdown after which a model is destroyed.
///
/// During the last `shrink_duration` seconds the model is scaled down linearly.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AutoDestroy {
    /// The time left before destruction.
    pub remaining: Real,
    /// The length of the final shrinking phase.
    pub shrink_duration: Real,
}

impl AutoDestroy {
    /// A countdown of `lifetime` seconds.
    pub fn new(lifetime: Real, shrink_duration: Real) -> Self {
        AutoDestroy {
            remaining: lifetime.max(0.0),
            shrink_duration: shrink_duration.max(0.0),
        }
    }

    /// Advances the countdown. Returns `true` once it has expired.
    pub fn tick(&mut self, dt: Real) -> bool {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        self.is_expired()
    }

    /// Has the countdown expired?
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// The factor in `[0, 1]` the model scale is multiplied by.
    pub fn scale_factor(&self) -> Real {
        if self.remaining >= self.shrink_duration {
            1.0
        } else {
            (self.remaining / self.shrink_duration).clamp(0.0, 1.0)
        }
    }
}

/// A rigid body driving a shared model.
///
/// The body-space of the rigid body is the model-space scaled by `scale`.
#[derive(Clone, Debug)]
pub struct PhysicsModel {
    body: RigidBody,
    model: SharedModel,
    scale: Vector<Real>,
    collider_type: ColliderType,
    root_volume: Real,
    auto_destroy: Option<AutoDestroy>,
    dead: bool,
}

impl PhysicsModel {
    /// Places `model` in the world with a collider of type `collider_type`
    /// fitted to its scaled bounding box.
    pub fn new(
        model: SharedModel,
        position: Isometry<Real>,
        scale: Vector<Real>,
        collider_type: ColliderType,
        params: RigidBodyParams,
    ) -> Self {
        let collider = Collider::fit_to_aabb(collider_type, &model.local_aabb.scaled(&scale));
        let body = RigidBody::new(position, collider, params);
        let root_volume = model.volume() * scale_determinant(&scale);

        PhysicsModel {
            body,
            model,
            scale,
            collider_type,
            root_volume,
            auto_destroy: None,
            dead: false,
        }
    }

    /// The rigid body.
    #[inline]
    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    /// The rigid body, mutably.
    #[inline]
    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    /// The model.
    #[inline]
    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    /// The scale of the model, ignoring the auto-destroy shrink.
    #[inline]
    pub fn scale(&self) -> &Vector<Real> {
        &self.scale
    }

    /// The scale the model is currently drawn with.
    pub fn current_scale(&self) -> Vector<Real> {
        self.scale * self.shrink_factor()
    }

    fn shrink_factor(&self) -> Real {
        self.auto_destroy
            .map(|ad| ad.scale_factor())
            .unwrap_or(1.0)
    }

    /// The type of collider fitted to the model.
    #[inline]
    pub fn collider_type(&self) -> ColliderType {
        self.collider_type
    }

    /// The volume of the object this model was cut from.
    #[inline]
    pub fn root_volume(&self) -> Real {
        self.root_volume
    }

    /// The world-space volume of the model.
    pub fn volume(&self) -> Real {
        self.model.volume() * scale_determinant(&self.scale)
    }

    /// The auto-destroy countdown, if any.
    #[inline]
    pub fn auto_destroy(&self) -> Option<&AutoDestroy> {
        self.auto_destroy.as_ref()
    }

    /// Starts (or restarts) the auto-destroy countdown.
    pub fn set_auto_destroy(&mut self, auto_destroy: Option<AutoDestroy>) {
        self.auto_destroy = auto_destroy;
        self.refit_collider();
    }

    /// The placement of the model in the world.
    pub fn transform(&self) -> ModelTransform {
        ModelTransform::new(*self.body.position(), self.current_scale())
    }

    /// Should this model be removed by its owner?
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Marks this model for removal.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Steps the body, collides it with `world` and advances the auto-destroy countdown.
    pub fn update(&mut self, dt: Real, world: &StaticWorld) {
        if self.dead {
            return;
        }

        self.body.integrate(dt);
        let _ = world.solve(&mut self.body);

        if let Some(auto_destroy) = &mut self.auto_destroy {
            let before = auto_destroy.scale_factor();
            if auto_destroy.tick(dt) {
                log::trace!(
                    "Auto-destroying a fragment of volume {} at {:?}.",
                    self.volume(),
                    self.body.position().translation.vector
                );
                self.dead = true;
            } else if auto_destroy.scale_factor() != before {
                self.refit_collider();
            }
        }
    }

    /// The state of the body, as carried by slice requests.
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            position: *self.body.position(),
            linvel: *self.body.linvel(),
            angvel: *self.body.angvel(),
            center_of_mass: self.body.center_of_mass(),
            mass: self.body.mass(),
            volume: self.volume(),
            root_volume: self.root_volume,
            collider_type: self.collider_type,
        }
    }

    /// A request to slice this model along the world-space plane `plane`.
    pub fn slice_request(&self, plane: Plane) -> SliceRequest {
        SliceRequest {
            model: Arc::clone(&self.model),
            transform: self.transform(),
            plane,
            body: self.snapshot(),
        }
    }

    /// Builds the two fragments of a successful slice.
    ///
    /// Both halves are recentered on their centroid and keep the placement of
    /// the original model. They share the parent's mass according to their
    /// volumes, inherit its velocity at their new center, and move apart along
    /// the cutting plane normal. The front half is returned first.
    ///
    /// Returns `None` if the slice failed.
    pub fn from_slice_result(
        result: &SliceResult,
        config: &PhysicsModelConfig,
        generation: u32,
    ) -> Option<(PhysicsModel, PhysicsModel)> {
        let output = result.output.as_ref().ok()?;
        let front = Model::new(output.front.clone());
        let back = Model::new(output.back.clone());
        if front.is_empty() || back.is_empty() {
            return None;
        }

        let det = scale_determinant(&result.transform.scale);
        let front_volume = front.volume() * det;
        let back_volume = back.volume() * det;
        let total_volume = front_volume + back_volume;
        let front_share = if total_volume > crate::math::DEFAULT_EPSILON {
            front_volume / total_volume
        } else {
            0.5
        };

        let root_volume = if result.body.root_volume > 0.0 {
            result.body.root_volume
        } else {
            result.body.volume
        };
        let normal = result.plane.normal.into_inner();
        let half_speed = config.separation_speed / 2.0;

        let build = |model: Model, share: Real, dir: Real| {
            let (model, shift) = model.recentered();
            let transform = &result.transform;
            let rotation = transform.position.rotation;
            let offset = rotation * shift.component_mul(&transform.scale);
            let position = Isometry::from_parts(
                Translation::from(transform.position.translation.vector + offset),
                rotation,
            );

            let params = RigidBodyParams {
                mass: (result.body.mass * share).max(MIN_MASS),
                ..config.body_params
            };
            let mut fragment = PhysicsModel::new(
                model.into_shared(),
                position,
                transform.scale,
                result.body.collider_type,
                params,
            );
            fragment.root_volume = root_volume;

            let arm = fragment.body.center_of_mass() - result.body.center_of_mass;
            let linvel = result.body.linvel
                + result.body.angvel.cross(&arm)
                + normal * (half_speed * dir);
            fragment.body.set_linvel(linvel);
            fragment.body.set_angvel(result.body.angvel);
            fragment
                .body
                .set_generation(generation, config.sibling_ignore_time);

            let lifetime = if fragment.volume() < root_volume * config.death_volume_ratio {
                Some(config.shrink_duration)
            } else {
                config.fragment_lifetime
            };
            if let Some(lifetime) = lifetime {
                fragment.set_auto_destroy(Some(AutoDestroy::new(lifetime, config.shrink_duration)));
            }
            fragment
        };

        let front = build(front, front_share, 1.0);
        let back = build(back, 1.0 - front_share, -1.0);
        Some((front, back))
    }

    // The shrink is applied around the model origin, like the rendered mesh.
    fn refit_collider(&mut self) {
        let fitted = Collider::fit_to_aabb(self.collider_type, &self.model.local_aabb.scaled(&self.scale));
        let collider = fitted.scaled(&Vector::repeat(self.shrink_factor()));
        self.body.set_collider(collider);
    }
}

fn scale_determinant(scale: &Vector<Real>) -> Real {
    (scale.x * scale.y * scale.z).abs()
}
