use crate::dynamics::{
    solve_collision, PhysicsModel, PhysicsModelConfig, RigidBodyParams, StaticWorld,
};
use crate::math::{Isometry, Point, Real, Vector};
use crate::mesh::SharedModel;
use crate::query::{Ray, RayCast};
use crate::shape::{ColliderType, Plane};
use crate::slicing::{SliceResult, SliceTaskError, SliceTaskManager, SliceTaskManagerConfig};
use crate::utils::hashmap::HashMap;
use slab::Slab;

/// The handle of a prop inside a [`PropManager`].
///
/// The slot of a removed prop is reused by props inserted later, but with a
/// different generation: handles of removed props stay invalid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PropHandle {
    index: usize,
    generation: u32,
}

impl PropHandle {
    /// The slot of the prop in the pool.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The generation distinguishing the successive props stored in the same slot.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Errors returned when a slice cannot be requested.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum PropError {
    /// No live prop has this handle.
    #[error("no live prop with handle {0:?}.")]
    InvalidHandle(PropHandle),
    /// The prop is already being sliced.
    #[error("the prop {0:?} is already being sliced.")]
    SliceInProgress(PropHandle),
    /// The slice task manager refused the request.
    #[error(transparent)]
    Task(#[from] SliceTaskError),
}

/// A sliceable object of the scene.
#[derive(Clone, Debug)]
pub struct Prop {
    model: PhysicsModel,
    pending_slice: Option<u64>,
    generation: u32,
}

impl Prop {
    /// The simulated model.
    #[inline]
    pub fn model(&self) -> &PhysicsModel {
        &self.model
    }

    /// The simulated model, mutably.
    #[inline]
    pub fn model_mut(&mut self) -> &mut PhysicsModel {
        &mut self.model
    }

    /// The id of the slice request issued for this prop, if it has not completed yet.
    #[inline]
    pub fn pending_slice(&self) -> Option<u64> {
        self.pending_slice
    }
}

/// A completed slice: `parent` was replaced by `front` and `back`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlicedProp {
    /// The handle of the prop that was sliced. It is no longer valid.
    pub parent: PropHandle,
    /// The fragment on the positive side of the plane.
    pub front: PropHandle,
    /// The fragment on the negative side of the plane.
    pub back: PropHandle,
}

/// What happened during one [`PropManager::update`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The props replaced by their fragments.
    pub sliced: Vec<SlicedProp>,
    /// The number of slice results that did not produce fragments.
    pub failed_slices: usize,
    /// The number of body-body contacts resolved.
    pub contacts: usize,
    /// The dead props removed at the end of the frame.
    pub removed: Vec<PropHandle>,
}

/// A pool of sliceable props colliding with each other and with a static world.
///
/// Slices are executed by a [`SliceTaskManager`] and applied during the next
/// [`update`](Self::update) following their completion. Body pairs are tested
/// by brute force.
pub struct PropManager {
    props: Slab<Prop>,
    world: StaticWorld,
    tasks: SliceTaskManager,
    config: PhysicsModelConfig,
    pending: HashMap<u64, PropHandle>,
    next_handle_generation: u32,
    next_sibling_generation: u32,
}

impl PropManager {
    /// Creates an empty pool and starts its slicing workers.
    pub fn new(
        world: StaticWorld,
        config: PhysicsModelConfig,
        task_config: SliceTaskManagerConfig,
    ) -> Result<Self, SliceTaskError> {
        Ok(PropManager {
            props: Slab::new(),
            world,
            tasks: SliceTaskManager::start(task_config)?,
            config,
            pending: HashMap::default(),
            next_handle_generation: 0,
            next_sibling_generation: 1,
        })
    }

    /// The static world the props collide with.
    #[inline]
    pub fn world(&self) -> &StaticWorld {
        &self.world
    }

    /// The static world the props collide with, mutably.
    #[inline]
    pub fn world_mut(&mut self) -> &mut StaticWorld {
        &mut self.world
    }

    /// The parameters of the fragments.
    #[inline]
    pub fn config(&self) -> &PhysicsModelConfig {
        &self.config
    }

    /// The slice task manager.
    #[inline]
    pub fn tasks(&self) -> &SliceTaskManager {
        &self.tasks
    }

    /// Creates a prop from a model and returns its handle.
    pub fn spawn(
        &mut self,
        model: SharedModel,
        position: Isometry<Real>,
        scale: Vector<Real>,
        collider_type: ColliderType,
        params: RigidBodyParams,
    ) -> PropHandle {
        self.insert(PhysicsModel::new(
            model,
            position,
            scale,
            collider_type,
            params,
        ))
    }

    /// Adds a model to the pool and returns its handle.
    pub fn insert(&mut self, model: PhysicsModel) -> PropHandle {
        let generation = self.next_handle_generation;
        self.next_handle_generation = self.next_handle_generation.wrapping_add(1);
        let index = self.props.insert(Prop {
            model,
            pending_slice: None,
            generation,
        });
        PropHandle { index, generation }
    }

    /// Removes a prop. A slice in flight for this prop is discarded when it completes.
    pub fn remove(&mut self, handle: PropHandle) -> Option<PhysicsModel> {
        let _ = self.get(handle)?;
        let prop = self.props.try_remove(handle.index)?;
        if let Some(id) = prop.pending_slice {
            let _ = self.pending.remove(&id);
        }
        Some(prop.model)
    }

    /// The prop with this handle.
    #[inline]
    pub fn get(&self, handle: PropHandle) -> Option<&Prop> {
        self.props
            .get(handle.index)
            .filter(|prop| prop.generation == handle.generation)
    }

    /// The prop with this handle, mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: PropHandle) -> Option<&mut Prop> {
        self.props
            .get_mut(handle.index)
            .filter(|prop| prop.generation == handle.generation)
    }

    /// The number of props.
    #[inline]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Is this pool empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterates through all the props.
    pub fn iter(&self) -> impl Iterator<Item = (PropHandle, &Prop)> {
        self.props.iter().map(|(index, prop)| {
            let handle = PropHandle {
                index,
                generation: prop.generation,
            };
            (handle, prop)
        })
    }

    /// Asks the workers to slice a prop along a world-space plane.
    ///
    /// A prop can only have one slice in flight.
    pub fn request_slice(&mut self, handle: PropHandle, plane: Plane) -> Result<u64, PropError> {
        let prop = self
            .props
            .get_mut(handle.index)
            .filter(|prop| prop.generation == handle.generation && !prop.model.is_dead())
            .ok_or(PropError::InvalidHandle(handle))?;
        if prop.pending_slice.is_some() {
            return Err(PropError::SliceInProgress(handle));
        }

        let id = self.tasks.enqueue_slice(prop.model.slice_request(plane))?;
        prop.pending_slice = Some(id);
        let _ = self.pending.insert(id, handle);
        Ok(id)
    }

    /// Applies the completed slices, steps every prop and removes the dead ones.
    pub fn update(&mut self, dt: Real) -> FrameReport {
        let mut report = FrameReport::default();

        for result in self.tasks.drain_completed_results() {
            self.apply_slice_result(result, &mut report);
        }

        for (_, prop) in self.props.iter_mut() {
            prop.model.update(dt, &self.world);
        }

        let keys: Vec<usize> = self.props.iter().map(|(i, _)| i).collect();
        for (n, ka) in keys.iter().enumerate() {
            for kb in &keys[n + 1..] {
                if let Some((a, b)) = self.props.get2_mut(*ka, *kb) {
                    if a.model.is_dead() || b.model.is_dead() {
                        continue;
                    }
                    if solve_collision(a.model.body_mut(), b.model.body_mut()).is_some() {
                        report.contacts += 1;
                    }
                }
            }
        }

        let pending = &mut self.pending;
        let removed = &mut report.removed;
        self.props.retain(|index, prop| {
            if !prop.model.is_dead() {
                return true;
            }
            if let Some(id) = prop.pending_slice {
                let _ = pending.remove(&id);
            }
            removed.push(PropHandle {
                index,
                generation: prop.generation,
            });
            false
        });

        report
    }

    fn apply_slice_result(&mut self, result: SliceResult, report: &mut FrameReport) {
        let handle = match self.pending.remove(&result.request_id) {
            Some(handle) => handle,
            // The prop was removed in the meantime.
            None => return,
        };
        let parent = match self.props.get_mut(handle.index) {
            Some(prop)
                if prop.generation == handle.generation
                    && prop.pending_slice == Some(result.request_id) =>
            {
                prop
            }
            _ => return,
        };
        parent.pending_slice = None;

        if parent.model.is_dead() {
            return;
        }

        let generation = self.next_sibling_generation;
        let (mut front, mut back) =
            match PhysicsModel::from_slice_result(&result, &self.config, generation) {
                Some(fragments) => fragments,
                None => {
                    if let Err(e) = &result.output {
                        log::debug!("slice {} left the prop intact: {}", result.request_id, e);
                    }
                    report.failed_slices += 1;
                    return;
                }
            };
        self.next_sibling_generation = self.next_sibling_generation.wrapping_add(1).max(1);

        // The parent kept moving while the slice was computed.
        let motion = parent.model.body().position() * result.body.position.inverse();
        for fragment in [&mut front, &mut back] {
            let body = fragment.body_mut();
            let position = motion * body.position();
            body.set_position(position);
            let linvel = motion.rotation * body.linvel();
            body.set_linvel(linvel);
        }

        let front = self.insert(front);
        let back = self.insert(back);
        let _ = self.props.try_remove(handle.index);
        report.sliced.push(SlicedProp {
            parent: handle,
            front,
            back,
        });
    }

    /// The closest live prop hit by `ray`, with the time of impact.
    ///
    /// Props hidden behind the static world are not picked.
    pub fn pick(&self, ray: &Ray, max_toi: Real) -> Option<(PropHandle, Real)> {
        let max_toi = self
            .world
            .cast_ray(ray, max_toi)
            .map(|(_, toi)| toi)
            .unwrap_or(max_toi);

        self.props
            .iter()
            .filter(|(_, prop)| !prop.model.is_dead())
            .filter_map(|(index, prop)| {
                let handle = PropHandle {
                    index,
                    generation: prop.generation,
                };
                prop.model
                    .body()
                    .world_collider()
                    .cast_ray(ray, max_toi, true)
                    .map(|toi| (handle, toi))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal))
    }

    /// Stops the slicing workers. Slices in flight are forgotten.
    pub fn shutdown(&mut self) {
        self.tasks.finalize();
        self.pending.clear();
        for (_, prop) in self.props.iter_mut() {
            prop.pending_slice = None;
        }
    }
}

/// The plane swept by a blade moving from `start` to `end`, seen along `view_dir`.
///
/// The plane contains the swing and the view direction. Returns `None` if they are parallel.
pub fn cutting_plane_from_swing(
    start: &Point<Real>,
    end: &Point<Real>,
    view_dir: &Vector<Real>,
) -> Option<Plane> {
    let normal = (end - start).cross(view_dir);
    Plane::from_point_normal(start, &normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::cuboid_mesh;
    use crate::mesh::Model;
    use std::time::{Duration, Instant};

    fn manager() -> PropManager {
        PropManager::new(
            StaticWorld::with_ground(0.0, 20.0),
            PhysicsModelConfig::default(),
            SliceTaskManagerConfig {
                worker_count: 1,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn spawn_cube(manager: &mut PropManager, x: Real) -> PropHandle {
        let model = Model::from_mesh(cuboid_mesh(&Vector::repeat(0.5), 0)).into_shared();
        manager.spawn(
            model,
            Isometry::translation(x, 0.5, 0.0),
            Vector::repeat(1.0),
            ColliderType::Obb,
            RigidBodyParams::default(),
        )
    }

    fn update_until_sliced(manager: &mut PropManager) -> FrameReport {
        let start = Instant::now();
        loop {
            let report = manager.update(1.0 / 60.0);
            if !report.sliced.is_empty() || report.failed_slices > 0 {
                return report;
            }
            assert!(start.elapsed() < Duration::from_secs(10));
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn swing_plane_contains_the_swing() {
        let plane = cutting_plane_from_swing(
            &Point::new(-1.0, 1.0, 0.0),
            &Point::new(1.0, 1.0, 0.0),
            &Vector::new(0.0, 0.0, -1.0),
        )
        .unwrap();
        assert_relative_eq!(plane.normal.y.abs(), 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(plane.signed_distance(&Point::new(0.0, 1.0, 5.0)), 0.0);
        assert!(cutting_plane_from_swing(&Point::origin(), &Point::new(0.0, 0.0, 1.0), &Vector::z()).is_none());
    }

    #[test]
    fn sliced_prop_is_replaced_by_two_fragments() {
        let mut manager = manager();
        let handle = spawn_cube(&mut manager, 0.0);
        let plane = Plane::from_point_normal(&Point::new(0.0, 0.5, 0.0), &Vector::x()).unwrap();

        let _ = manager.request_slice(handle, plane).unwrap();
        assert_eq!(
            manager.request_slice(handle, plane),
            Err(PropError::SliceInProgress(handle))
        );

        let report = update_until_sliced(&mut manager);
        assert_eq!(report.sliced.len(), 1);
        assert_eq!(report.sliced[0].parent, handle);
        assert_eq!(manager.len(), 2);

        // The parent handle does not alias a fragment.
        assert!(manager.get(handle).is_none());
        assert_ne!(report.sliced[0].front, handle);
        assert_ne!(report.sliced[0].back, handle);
        assert_eq!(
            manager.request_slice(handle, plane),
            Err(PropError::InvalidHandle(handle))
        );
        assert!(manager.remove(handle).is_none());
        assert_eq!(manager.len(), 2);

        let front = manager.get(report.sliced[0].front).unwrap().model();
        let back = manager.get(report.sliced[0].back).unwrap().model();
        assert!(front.body().position().translation.x > back.body().position().translation.x);
        assert_relative_eq!(front.volume() + back.volume(), 1.0, epsilon = 1.0e-3);
    }

    #[test]
    fn missed_slices_leave_the_prop_intact() {
        let mut manager = manager();
        let handle = spawn_cube(&mut manager, 0.0);
        let plane = Plane::from_point_normal(&Point::new(5.0, 0.0, 0.0), &Vector::x()).unwrap();
        let _ = manager.request_slice(handle, plane).unwrap();

        let report = update_until_sliced(&mut manager);
        assert_eq!(report.failed_slices, 1);
        assert_eq!(manager.len(), 1);
        assert!(manager.get(handle).unwrap().pending_slice().is_none());
    }

    #[test]
    fn dead_props_are_removed() {
        let mut manager = manager();
        let a = spawn_cube(&mut manager, 0.0);
        let b = spawn_cube(&mut manager, 3.0);
        manager.get_mut(a).unwrap().model_mut().kill();

        let report = manager.update(1.0 / 60.0);
        assert_eq!(report.removed, vec![a]);
        assert!(manager.get(a).is_none());
        assert!(manager.get(b).is_some());
        assert_eq!(
            manager.request_slice(a, Plane::new(Vector::x_axis(), 0.0)),
            Err(PropError::InvalidHandle(a))
        );
    }

    #[test]
    fn reused_slots_get_new_handles() {
        let mut manager = manager();
        let a = spawn_cube(&mut manager, 0.0);
        assert!(manager.remove(a).is_some());
        let b = spawn_cube(&mut manager, 0.0);

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(manager.get(a).is_none());
        assert!(manager.get_mut(a).is_none());
        assert!(manager.remove(a).is_none());
        assert!(manager.get(b).is_some());
        assert_eq!(manager.iter().map(|(h, _)| h).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn picking_returns_the_closest_prop() {
        let mut manager = manager();
        let _far = spawn_cube(&mut manager, 5.0);
        let near = spawn_cube(&mut manager, 2.0);
        let ray = Ray::new(Point::new(0.0, 0.5, 0.0), Vector::x());
        let (hit, toi) = manager.pick(&ray, 100.0).unwrap();
        assert_eq!(hit, near);
        assert_relative_eq!(toi, 1.5, epsilon = 1.0e-4);

        let down = Ray::new(Point::new(10.0, 5.0, 0.0), -Vector::y());
        assert!(manager.pick(&down, 100.0).is_none());
    }
}
