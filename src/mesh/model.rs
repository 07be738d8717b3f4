use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Vector};
use crate::mesh::MeshData;
use crate::shape::Plane;
use na::Unit;
use std::sync::Arc;

/// A model shared between the main thread and the slicing workers.
///
/// A model is never mutated once shared: slicing always produces new models.
pub type SharedModel = Arc<Model>;

/// A renderable model: a set of sub-meshes expressed in the model's local space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Model {
    /// The sub-meshes of this model, usually one per material.
    pub meshes: Vec<MeshData>,
    /// The local-space bounding box of all the sub-meshes.
    pub local_aabb: Aabb,
}

impl Model {
    /// Creates a model and computes its bounding box.
    pub fn new(meshes: Vec<MeshData>) -> Self {
        let mut local_aabb = Aabb::new_invalid();
        for mesh in &meshes {
            for v in &mesh.vertices {
                local_aabb.take_point(v.position);
            }
        }

        if !local_aabb.is_valid() {
            local_aabb = Aabb::new(Point::origin(), Point::origin());
        }

        Model { meshes, local_aabb }
    }

    /// A model made of a single mesh.
    pub fn from_mesh(mesh: MeshData) -> Self {
        Self::new(vec![mesh])
    }

    /// Wraps this model into a [`SharedModel`].
    pub fn into_shared(self) -> SharedModel {
        Arc::new(self)
    }

    /// Does this model have no triangle at all?
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(|m| m.is_empty())
    }

    /// The total number of triangles of this model.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }

    /// The volume enclosed by this model.
    ///
    /// The sub-meshes only need to be closed together. The absolute value is
    /// returned so that inside-out models still get a usable mass.
    pub fn volume(&self) -> Real {
        let reference = self.local_aabb.center();
        let total: Real = self
            .meshes
            .iter()
            .map(|m| m.volume_moments(&reference).0)
            .sum();
        total.abs() / 6.0
    }

    /// The centroid of the volume enclosed by all the sub-meshes.
    pub fn centroid(&self) -> Point<Real> {
        let reference = self.local_aabb.center();
        let mut weighted = Vector::zeros();
        let mut total = 0.0;

        for mesh in &self.meshes {
            let (vol, moment) = mesh.volume_moments(&reference);
            weighted += moment;
            total += vol;
        }

        if total.abs() > crate::math::DEFAULT_EPSILON {
            reference + weighted / (total * 4.0)
        } else {
            reference
        }
    }

    /// A copy of this model translated so that its centroid lies at the origin.
    ///
    /// Also returns the local-space position of the old centroid, i.e., the
    /// translation to apply to the model's placement so that it does not move.
    pub fn recentered(&self) -> (Model, Vector<Real>) {
        let shift = self.centroid().coords;
        let meshes = self
            .meshes
            .iter()
            .map(|mesh| {
                let mut mesh = mesh.clone();
                mesh.translate(&-shift);
                mesh
            })
            .collect();
        (Model::new(meshes), shift)
    }
}

/// The placement of a model in the world: a non-uniform scale followed by a rigid motion.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ModelTransform {
    /// The rigid part of the placement.
    pub position: Isometry<Real>,
    /// The scale applied in the model's local space.
    pub scale: Vector<Real>,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ModelTransform {
    /// Creates a new model placement.
    pub fn new(position: Isometry<Real>, scale: Vector<Real>) -> Self {
        ModelTransform { position, scale }
    }

    /// The identity placement.
    pub fn identity() -> Self {
        Self::new(Isometry::identity(), Vector::repeat(1.0))
    }

    /// A placement without scaling.
    pub fn from_isometry(position: Isometry<Real>) -> Self {
        Self::new(position, Vector::repeat(1.0))
    }

    /// Maps a local-space point to world-space.
    #[inline]
    pub fn transform_point(&self, pt: &Point<Real>) -> Point<Real> {
        self.position * Point::from(pt.coords.component_mul(&self.scale))
    }

    /// Maps a world-space point to local-space.
    ///
    /// Scale components too close to zero are treated as if they were one.
    #[inline]
    pub fn inverse_transform_point(&self, pt: &Point<Real>) -> Point<Real> {
        let local = self.position.inverse_transform_point(pt);
        Point::from(local.coords.zip_map(&self.scale, |x, s| {
            if s.abs() > crate::math::DEFAULT_EPSILON {
                x / s
            } else {
                x
            }
        }))
    }

    /// Expresses a world-space plane in the model's local space.
    ///
    /// Returns `None` if the scale collapses the plane normal.
    pub fn world_plane_to_local(&self, plane: &Plane) -> Option<Plane> {
        let local_normal = self
            .position
            .rotation
            .inverse_transform_vector(&plane.normal)
            .component_mul(&self.scale);
        let bias = plane.bias - plane.normal.dot(&self.position.translation.vector);
        let (normal, norm) = Unit::try_new_and_get(local_normal, crate::math::DEFAULT_EPSILON)?;
        Some(Plane::new(normal, bias / norm))
    }

    /// Expresses a local-space plane in world-space.
    ///
    /// Returns `None` if the scale collapses the plane normal.
    pub fn local_plane_to_world(&self, plane: &Plane) -> Option<Plane> {
        let scaled = plane.normal.zip_map(&self.scale, |n, s| {
            if s.abs() > crate::math::DEFAULT_EPSILON {
                n / s
            } else {
                n
            }
        });
        let (local_normal, norm) = Unit::try_new_and_get(scaled, crate::math::DEFAULT_EPSILON)?;
        let normal = self.position.rotation * local_normal;
        let bias = plane.bias / norm + normal.dot(&self.position.translation.vector);
        Some(Plane::new(normal, bias))
    }
}
