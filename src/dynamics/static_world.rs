use crate::bounding_volume::Aabb;
use crate::dynamics::{solve_static_collision, RigidBody};
use crate::math::{Point, Real};
use crate::mesh::{MeshData, ModelTransform};
use crate::query::{Ray, RayCast};
use crate::shape::Collider;

/// The surface properties of an immovable collider.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct StaticMaterial {
    /// The restitution coefficient, averaged with the body's.
    pub restitution: Real,
    /// The friction coefficient, combined with the body's by geometric mean.
    pub friction: Real,
}

impl Default for StaticMaterial {
    fn default() -> Self {
        StaticMaterial {
            restitution: 0.2,
            friction: 0.6,
        }
    }
}

/// An immovable collider of the level.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct StaticCollider {
    /// The world-space shape.
    pub collider: Collider,
    /// The surface properties.
    pub material: StaticMaterial,
    aabb: Aabb,
}

impl StaticCollider {
    /// The bounding box of this collider.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }
}

/// The static geometry the rigid bodies collide with.
///
/// Every body is tested against every static collider whose bounding box it
/// overlaps: there is no acceleration structure.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct StaticWorld {
    colliders: Vec<StaticCollider>,
}

impl StaticWorld {
    /// An empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// A world made of a horizontal ground box whose top face is at `height`.
    pub fn with_ground(height: Real, half_extent: Real) -> Self {
        let mut world = Self::new();
        let _ = world.add(Collider::aabb(
            Point::new(-half_extent, height - 1.0, -half_extent),
            Point::new(half_extent, height, half_extent),
        ));
        world
    }

    /// Adds a collider with the default material and returns its index.
    pub fn add(&mut self, collider: Collider) -> usize {
        self.add_with_material(collider, StaticMaterial::default())
    }

    /// Adds a collider and returns its index.
    pub fn add_with_material(&mut self, collider: Collider, material: StaticMaterial) -> usize {
        self.colliders.push(StaticCollider {
            collider,
            material,
            aabb: collider.compute_aabb(),
        });
        self.colliders.len() - 1
    }

    /// Adds every triangle of a placed mesh. Returns the number of triangles added.
    pub fn add_mesh(
        &mut self,
        mesh: &MeshData,
        transform: &ModelTransform,
        material: StaticMaterial,
    ) -> usize {
        let mut added = 0;
        for tri in mesh.triangles() {
            let [a, b, c] = tri.vertices().map(|p| transform.transform_point(&p));
            // Flat triangles cannot produce a contact normal.
            if (b - a).cross(&(c - a)).norm_squared() > crate::math::DEFAULT_EPSILON {
                let _ = self.add_with_material(Collider::triangle(a, b, c), material);
                added += 1;
            }
        }
        added
    }

    /// The static colliders.
    #[inline]
    pub fn colliders(&self) -> &[StaticCollider] {
        &self.colliders
    }

    /// The number of static colliders.
    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Is this world empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Removes every collider.
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    /// Resolves the contacts between `body` and the static colliders.
    ///
    /// Returns the number of contacts resolved.
    pub fn solve(&self, body: &mut RigidBody) -> usize {
        if body.is_sleeping() {
            return 0;
        }

        let mut count = 0;
        for stat in &self.colliders {
            // The body moves while contacts are resolved.
            let body_aabb = body.world_collider().compute_aabb();
            if body_aabb.intersects(&stat.aabb)
                && solve_static_collision(body, &stat.collider, &stat.material).is_some()
            {
                count += 1;
            }
        }
        count
    }

    /// The first static collider hit by `ray`, with the time of impact.
    pub fn cast_ray(&self, ray: &Ray, max_toi: Real) -> Option<(usize, Real)> {
        self.colliders
            .iter()
            .enumerate()
            .filter_map(|(i, stat)| stat.collider.cast_ray(ray, max_toi, true).map(|toi| (i, toi)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal))
    }

    /// The union of the bounding boxes of every static collider.
    pub fn aabb(&self) -> Option<Aabb> {
        self.colliders
            .iter()
            .map(|stat| stat.aabb)
            .reduce(|a, b| a.merged(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::RigidBodyParams;
    use crate::math::{Isometry, Vector};
    use crate::mesh::primitives::cuboid_mesh;

    #[test]
    fn ball_comes_to_rest_on_the_ground() {
        let world = StaticWorld::with_ground(0.0, 10.0);
        let mut body = RigidBody::new(
            Isometry::translation(0.0, 2.0, 0.0),
            Collider::sphere(Point::origin(), 0.5),
            RigidBodyParams::default(),
        );

        for _ in 0..600 {
            body.integrate(1.0 / 60.0);
            let _ = world.solve(&mut body);
        }

        assert!(body.is_sleeping());
        let y = body.position().translation.y;
        assert!(y > 0.4 && y < 0.55, "{}", y);
    }

    #[test]
    fn ray_hits_the_closest_collider() {
        let mut world = StaticWorld::with_ground(0.0, 10.0);
        let ball = world.add(Collider::sphere(Point::new(0.0, 3.0, 0.0), 1.0));
        let ray = Ray::new(Point::new(0.0, 10.0, 0.0), -Vector::y());
        let (hit, toi) = world.cast_ray(&ray, 100.0).unwrap();
        assert_eq!(hit, ball);
        assert_relative_eq!(toi, 6.0, epsilon = 1.0e-4);
    }

    #[test]
    fn mesh_triangles_are_added() {
        let mut world = StaticWorld::new();
        let count = world.add_mesh(
            &cuboid_mesh(&Vector::repeat(1.0), 0),
            &ModelTransform::identity(),
            StaticMaterial::default(),
        );
        assert_eq!(count, 12);
        assert_eq!(world.len(), 12);
        assert_relative_eq!(world.aabb().unwrap().maxs, Point::new(1.0, 1.0, 1.0));
    }
}
