use crate::math::Real;
use crate::query::{Ray, RayCast};
use crate::shape::Collider;

impl RayCast for Collider {
    fn line_interval(&self, ray: &Ray) -> Option<(Real, Real)> {
        match self {
            Collider::Sphere(s) => s.line_interval(ray),
            Collider::Obb(c) => c.line_interval(ray),
            Collider::Aabb(a) => a.line_interval(ray),
            Collider::Capsule(c) => c.line_interval(ray),
            Collider::Triangle(t) => t.line_interval(ray),
        }
    }
}
