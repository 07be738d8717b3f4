use crate::bounding_volume::Aabb;
use crate::math::{Real, DIM};
use crate::query::{Ray, RayCast};

impl RayCast for Aabb {
    fn line_interval(&self, ray: &Ray) -> Option<(Real, Real)> {
        let mut tmin: Real = -Real::MAX;
        let mut tmax: Real = Real::MAX;

        for i in 0usize..DIM {
            if ray.dir[i] == 0.0 {
                if ray.origin[i] < self.mins[i] || ray.origin[i] > self.maxs[i] {
                    return None;
                }
            } else {
                let denom = 1.0 / ray.dir[i];
                let mut inter_with_near_halfspace = (self.mins[i] - ray.origin[i]) * denom;
                let mut inter_with_far_halfspace = (self.maxs[i] - ray.origin[i]) * denom;

                if inter_with_near_halfspace > inter_with_far_halfspace {
                    core::mem::swap(
                        &mut inter_with_near_halfspace,
                        &mut inter_with_far_halfspace,
                    )
                }

                tmin = tmin.max(inter_with_near_halfspace);
                tmax = tmax.min(inter_with_far_halfspace);

                if tmin > tmax {
                    return None;
                }
            }
        }

        Some((tmin, tmax))
    }
}
