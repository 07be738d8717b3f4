use crate::math::{Real, Vector};

/// Scales `v` down so that its norm does not exceed `max`.
///
/// Vectors shorter than `max` are returned unchanged. A negative `max` is treated as zero.
#[inline]
pub fn clamp_magnitude(v: Vector<Real>, max: Real) -> Vector<Real> {
    let max = max.max(0.0);
    let sq_norm = v.norm_squared();
    if sq_norm > max * max {
        v * (max / sq_norm.sqrt())
    } else {
        v
    }
}
