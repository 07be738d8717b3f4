use crate::math::{Real, DEFAULT_EPSILON};

/// The inverse of `val`, or zero if `val` is (almost) zero.
pub fn inv(val: Real) -> Real {
    if val.abs() <= DEFAULT_EPSILON {
        0.0
    } else {
        1.0 / val
    }
}
