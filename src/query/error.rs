use core::fmt;

/// Error indicating that a geometric query is not supported between certain shape combinations.
///
/// The pair dispatcher returns this error for pairs without a narrow-phase
/// routine (two triangles). Callers that only care about overlapping pairs use
/// [`detect`](crate::query::detect), which maps this error to "no hit".
///
/// ```
/// use cleave3d::math::Point;
/// use cleave3d::query::{try_detect, Unsupported};
/// use cleave3d::shape::Collider;
///
/// let a = Collider::triangle(Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0));
/// let b = a;
/// assert_eq!(try_detect(&a, &b), Err(Unsupported));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Unsupported;

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("query not supported between these shapes")
    }
}

impl core::error::Error for Unsupported {}
