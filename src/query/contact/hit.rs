use crate::math::{Point, Real, UnitVector};

/// Geometric description of the overlap of two shapes `A` and `B`.
///
/// The normal points from `B` toward `A`: translating `A` by `normal * depth`
/// separates both shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Hit {
    /// The world-space contact normal, pointing from `B` toward `A`.
    pub normal: UnitVector<Real>,
    /// The penetration depth. Never negative.
    pub depth: Real,
    /// An approximate world-space contact point, used to apply torques.
    pub point: Point<Real>,
}

impl Hit {
    /// Creates a new hit, clamping `depth` to zero if it is negative.
    #[inline]
    pub fn new(normal: UnitVector<Real>, depth: Real, point: Point<Real>) -> Self {
        Hit {
            normal,
            depth: depth.max(0.0),
            point,
        }
    }

    /// The same hit described from the point of view of the other shape.
    #[inline]
    pub fn flipped(self) -> Self {
        Hit {
            normal: -self.normal,
            ..self
        }
    }
}
