/// The result of a plane-splitting operation.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitResult<T> {
    /// The split operation yield two results: one lying on the negative half-space of the plane
    /// and the second lying on the positive half-space of the plane.
    Pair(T, T),
    /// The shape being split is fully contained in the negative half-space of the plane.
    Negative,
    /// The shape being split is fully contained in the positive half-space of the plane.
    Positive,
}

impl<T> SplitResult<T> {
    /// Converts into the `(negative, positive)` pair, if the shape was actually split.
    pub fn into_pair(self) -> Option<(T, T)> {
        match self {
            SplitResult::Pair(neg, pos) => Some((neg, pos)),
            _ => None,
        }
    }

    /// Is this the result of a shape crossed by the plane?
    pub fn is_pair(&self) -> bool {
        matches!(self, SplitResult::Pair(..))
    }
}

/// The location of a volume relative to a plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum PlaneSide {
    /// Entirely on the side the plane normal points to.
    Positive,
    /// Entirely on the side opposite to the plane normal.
    Negative,
    /// Crossed by the plane.
    Crossing,
}

impl PlaneSide {
    /// Classifies a signed distance against the tolerance band `[-epsilon, epsilon]`.
    ///
    /// Distances inside of the band are reported as `Crossing` (i.e. on the plane).
    #[inline]
    pub fn from_signed_distance(dist: crate::math::Real, epsilon: crate::math::Real) -> Self {
        if dist > epsilon {
            PlaneSide::Positive
        } else if dist < -epsilon {
            PlaneSide::Negative
        } else {
            PlaneSide::Crossing
        }
    }
}
