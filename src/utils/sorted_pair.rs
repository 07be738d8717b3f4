/// A pair of elements sorted in increasing order.
///
/// Used as a key for undirected edges: `SortedPair::new(a, b) == SortedPair::new(b, a)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SortedPair<T: PartialOrd>([T; 2]);

impl<T: PartialOrd> SortedPair<T> {
    /// Sorts two elements in increasing order into a new pair.
    pub fn new(element1: T, element2: T) -> Self {
        if element1 > element2 {
            SortedPair([element2, element1])
        } else {
            SortedPair([element1, element2])
        }
    }

    /// The smallest element of the pair.
    #[inline]
    pub fn min(&self) -> &T {
        &self.0[0]
    }

    /// The largest element of the pair.
    #[inline]
    pub fn max(&self) -> &T {
        &self.0[1]
    }

    /// Returns the elements in increasing order.
    #[inline]
    pub fn into_inner(self) -> [T; 2] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_does_not_matter() {
        assert_eq!(SortedPair::new(3u32, 1), SortedPair::new(1, 3));
        assert_eq!(*SortedPair::min(&SortedPair::new(3u32, 1)), 1);
        assert_eq!(*SortedPair::max(&SortedPair::new(3u32, 1)), 3);
    }
}
