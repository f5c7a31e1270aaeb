use core::cmp::PartialOrd;

/// A pair of elements sorted in increasing order.
///
/// Two pairs built from the same elements compare equal whatever the order the
/// elements were given in, which makes this a convenient key for unordered
/// relations such as collision exceptions.
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
    pub fn first(&self) -> &T {
        &self.0[0]
    }

    /// The largest element of the pair.
    pub fn second(&self) -> &T {
        &self.0[1]
    }

    /// Does either side of this pair equal `element`?
    pub fn contains(&self, element: &T) -> bool {
        self.0[0] == *element || self.0[1] == *element
    }
}

#[cfg(test)]
mod tests {
    use super::SortedPair;

    #[test]
    fn order_does_not_matter() {
        assert_eq!(SortedPair::new(3, 1), SortedPair::new(1, 3));
        let pair = SortedPair::new(7, 2);
        assert_eq!(*pair.first(), 2);
        assert_eq!(*pair.second(), 7);
        assert!(pair.contains(&7));
        assert!(!pair.contains(&3));
    }
}
