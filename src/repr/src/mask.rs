//! Element masks for array-valued outputs.

/// Selects which elements of an array-valued output are live on a given
/// connection.
///
/// Most connections carry the entire output (`Mask::All`); a connection can
/// instead request a subset of elements, e.g. when multiple relationship
/// targets fan into a single aggregating input and each connection should
/// only see the elements it contributed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mask {
    /// All elements of the output are live.
    All,
    /// Only the elements at these indices are live, in ascending order.
    Indices(Vec<usize>),
}

impl Mask {
    /// Returns `true` if `index` is live under this mask.
    pub fn contains(&self, index: usize) -> bool {
        match self {
            Mask::All => true,
            Mask::Indices(indices) => indices.binary_search(&index).is_ok(),
        }
    }

    /// Returns the number of live elements, if this mask is not `All` (for
    /// `All` the element count depends on the output's own cardinality,
    /// which this crate does not track).
    pub fn explicit_len(&self) -> Option<usize> {
        match self {
            Mask::All => None,
            Mask::Indices(indices) => Some(indices.len()),
        }
    }
}

impl Default for Mask {
    fn default() -> Self {
        Mask::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_everything() {
        assert!(Mask::All.contains(0));
        assert!(Mask::All.contains(9999));
    }

    #[test]
    fn indices_only_contains_listed_elements() {
        let mask = Mask::Indices(vec![1, 3, 5]);
        assert!(mask.contains(3));
        assert!(!mask.contains(2));
        assert_eq!(mask.explicit_len(), Some(3));
    }
}
