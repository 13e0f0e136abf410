//! Layered merging of configuration values.

/// Combine two layers of the same value, `other` taking precedence.
///
/// Configuration is loaded as a stack (built-in defaults, global file, project
/// file, command line). Each layer is merged over the previous one, so a field
/// left unset in a higher layer keeps the lower layer's value.
pub trait Merge {
    fn merge(self, other: Self) -> Self;
}

impl<T> Merge for Option<T> {
    fn merge(self, other: Self) -> Self {
        other.or(self)
    }
}

impl<T> Merge for Vec<T> {
    /// Non-empty lists replace; an empty higher layer keeps the lower one.
    fn merge(self, other: Self) -> Self {
        if other.is_empty() { self } else { other }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_prefers_other_when_set() {
        assert_eq!(Some(1).merge(Some(2)), Some(2));
        assert_eq!(Some(1).merge(None), Some(1));
        assert_eq!(None.merge(Some(3)), Some(3));
    }

    #[test]
    fn empty_vec_keeps_lower_layer() {
        assert_eq!(vec![1, 2].merge(Vec::new()), vec![1, 2]);
        assert_eq!(vec![1, 2].merge(vec![3]), vec![3]);
    }
}
