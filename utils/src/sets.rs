use std::collections::HashSet;
use std::hash::Hash;

/// True when both slices contain the same set of elements, ignoring order
/// and duplicates.
pub fn same_elements<T: Eq + Hash>(left: &[T], right: &[T]) -> bool {
    let left: HashSet<&T> = left.iter().collect();
    let right: HashSet<&T> = right.iter().collect();
    left == right
}

#[cfg(test)]
mod tests {
    use super::same_elements;

    #[test]
    fn order_and_duplicates_do_not_matter() {
        assert!(same_elements(&[1, 2, 3], &[3, 2, 1]));
        assert!(same_elements(&[1, 1, 2], &[2, 1]));
        assert!(same_elements::<i32>(&[], &[]));
    }

    #[test]
    fn detects_differing_sets() {
        assert!(!same_elements(&[1, 2], &[1, 2, 3]));
        assert!(!same_elements(&["a"], &["b"]));
    }
}
