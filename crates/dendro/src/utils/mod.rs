//! Utility functions for the crate. Intended for private use, but made public for testing.

mod distance_value;

pub use distance_value::{DistanceValue, FloatDistanceValue};

/// Returns the indices that would sort the given slice in ascending order.
///
/// The sort is stable, so equal values keep their original relative order.
/// Incomparable values (e.g. NaN) are treated as equal to everything.
#[must_use]
pub fn argsort<T: PartialOrd>(values: &[T]) -> Vec<usize> {
    let mut indices = (0..values.len()).collect::<Vec<_>>();
    indices.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(core::cmp::Ordering::Equal));
    indices
}

#[cfg(test)]
mod tests {
    use super::argsort;

    #[test]
    fn argsort_is_stable() {
        let values = [0.3, 0.1, 0.3, 0.0, 0.1];
        assert_eq!(argsort(&values), vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn argsort_on_sorted_input_is_identity() {
        let values = [1, 2, 3, 4];
        assert_eq!(argsort(&values), vec![0, 1, 2, 3]);
    }
}
