//! Data generation utilities for testing.

pub fn tabular(car: usize, dim: usize, min: f64, max: f64) -> Vec<Vec<f64>> {
    distgen::random_data::random_tabular_seedable(car, dim, min, max, 42)
}

pub fn condensed(car: usize, seed: u64) -> Vec<f64> {
    distgen::random_data::random_condensed_seedable(car, 0.0, 1.0, seed)
}

/// Distances for two tight pairs far from each other: observations 0 and 1
/// sit at distance 0.1, observations 2 and 3 at 0.2, and every distance
/// across the pairs is 0.9.
pub fn two_pairs() -> Vec<f64> {
    vec![0.1, 0.9, 0.9, 0.9, 0.9, 0.2]
}

pub fn labels(car: usize) -> Vec<String> {
    (0..car).map(|i| format!("obs-{i}")).collect()
}
