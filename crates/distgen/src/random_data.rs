//! Generators for random tabular data and random condensed distance arrays.

use rand::{distr::uniform::SampleUniform, rngs::StdRng, Rng, SeedableRng};

/// Generates a table of random observation vectors, one row per observation.
///
/// Every coordinate is drawn uniformly from `[min, max]`.
///
/// # Arguments
///
/// * `cardinality`: The number of observations to generate.
/// * `dimensionality`: The number of coordinates per observation.
/// * `min`: The minimum value of each coordinate.
/// * `max`: The maximum value of each coordinate.
/// * `rng`: The source of randomness.
///
/// # Panics
///
/// * If `min` is greater than `max`.
pub fn random_tabular<T, R>(cardinality: usize, dimensionality: usize, min: T, max: T, rng: &mut R) -> Vec<Vec<T>>
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng,
{
    (0..cardinality)
        .map(|_| (0..dimensionality).map(|_| rng.random_range(min..=max)).collect())
        .collect()
}

/// Generates a table of random observation vectors from a seed.
///
/// See [`random_tabular`] for details.
pub fn random_tabular_seedable<T>(cardinality: usize, dimensionality: usize, min: T, max: T, seed: u64) -> Vec<Vec<T>>
where
    T: SampleUniform + PartialOrd + Copy,
{
    let mut rng = StdRng::seed_from_u64(seed);
    random_tabular(cardinality, dimensionality, min, max, &mut rng)
}

/// Generates a random condensed distance array over `cardinality` observations.
///
/// The result has length `cardinality * (cardinality - 1) / 2` and holds the
/// upper triangle of a symmetric pairwise-distance matrix in row-major order.
/// Every entry is drawn uniformly from `[min, max]`.
///
/// # Arguments
///
/// * `cardinality`: The number of observations the array describes.
/// * `min`: The minimum pairwise distance.
/// * `max`: The maximum pairwise distance.
/// * `rng`: The source of randomness.
///
/// # Panics
///
/// * If `min` is greater than `max`.
pub fn random_condensed<T, R>(cardinality: usize, min: T, max: T, rng: &mut R) -> Vec<T>
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng,
{
    let num_pairs = cardinality * (cardinality.saturating_sub(1)) / 2;
    (0..num_pairs).map(|_| rng.random_range(min..=max)).collect()
}

/// Generates a random condensed distance array from a seed.
///
/// See [`random_condensed`] for details.
pub fn random_condensed_seedable<T>(cardinality: usize, min: T, max: T, seed: u64) -> Vec<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    let mut rng = StdRng::seed_from_u64(seed);
    random_condensed(cardinality, min, max, &mut rng)
}
