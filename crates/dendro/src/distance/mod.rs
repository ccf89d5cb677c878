//! Condensed pairwise-distance arrays.
//!
//! A symmetric distance matrix over `n` observations is stored as its upper
//! triangle in row-major order, i.e. a flat array of `n * (n - 1) / 2`
//! entries. The diagonal is implicitly zero and has no slot.

use rayon::prelude::*;

use crate::{utils::FloatDistanceValue, DistanceValue, Error, Result};

/// Maps a pair of observation indices to the corresponding offset in a
/// condensed distance array over `cardinality` observations.
///
/// The mapping is symmetric in `i` and `j`. The diagonal has no slot, so
/// `i == j` maps to `0` as a don't-care; callers must treat the diagonal as
/// distance zero instead of indexing with it.
#[must_use]
pub const fn condensed_index(cardinality: usize, i: usize, j: usize) -> usize {
    if i < j {
        cardinality * i - (i * (i + 1)) / 2 + (j - i - 1)
    } else if j < i {
        cardinality * j - (j * (j + 1)) / 2 + (i - j - 1)
    } else {
        0
    }
}

/// The cosine-based dissimilarity `1 - |dot(a, b)|` between two vectors.
///
/// This is the default metric for building pairwise distances from embedding
/// vectors. It assumes both vectors are unit-norm and of equal
/// dimensionality; for unit vectors the result lies in `[0, 1]`, with `0` for
/// parallel or anti-parallel vectors.
#[must_use]
pub fn cosine_dissimilarity<T: FloatDistanceValue>(a: &[T], b: &[T]) -> T {
    let dot = a.iter().zip(b).fold(T::zero(), |acc, (&x, &y)| acc + x * y);
    T::one() - dot.abs()
}

/// A condensed array of pairwise distances over `cardinality` observations.
///
/// This is the input to the linkage algorithms. It can be built directly from
/// a precomputed flat array or by applying a metric to a slice of items.
#[must_use]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CondensedMatrix<T> {
    /// The upper triangle of the distance matrix in row-major order.
    distances: Vec<T>,
    /// The number of observations the distances were measured between.
    cardinality: usize,
}

impl<T: DistanceValue> CondensedMatrix<T> {
    /// Creates a `CondensedMatrix` from a precomputed condensed distance array.
    ///
    /// # Arguments
    ///
    /// * `distances`: The upper triangle of a symmetric distance matrix in
    ///   row-major order.
    /// * `cardinality`: The number of observations the distances were
    ///   measured between.
    ///
    /// # Errors
    ///
    /// * If `cardinality` is less than 2.
    /// * If the length of `distances` is not `cardinality * (cardinality - 1) / 2`.
    /// * If any distance is not finite.
    pub fn from_distances(distances: Vec<T>, cardinality: usize) -> Result<Self> {
        if cardinality < 2 {
            return Err(Error::InvalidInput(format!(
                "clustering needs at least 2 observations, got {cardinality}"
            )));
        }
        let num_pairs = cardinality * (cardinality - 1) / 2;
        if distances.len() != num_pairs {
            return Err(Error::InvalidInput(format!(
                "condensed array over {cardinality} observations must have length {num_pairs}, got {}",
                distances.len()
            )));
        }
        if let Some((offset, d)) = distances.iter().enumerate().find(|&(_, d)| !d.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "distances must be finite, got {d} at offset {offset}"
            )));
        }
        Ok(Self { distances, cardinality })
    }

    /// Computes the pairwise distances between items using the given metric.
    ///
    /// # Errors
    ///
    /// * If `items` has fewer than 2 elements.
    /// * If the metric produces a non-finite distance.
    pub fn from_items<I, M: Fn(&I, &I) -> T>(items: &[I], metric: &M) -> Result<Self> {
        let cardinality = items.len();
        if cardinality < 2 {
            return Err(Error::InvalidInput(format!(
                "clustering needs at least 2 observations, got {cardinality}"
            )));
        }
        ftlog::info!("Computing {} pairwise distances among {cardinality} items...", cardinality * (cardinality - 1) / 2);

        let mut distances = Vec::with_capacity(cardinality * (cardinality - 1) / 2);
        for (i, a) in items.iter().enumerate() {
            for b in &items[(i + 1)..] {
                distances.push(metric(a, b));
            }
        }

        Self::from_distances(distances, cardinality)
    }

    /// Parallel version of [`CondensedMatrix::from_items`].
    ///
    /// # Errors
    ///
    /// * See [`CondensedMatrix::from_items`].
    pub fn par_from_items<I, M>(items: &[I], metric: &M) -> Result<Self>
    where
        I: Send + Sync,
        T: Send + Sync,
        M: (Fn(&I, &I) -> T) + Send + Sync,
    {
        let cardinality = items.len();
        if cardinality < 2 {
            return Err(Error::InvalidInput(format!(
                "clustering needs at least 2 observations, got {cardinality}"
            )));
        }
        ftlog::info!("Computing {} pairwise distances among {cardinality} items...", cardinality * (cardinality - 1) / 2);

        let rows = items[..(cardinality - 1)]
            .par_iter()
            .enumerate()
            .map(|(i, a)| items[(i + 1)..].iter().map(|b| metric(a, b)).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let distances = rows.into_iter().flatten().collect();

        Self::from_distances(distances, cardinality)
    }

    /// Computes pairwise distances between embedding vectors with the default
    /// [`cosine_dissimilarity`] metric.
    ///
    /// # Errors
    ///
    /// * If `vectors` has fewer than 2 elements.
    /// * If any computed dissimilarity is not finite.
    pub fn from_vectors<V: AsRef<[T]>>(vectors: &[V]) -> Result<Self>
    where
        T: FloatDistanceValue,
    {
        Self::from_items(vectors, &|a: &V, b: &V| cosine_dissimilarity(a.as_ref(), b.as_ref()))
    }

    /// The distance between observations `i` and `j`.
    ///
    /// Access is symmetric and the diagonal is zero.
    ///
    /// # Panics
    ///
    /// * If `i` or `j` is not less than the cardinality.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(
            i < self.cardinality && j < self.cardinality,
            "observation index out of bounds: ({i}, {j}) with cardinality {}",
            self.cardinality
        );
        if i == j {
            T::zero()
        } else {
            self.distances[condensed_index(self.cardinality, i, j)]
        }
    }

    /// The number of observations the distances were measured between.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// The number of stored pairwise distances.
    #[must_use]
    pub fn num_pairs(&self) -> usize {
        self.distances.len()
    }

    /// The condensed distance array itself.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.distances
    }
}
