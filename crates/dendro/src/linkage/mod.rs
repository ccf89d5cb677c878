//! Agglomerative linkage over condensed distance arrays.
//!
//! Both algorithms here consume a [`CondensedMatrix`] and produce a
//! [`LinkageMatrix`], the compact merge-history encoding popularized by
//! scipy's `cluster.hierarchy` module. Observations are leaves with ids
//! `0..n`, and the cluster created by row `k` has id `n + k`, so the root of
//! the hierarchy is `2n - 2`.

use std::{
    io::{Read, Write},
    path::Path,
};

use crate::{distance::CondensedMatrix, utils::FloatDistanceValue, DistanceValue, Error, Result};

mod average;
mod single;

pub use average::average_linkage;
pub use single::single_linkage;

/// One merge in a linkage matrix.
///
/// Row `k` of a linkage matrix over `n` observations records that the
/// clusters with ids `left` and `right` were merged at `distance` into a new
/// cluster with id `n + k` holding `size` observations.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkageRow<T> {
    /// The id of the first merged cluster. Always less than `right`.
    pub left: usize,
    /// The id of the second merged cluster.
    pub right: usize,
    /// The linkage distance between the two merged clusters.
    pub distance: T,
    /// The number of observations in the merged cluster.
    pub size: usize,
}

/// The merge history of an agglomerative clustering, one row per merge.
///
/// A matrix over `n` observations has `n - 1` rows, and row `k` may only
/// reference clusters that exist before it, i.e. ids below `n + k`. The
/// builders in this crate uphold that, but a matrix can also be assembled
/// from arbitrary rows or loaded from disk, so everything that consumes a
/// matrix first runs [`LinkageMatrix::validate`].
#[must_use]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkageMatrix<T> {
    /// The merges in the order they were performed.
    rows: Vec<LinkageRow<T>>,
}

impl<T: DistanceValue> LinkageMatrix<T> {
    /// Creates a `LinkageMatrix` from raw rows, without validating them.
    pub const fn from_rows(rows: Vec<LinkageRow<T>>) -> Self {
        Self { rows }
    }

    /// The merges in the order they were performed.
    #[must_use]
    pub fn rows(&self) -> &[LinkageRow<T>] {
        &self.rows
    }

    /// Mutable access to the merges.
    ///
    /// Edits are not validated here; consumers of the matrix will reject
    /// rows that break the merge-history structure.
    pub fn rows_mut(&mut self) -> &mut [LinkageRow<T>] {
        &mut self.rows
    }

    /// The number of merges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix holds no merges at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The number of observations that were clustered, i.e. one more than the
    /// number of merges.
    #[must_use]
    pub fn num_observations(&self) -> usize {
        self.rows.len() + 1
    }

    /// Checks that the rows form a coherent merge history and returns the
    /// derived size of each merged cluster.
    ///
    /// Row `k` may only reference cluster ids below `n + k`, each cluster may
    /// be merged into a parent at most once, and the stored size of every row
    /// must equal the number of observations its children hold. The returned
    /// vector has one entry per row and is computed bottom-up from the rows
    /// themselves, so callers can trust it even when they do not trust the
    /// stored sizes they just checked it against.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] if the matrix is empty.
    /// * [`Error::MalformedLinkage`] if a row references a cluster that does
    ///   not exist before it, if a cluster is given two parents, or if a
    ///   stored size disagrees with the sizes of the row's children.
    pub fn validate(&self) -> Result<Vec<usize>> {
        if self.rows.is_empty() {
            return Err(Error::InvalidInput("a linkage matrix must hold at least one merge".to_string()));
        }

        let num_observations = self.num_observations();
        let mut merged = vec![false; 2 * num_observations - 1];
        let mut sizes = Vec::with_capacity(self.rows.len());
        for (k, row) in self.rows.iter().enumerate() {
            let merged_id = num_observations + k;
            let mut count = 0;
            for child in [row.left, row.right] {
                if child >= merged_id {
                    return Err(Error::MalformedLinkage(format!(
                        "row {k} references id {child}, but ids reach only {} at that point",
                        merged_id - 1
                    )));
                }
                if merged[child] {
                    return Err(Error::MalformedLinkage(format!(
                        "row {k} merges cluster {child}, which already has a parent"
                    )));
                }
                merged[child] = true;
                count += if child < num_observations {
                    1
                } else {
                    sizes[child - num_observations]
                };
            }
            if count != row.size {
                return Err(Error::MalformedLinkage(format!(
                    "row {k} claims size {}, but its children hold {count} observations",
                    row.size
                )));
            }
            sizes.push(count);
        }

        Ok(sizes)
    }

    /// Encodes the matrix as little-endian `f64` quadruples, one per row.
    ///
    /// Ids and sizes are stored as `f64` so the file is a plain `(n - 1, 4)`
    /// numeric array, the same convention scipy uses for linkage matrices.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] if a distance cannot be represented as `f64`.
    #[expect(clippy::cast_precision_loss)]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.rows.len() * ROW_BYTES);
        for row in &self.rows {
            let distance = row.distance.to_f64().ok_or_else(|| {
                Error::InvalidInput(format!("distance {} cannot be represented as f64", row.distance))
            })?;
            for value in [row.left as f64, row.right as f64, distance, row.size as f64] {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        Ok(bytes)
    }

    /// Decodes a matrix from the encoding produced by [`LinkageMatrix::to_bytes`].
    ///
    /// This only restores the rows; run [`LinkageMatrix::validate`] or hand
    /// the result to a tree builder to check that they cohere.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] if the byte length is zero or not a multiple
    ///   of the row size, if an id or size field is not a non-negative
    ///   integer, or if a distance cannot be represented in `T`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % ROW_BYTES != 0 {
            return Err(Error::InvalidInput(format!(
                "a serialized linkage matrix must be a non-zero multiple of {ROW_BYTES} bytes, got {}",
                bytes.len()
            )));
        }

        let mut rows = Vec::with_capacity(bytes.len() / ROW_BYTES);
        for (k, chunk) in bytes.chunks_exact(ROW_BYTES).enumerate() {
            let left = decode_id(&chunk[0..8], k)?;
            let right = decode_id(&chunk[8..16], k)?;
            let distance = T::from_f64(read_f64(&chunk[16..24])).ok_or_else(|| {
                Error::InvalidInput(format!("row {k} holds a distance that does not fit the distance type"))
            })?;
            let size = decode_id(&chunk[24..32], k)?;
            rows.push(LinkageRow { left, right, distance, size });
        }

        Ok(Self { rows })
    }

    /// Writes the matrix to a file in the [`LinkageMatrix::to_bytes`] encoding.
    ///
    /// # Errors
    ///
    /// * If the matrix cannot be encoded, see [`LinkageMatrix::to_bytes`].
    /// * If the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        ftlog::info!("Saving linkage matrix with {} merges to {:?}...", self.rows.len(), path.as_ref());
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Reads a matrix from a file written by [`LinkageMatrix::save`].
    ///
    /// # Errors
    ///
    /// * If the file cannot be read.
    /// * If its contents do not decode, see [`LinkageMatrix::from_bytes`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        ftlog::info!("Loading linkage matrix from {:?}...", path.as_ref());
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// Writes the matrix to the given writer in the [`LinkageMatrix::to_bytes`]
    /// encoding.
    ///
    /// # Errors
    ///
    /// * If the matrix cannot be encoded, see [`LinkageMatrix::to_bytes`].
    /// * If the writer fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Reads a matrix from the given reader.
    ///
    /// # Errors
    ///
    /// * If the reader fails.
    /// * If its contents do not decode, see [`LinkageMatrix::from_bytes`].
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}

/// The encoded width of one linkage row: four little-endian `f64` values.
const ROW_BYTES: usize = 4 * core::mem::size_of::<f64>();

/// Reads a little-endian `f64` from an 8-byte slice.
fn read_f64(bytes: &[u8]) -> f64 {
    let mut buf = [0_u8; 8];
    buf.copy_from_slice(bytes);
    f64::from_le_bytes(buf)
}

/// Decodes a cluster id or size field, which must be a non-negative integer
/// stored as `f64`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn decode_id(bytes: &[u8], row: usize) -> Result<usize> {
    let value = read_f64(bytes);
    // `usize::MAX as f64` rounds up, so the bound must be strict for the
    // cast below to stay exact.
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(Error::InvalidInput(format!(
            "row {row} holds {value} where a non-negative integer id or size was expected"
        )))
    }
}

/// The linkage criteria this crate implements.
///
/// The criterion decides the distance between two clusters, and with it which
/// pair of clusters each merge step joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LinkageMethod {
    /// The distance between two clusters is the smallest distance between any
    /// two of their members. Computed with the SLINK algorithm in `O(n^2)`
    /// time and `O(n)` extra memory.
    Single,
    /// The distance between two clusters is the arithmetic mean of all
    /// member-to-member distances, also known as UPGMA. Computed in `O(n^3)`
    /// time.
    Average,
}

impl LinkageMethod {
    /// The name of the method.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Average => "average",
        }
    }

    /// Runs this linkage method over the given pairwise distances.
    pub fn cluster<T: FloatDistanceValue>(self, pdists: &CondensedMatrix<T>) -> LinkageMatrix<T> {
        match self {
            Self::Single => single_linkage(pdists),
            Self::Average => average_linkage(pdists),
        }
    }
}

impl core::fmt::Display for LinkageMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}
