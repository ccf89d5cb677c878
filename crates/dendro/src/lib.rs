//! Agglomerative hierarchical clustering over arbitrary distance functions.
//!
//! The pipeline runs in three stages. Pairwise distances are condensed into
//! a flat upper-triangle array, a linkage algorithm replays the merges of
//! the hierarchy into a linkage matrix, and the matrix is assembled into a
//! navigable tree or rendered as a serializable view.
//!
//! ## Stages
//!
//! - [`CondensedMatrix`]: the pairwise distances over `n` observations,
//!   stored as the `n * (n - 1) / 2` entries of the upper triangle.
//! - [`single_linkage`] and [`average_linkage`]: the two linkage criteria,
//!   selectable at runtime through [`LinkageMethod`]. Both produce a
//!   [`LinkageMatrix`], which can also be saved, loaded, and validated on
//!   its own.
//! - [`Dendrogram`]: a navigable tree over the merge history, with the owned
//!   [`NestedNode`] view and a JSON rendering for serialization boundaries.
//!
//! [`hierarchy`] runs all three stages in one call.

mod distance;
mod error;
mod linkage;
mod tree;
mod utils;

pub use distance::{condensed_index, cosine_dissimilarity, CondensedMatrix};
pub use error::{Error, Result};
pub use linkage::{average_linkage, single_linkage, LinkageMatrix, LinkageMethod, LinkageRow};
pub use tree::{to_json_tree, ClusterNode, Dendrogram, NestedNode};
pub use utils::{DistanceValue, FloatDistanceValue};

/// Clusters items hierarchically and returns the dendrogram.
///
/// This computes the pairwise distances with the given metric, runs the
/// given linkage method over them, and assembles the tree.
///
/// # Arguments
///
/// * `items`: The observations to cluster.
/// * `metric`: The distance function between two observations.
/// * `method`: The linkage criterion to merge clusters by.
/// * `labels`: Display labels for the leaves, one per observation, in
///   observation order.
///
/// # Errors
///
/// * [`Error::InvalidInput`] if `items` holds fewer than 2 observations or
///   `labels` is given with the wrong length.
pub fn hierarchy<I, T, M>(items: &[I], metric: &M, method: LinkageMethod, labels: Option<&[&str]>) -> Result<Dendrogram<T>>
where
    T: FloatDistanceValue,
    M: Fn(&I, &I) -> T,
{
    let pdists = CondensedMatrix::from_items(items, metric)?;
    let z = method.cluster(&pdists);
    Dendrogram::from_linkage(&z, labels)
}

/// Parallel version of [`hierarchy`].
///
/// Only the pairwise-distance stage is parallelized; the linkage algorithms
/// themselves are sequential.
///
/// # Errors
///
/// * See [`hierarchy`].
pub fn par_hierarchy<I, T, M>(items: &[I], metric: &M, method: LinkageMethod, labels: Option<&[&str]>) -> Result<Dendrogram<T>>
where
    I: Send + Sync,
    T: FloatDistanceValue + Send + Sync,
    M: (Fn(&I, &I) -> T) + Send + Sync,
{
    let pdists = CondensedMatrix::par_from_items(items, metric)?;
    let z = method.cluster(&pdists);
    Dendrogram::from_linkage(&z, labels)
}
