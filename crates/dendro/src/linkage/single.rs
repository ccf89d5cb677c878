//! Single linkage via the SLINK algorithm.
//!
//! SLINK (Sibson, 1973) computes single-linkage clustering in `O(n^2)` time
//! and `O(n)` extra memory. It never materializes a working copy of the
//! distance matrix. Instead it maintains the pointer representation of the
//! dendrogram: for each observation, the distance at which it stops being
//! the representative of its cluster (`lambda`) and the observation that
//! absorbs it (`pi`).

use crate::{distance::CondensedMatrix, utils::argsort, DistanceValue};

use super::{LinkageMatrix, LinkageRow};

/// Clusters the given pairwise distances with single linkage.
///
/// The distance between two clusters is the smallest distance between any
/// two of their members. Merge distances are non-decreasing from row to row.
pub fn single_linkage<T: DistanceValue>(pdists: &CondensedMatrix<T>) -> LinkageMatrix<T> {
    let n = pdists.cardinality();
    ftlog::info!("Clustering {n} observations with single linkage...");

    let pointers = pointer_representation(pdists);
    let mut rows = merge_rows(&pointers, n);
    calculate_cluster_sizes(&mut rows, n);

    ftlog::info!("Finished single linkage over {n} observations.");
    LinkageMatrix::from_rows(rows)
}

/// The pointer representation of a single-linkage dendrogram.
struct PointerRepresentation<T> {
    /// For each observation, the merge distance at which it is absorbed into
    /// the cluster of a higher-numbered observation. The highest-numbered
    /// observation is never absorbed and keeps the sentinel `T::max_value()`.
    lambda: Vec<T>,
    /// For each observation, the higher-numbered observation whose cluster
    /// absorbs it at distance `lambda`.
    pi: Vec<usize>,
}

/// Runs the SLINK recurrences over the distances.
///
/// Observations are inserted one at a time. For the new observation `i`,
/// `merge_dist[j]` starts as `d(i, j)` and is lowered as the pass discovers
/// clusters that reach `i` at a smaller distance through their members. The update
/// order within each pass is what keeps the whole run quadratic, so the three
/// inner loops must not be fused.
fn pointer_representation<T: DistanceValue>(pdists: &CondensedMatrix<T>) -> PointerRepresentation<T> {
    let n = pdists.cardinality();

    let mut merge_dist = vec![T::zero(); n];
    let mut lambda = vec![T::zero(); n];
    let mut pi = vec![0_usize; n];
    lambda[0] = T::max_value();

    for i in 1..n {
        pi[i] = i;
        lambda[i] = T::max_value();

        for j in 0..i {
            merge_dist[j] = pdists.get(i, j);
        }

        for j in 0..i {
            let p = pi[j];
            if lambda[j] >= merge_dist[j] {
                // `j`'s cluster now merges with `i` at `merge_dist[j]`, and
                // its old merge target inherits the old, smaller distance.
                if lambda[j] < merge_dist[p] {
                    merge_dist[p] = lambda[j];
                }
                lambda[j] = merge_dist[j];
                pi[j] = i;
            } else if merge_dist[j] < merge_dist[p] {
                merge_dist[p] = merge_dist[j];
            }
        }

        for j in 0..i {
            if lambda[j] >= lambda[pi[j]] {
                pi[j] = i;
            }
        }
    }

    PointerRepresentation { lambda, pi }
}

/// Converts a pointer representation into linkage-matrix rows.
///
/// Absorptions are replayed in ascending order of merge distance, with ties
/// broken by observation index. `node_ids[j]` tracks the id of the cluster
/// that observation `j` currently represents, so each absorption reads the
/// ids of the two merging clusters and assigns the merged id `n + k` to the
/// absorber. Sizes are left at zero for [`calculate_cluster_sizes`].
fn merge_rows<T: DistanceValue>(pointers: &PointerRepresentation<T>, n: usize) -> Vec<LinkageRow<T>> {
    let sorted = argsort(&pointers.lambda);
    let mut node_ids = (0..n).collect::<Vec<_>>();

    let mut rows = Vec::with_capacity(n - 1);
    for (k, &leaf) in sorted.iter().take(n - 1).enumerate() {
        let absorber = pointers.pi[leaf];
        let (a, b) = (node_ids[leaf], node_ids[absorber]);
        let (left, right) = if a < b { (a, b) } else { (b, a) };
        rows.push(LinkageRow { left, right, distance: pointers.lambda[leaf], size: 0 });
        node_ids[absorber] = n + k;
    }

    rows
}

/// Fills in the size column of freshly built linkage rows.
///
/// Children always appear in earlier rows than their parent, so one forward
/// pass can read the already-final sizes of merged children.
fn calculate_cluster_sizes<T>(rows: &mut [LinkageRow<T>], n: usize) {
    for k in 0..rows.len() {
        let (left, right) = (rows[k].left, rows[k].right);
        let mut size = if left < n { 1 } else { rows[left - n].size };
        size += if right < n { 1 } else { rows[right - n].size };
        rows[k].size = size;
    }
}
