//! Average linkage, also known as UPGMA.
//!
//! Each step merges the pair of live clusters at the smallest current
//! distance, then folds the two matching entries of every other live cluster
//! into one averaged entry with the Lance-Williams update. The working copy
//! of the distance matrix shrinks in place: the merged cluster takes over the
//! slot of the higher-numbered member, and entries of the retired slot are
//! poisoned with `+inf` so the minimum scan can never land on them.
//!
//! Unlike single linkage, merge distances here are not guaranteed to be
//! non-decreasing from row to row. An average of distances can fall below a
//! distance that an earlier merge was chosen by, so consumers must not rely
//! on sorted rows.

use crate::{
    distance::{condensed_index, CondensedMatrix},
    utils::FloatDistanceValue,
};

use super::{LinkageMatrix, LinkageRow};

/// Clusters the given pairwise distances with average linkage.
///
/// The distance between two clusters is the arithmetic mean of all
/// member-to-member distances. This runs in `O(n^3)` time and `O(n^2)`
/// memory, driven by the repeated minimum scans over the working distances.
pub fn average_linkage<T: FloatDistanceValue>(pdists: &CondensedMatrix<T>) -> LinkageMatrix<T> {
    let n = pdists.cardinality();
    ftlog::info!("Clustering {n} observations with average linkage...");

    let mut dists = pdists.as_slice().to_vec();
    // Slot `i` holds the id of the cluster whose distances live in row `i`
    // of the working matrix, and `None` once that slot is retired.
    let mut slot_ids = (0..n).map(Some).collect::<Vec<_>>();
    let mut rows = Vec::<LinkageRow<T>>::with_capacity(n - 1);

    for k in 0..(n - 1) {
        let (x, y, dist) = closest_pair(&dists, &slot_ids, n);
        let id_x = slot_ids[x].unwrap_or_else(|| unreachable!("the scan only visits live slots"));
        let id_y = slot_ids[y].unwrap_or_else(|| unreachable!("retired columns hold +inf"));
        let size_x = if id_x < n { 1 } else { rows[id_x - n].size };
        let size_y = if id_y < n { 1 } else { rows[id_y - n].size };

        ftlog::debug!("Merge {k}: clusters {id_x} and {id_y} at distance {dist}.");
        let (left, right) = if id_x < id_y { (id_x, id_y) } else { (id_y, id_x) };
        rows.push(LinkageRow { left, right, distance: dist, size: size_x + size_y });

        slot_ids[x] = None;
        slot_ids[y] = Some(n + k);

        // Fold distances to `x` and `y` into distances to the merged cluster,
        // which lives in slot `y`.
        for i in 0..n {
            if i == x || i == y || slot_ids[i].is_none() {
                continue;
            }
            let id_i = slot_ids[i].unwrap_or_else(|| unreachable!("checked above"));
            let size_i = if id_i < n { 1 } else { rows[id_i - n].size };

            let d_xi = dists[condensed_index(n, i, x)];
            let d_yi = dists[condensed_index(n, i, y)];
            dists[condensed_index(n, i, y)] = average_update(d_xi, d_yi, dist, size_x, size_y, size_i);
            // Rows of retired slots are skipped by the scan, but column `x`
            // still appears in the rows of every slot below it.
            if i < x {
                dists[condensed_index(n, i, x)] = T::infinity();
            }
        }
    }

    ftlog::info!("Finished average linkage over {n} observations.");
    LinkageMatrix::from_rows(rows)
}

/// Finds the pair of live slots at the smallest working distance.
///
/// Returns the two slot indices with the smaller one first, and the distance
/// between them.
fn closest_pair<T: FloatDistanceValue>(dists: &[T], slot_ids: &[Option<usize>], n: usize) -> (usize, usize, T) {
    let mut min_dist = T::infinity();
    let (mut x, mut y) = (0, 1);
    for i in 0..(n - 1) {
        if slot_ids[i].is_none() {
            continue;
        }
        let row = condensed_index(n, i, i + 1);
        for (j, &d) in dists[row..(row + n - i - 1)].iter().enumerate() {
            if d < min_dist {
                min_dist = d;
                x = i;
                y = i + j + 1;
            }
        }
    }
    (x, y, min_dist)
}

/// The Lance-Williams update for average linkage.
///
/// Given another cluster `i`, this is the distance from `i` to the cluster
/// that merges `x` and `y`. Average linkage only weighs the two folded
/// distances by cluster size; the distance between the merged pair and the
/// size of `i` are accepted anyway so that other Lance-Williams coefficient
/// sets can share this signature.
fn average_update<T: FloatDistanceValue>(d_xi: T, d_yi: T, _d_xy: T, size_x: usize, size_y: usize, _size_i: usize) -> T {
    let (wx, wy) = (T::from_cluster_size(size_x), T::from_cluster_size(size_y));
    (wx * d_xi + wy * d_yi) / (wx + wy)
}
