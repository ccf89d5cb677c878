//! Navigable dendrograms assembled from linkage matrices.

mod export;
mod node;

pub use export::{to_json_tree, NestedNode};
pub use node::ClusterNode;

use crate::{linkage::LinkageMatrix, DistanceValue, Error, Result};

/// Checks that a label slice, when given, has one label per observation.
pub(crate) fn check_labels(labels: Option<&[&str]>, num_observations: usize) -> Result<()> {
    match labels {
        Some(labels) if labels.len() != num_observations => Err(Error::InvalidInput(format!(
            "got {} labels for {num_observations} observations",
            labels.len()
        ))),
        _ => Ok(()),
    }
}

/// A hierarchical clustering as a navigable binary tree.
///
/// All `2n - 1` nodes live in one arena indexed by node id, with the leaves
/// `0..n` first and the merge nodes after them in merge order. The root is
/// the last slot. Nodes reference children and parents by id, so navigating
/// from any node in either direction is one slot lookup, and no node owns
/// any other.
#[must_use]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Dendrogram<T> {
    /// All nodes of the tree, indexed by id.
    nodes: Vec<ClusterNode<T>>,
}

impl<T: DistanceValue> Dendrogram<T> {
    /// Builds the tree encoded by a linkage matrix.
    ///
    /// Rows are replayed in order, so every merge finds its children already
    /// built. Each child's parent link is set exactly once, which the
    /// validation pass guarantees by rejecting clusters with two parents.
    ///
    /// # Arguments
    ///
    /// * `z`: The linkage matrix to build the tree from.
    /// * `labels`: Display labels for the leaves, one per observation, in
    ///   observation order.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] if `z` is empty or `labels` is given with
    ///   the wrong length.
    /// * [`Error::MalformedLinkage`] if `z` is not a coherent merge history,
    ///   see [`LinkageMatrix::validate`].
    pub fn from_linkage(z: &LinkageMatrix<T>, labels: Option<&[&str]>) -> Result<Self> {
        let n = z.num_observations();
        check_labels(labels, n)?;
        z.validate()?;
        ftlog::info!("Building a dendrogram over {n} observations...");

        let mut nodes = Vec::with_capacity(2 * n - 1);
        for i in 0..n {
            let label = labels.map(|labels| labels[i].to_string());
            nodes.push(ClusterNode::leaf(i, label));
        }
        for (k, row) in z.rows().iter().enumerate() {
            let id = n + k;
            let merge = ClusterNode::merge(id, &nodes[row.left], &nodes[row.right], row.distance);
            nodes[row.left].parent = Some(id);
            nodes[row.right].parent = Some(id);
            nodes.push(merge);
        }

        Ok(Self { nodes })
    }

    /// The number of observations the tree was built over.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        (self.nodes.len() + 1) / 2
    }

    /// All nodes of the tree, indexed by id.
    #[must_use]
    pub fn nodes(&self) -> &[ClusterNode<T>] {
        &self.nodes
    }

    /// The node with the given id, if it exists.
    #[must_use]
    pub fn node(&self, id: usize) -> Option<&ClusterNode<T>> {
        self.nodes.get(id)
    }

    /// The leaf nodes, in observation order.
    #[must_use]
    pub fn leaves(&self) -> &[ClusterNode<T>] {
        &self.nodes[..self.cardinality()]
    }

    /// The root of the tree.
    #[must_use]
    pub fn root(&self) -> &ClusterNode<T> {
        self.nodes.last().unwrap_or_else(|| unreachable!("a dendrogram always has a root"))
    }

    /// The children of the given node, or `None` for a leaf.
    ///
    /// # Panics
    ///
    /// * If the node came from a different dendrogram.
    #[must_use]
    pub fn children_of(&self, node: &ClusterNode<T>) -> Option<(&ClusterNode<T>, &ClusterNode<T>)> {
        node.children().map(|(left, right)| (&self.nodes[left], &self.nodes[right]))
    }

    /// The parent of the given node, or `None` for the root.
    ///
    /// # Panics
    ///
    /// * If the node came from a different dendrogram.
    #[must_use]
    pub fn parent_of(&self, node: &ClusterNode<T>) -> Option<&ClusterNode<T>> {
        node.parent().map(|parent| &self.nodes[parent])
    }
}
