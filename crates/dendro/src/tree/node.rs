//! A node in a `Dendrogram`.

use crate::DistanceValue;

/// A node in a [`Dendrogram`](super::Dendrogram).
///
/// Leaves represent single observations and carry ids `0..n`. Merge nodes
/// carry ids `n..2n - 1` in merge order, so the root of a dendrogram over `n`
/// observations always has id `2n - 2`. Children and parents are referenced
/// by id rather than owned, which keeps the tree navigable in both
/// directions from any node.
///
/// Nodes are uniquely identified by their id within a dendrogram, and are
/// ordered by it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[must_use]
pub struct ClusterNode<T> {
    /// The id of this node.
    pub(crate) id: usize,
    /// The ids of the two merged children, or `None` for a leaf.
    pub(crate) children: Option<(usize, usize)>,
    /// The id of the parent node, or `None` for the root.
    pub(crate) parent: Option<usize>,
    /// The linkage distance at which the children were merged. Zero for leaves.
    pub(crate) distance: T,
    /// The number of observations under this node.
    pub(crate) count: usize,
    /// An optional display label. Only leaves carry labels.
    pub(crate) label: Option<String>,
}

impl<T: DistanceValue> ClusterNode<T> {
    /// Creates a leaf node for a single observation.
    pub(crate) fn leaf(id: usize, label: Option<String>) -> Self {
        Self {
            id,
            children: None,
            parent: None,
            distance: T::zero(),
            count: 1,
            label,
        }
    }

    /// Creates a merge node over two existing nodes.
    ///
    /// The parent links of the children are set by the tree that owns them.
    pub(crate) fn merge(id: usize, left: &Self, right: &Self, distance: T) -> Self {
        Self {
            id,
            children: Some((left.id, right.id)),
            parent: None,
            distance,
            count: left.count + right.count,
            label: None,
        }
    }

    /// The id of this node.
    pub const fn id(&self) -> usize {
        self.id
    }

    /// The ids of the two merged children, or `None` for a leaf.
    pub const fn children(&self) -> Option<(usize, usize)> {
        self.children
    }

    /// The id of the parent node, or `None` for the root.
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// The linkage distance at which the children were merged. Zero for leaves.
    pub const fn distance(&self) -> T {
        self.distance
    }

    /// The number of observations under this node.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// The display label, if the node has one.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether this node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

impl<T> PartialEq for ClusterNode<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ClusterNode<T> {}

impl<T> PartialOrd for ClusterNode<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ClusterNode<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
