//! Serializable views of a dendrogram.
//!
//! The arena in [`Dendrogram`] is compact and quick to walk, but its
//! id-based references are awkward to ship across a serialization boundary.
//! The exporters here produce two self-contained views: an owned tree of
//! [`NestedNode`]s, and a JSON value in the shape that d3-style frontends
//! expect. Both can be produced from a built tree or straight from a linkage
//! matrix, and the matrix paths run the same validation as the tree builder.

use crate::{linkage::LinkageMatrix, DistanceValue, Error, Result};

use super::{check_labels, ClusterNode, Dendrogram};

/// A self-contained node of a dendrogram, owning its children.
///
/// Ids, distances, and counts follow the linkage-matrix conventions, see
/// [`ClusterNode`]. Unlike the arena-backed tree, a `NestedNode` can be
/// serialized, shipped, and deserialized on its own; use
/// [`Dendrogram::from_nested`] to turn a received tree back into a navigable
/// one, which re-checks everything the serialization boundary may have
/// mangled.
#[must_use]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NestedNode<T> {
    /// The id of this node.
    pub id: usize,
    /// The first merged child, or `None` for a leaf.
    pub left: Option<Box<NestedNode<T>>>,
    /// The second merged child, or `None` for a leaf.
    pub right: Option<Box<NestedNode<T>>>,
    /// The linkage distance at which the children were merged. Zero for leaves.
    pub distance: T,
    /// The number of observations under this node.
    pub count: usize,
    /// An optional display label. Only leaves carry labels.
    pub label: Option<String>,
}

impl<T> NestedNode<T> {
    /// Whether this node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl<T: DistanceValue> NestedNode<T> {
    /// Builds the nested tree encoded by a linkage matrix, without building
    /// a [`Dendrogram`] first.
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

        let mut slots: Vec<Option<Box<Self>>> = (0..(2 * n - 1)).map(|_| None).collect();
        for (i, slot) in slots.iter_mut().enumerate().take(n) {
            *slot = Some(Box::new(Self {
                id: i,
                left: None,
                right: None,
                distance: T::zero(),
                count: 1,
                label: labels.map(|labels| labels[i].to_string()),
            }));
        }
        // Validation guarantees that every row finds both children still in
        // their slots, so the two takes below always yield `Some`.
        for (k, row) in z.rows().iter().enumerate() {
            let id = n + k;
            slots[id] = Some(Box::new(Self {
                id,
                left: slots[row.left].take(),
                right: slots[row.right].take(),
                distance: row.distance,
                count: row.size,
                label: None,
            }));
        }

        slots
            .pop()
            .flatten()
            .map_or_else(|| unreachable!("the final merge is the root"), |root| Ok(*root))
    }
}

impl<T: DistanceValue> Dendrogram<T> {
    /// Converts the tree into an owned nested view.
    pub fn to_nested(&self) -> NestedNode<T> {
        let mut slots: Vec<Option<Box<NestedNode<T>>>> = self.nodes.iter().map(|_| None).collect();
        for node in &self.nodes {
            let (left, right) = match node.children {
                Some((left, right)) => (slots[left].take(), slots[right].take()),
                None => (None, None),
            };
            slots[node.id] = Some(Box::new(NestedNode {
                id: node.id,
                left,
                right,
                distance: node.distance,
                count: node.count,
                label: node.label.clone(),
            }));
        }

        slots
            .pop()
            .flatten()
            .map_or_else(|| unreachable!("the arena root is the last slot"), |root| *root)
    }

    /// Rebuilds an arena-backed tree from a nested view.
    ///
    /// The nested tree typically arrives from a serialization boundary, so
    /// nothing about it is trusted: ids must be distinct, in range, and
    /// children-before-parent; leaf and merge ids must lie in their
    /// respective ranges; and every count is re-derived from the leaves up
    /// and checked against the stored one.
    ///
    /// # Errors
    ///
    /// * [`Error::AsymmetricChild`] if a node has exactly one child.
    /// * [`Error::InvalidInput`] if the tree holds fewer than 2 observations.
    /// * [`Error::MalformedLinkage`] if the ids do not form a coherent merge
    ///   history, or if a stored count disagrees with the re-derived one.
    pub fn from_nested(root: &NestedNode<T>) -> Result<Self> {
        let mut num_leaves = 0_usize;
        let mut num_nodes = 0_usize;
        let mut stack = vec![root];
        while let Some(nested) = stack.pop() {
            num_nodes += 1;
            match (&nested.left, &nested.right) {
                (None, None) => num_leaves += 1,
                (Some(left), Some(right)) => {
                    stack.push(left);
                    stack.push(right);
                }
                _ => return Err(Error::AsymmetricChild { id: nested.id }),
            }
        }
        if num_leaves < 2 {
            return Err(Error::InvalidInput(format!(
                "a dendrogram needs at least 2 observations, got {num_leaves}"
            )));
        }

        let mut slots: Vec<Option<ClusterNode<T>>> = (0..num_nodes).map(|_| None).collect();
        let mut stack = vec![Visit::Enter(root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(nested) => {
                    if let (Some(left), Some(right)) = (&nested.left, &nested.right) {
                        stack.push(Visit::Exit(nested));
                        stack.push(Visit::Enter(right));
                        stack.push(Visit::Enter(left));
                    } else {
                        place(nested, &mut slots, num_leaves)?;
                    }
                }
                Visit::Exit(nested) => place(nested, &mut slots, num_leaves)?,
            }
        }

        let nodes = slots
            .into_iter()
            .map(|slot| slot.map_or_else(|| unreachable!("distinct in-range ids fill every slot"), |node| node))
            .collect();
        Ok(Self { nodes })
    }

    /// Renders the tree as a JSON value.
    ///
    /// Labeled leaves render as `{"count": 1, "name": <label>}` and
    /// unlabeled ones as `{"count": 1, "id": <observation index>}`. Merges
    /// render as `{"id", "children", "dist", "count"}` objects with their two
    /// children nested in the `"children"` array.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value
    where
        T: serde::Serialize,
    {
        let mut slots: Vec<Option<serde_json::Value>> = self.nodes.iter().map(|_| None).collect();
        for node in &self.nodes {
            let value = match node.children {
                None => leaf_json(node.id, node.label.as_deref()),
                Some((left, right)) => serde_json::json!({
                    "id": node.id,
                    "children": [slots[left].take(), slots[right].take()],
                    "dist": node.distance,
                    "count": node.count,
                }),
            };
            slots[node.id] = Some(value);
        }

        slots
            .pop()
            .flatten()
            .unwrap_or_else(|| unreachable!("the arena root is the last slot"))
    }
}

/// One step of the iterative post-order walk in [`Dendrogram::from_nested`].
enum Visit<'a, T> {
    /// The subtree below this node still needs to be walked.
    Enter(&'a NestedNode<T>),
    /// Both children are placed, so the node itself can be placed.
    Exit(&'a NestedNode<T>),
}

/// Validates one nested node and places it in its arena slot.
///
/// The walk places children before their parents, so merge nodes can read
/// the already-placed children to derive counts and set parent links.
fn place<T: DistanceValue>(nested: &NestedNode<T>, slots: &mut [Option<ClusterNode<T>>], num_leaves: usize) -> Result<()> {
    let id = nested.id;
    if id >= slots.len() {
        return Err(Error::MalformedLinkage(format!(
            "node id {id} is out of range for a tree of {} nodes",
            slots.len()
        )));
    }
    if slots[id].is_some() {
        return Err(Error::MalformedLinkage(format!("node id {id} appears twice")));
    }

    let (children, count) = match (&nested.left, &nested.right) {
        (None, None) => {
            if id >= num_leaves {
                return Err(Error::MalformedLinkage(format!(
                    "leaf ids must lie below {num_leaves}, got {id}"
                )));
            }
            (None, 1)
        }
        (Some(left), Some(right)) => {
            if id < num_leaves {
                return Err(Error::MalformedLinkage(format!(
                    "merge node id {id} lies in the leaf range 0..{num_leaves}"
                )));
            }
            if left.id >= id || right.id >= id {
                return Err(Error::MalformedLinkage(format!(
                    "node {id} references a child whose id is not below its own"
                )));
            }
            let mut count = 0;
            for child in [left.id, right.id] {
                count += slots[child]
                    .as_ref()
                    .map_or_else(|| unreachable!("children are placed before their parent"), |node| node.count);
            }
            (Some((left.id, right.id)), count)
        }
        _ => return Err(Error::AsymmetricChild { id }),
    };

    if count != nested.count {
        return Err(Error::MalformedLinkage(format!(
            "node {id} claims count {}, but its children hold {count} observations",
            nested.count
        )));
    }

    if let Some((left, right)) = children {
        for child in [left, right] {
            if let Some(node) = slots[child].as_mut() {
                node.parent = Some(id);
            }
        }
    }
    slots[id] = Some(ClusterNode {
        id,
        children,
        parent: None,
        distance: nested.distance,
        count,
        label: nested.label.clone(),
    });

    Ok(())
}

/// The JSON object for a leaf.
///
/// Labeled leaves render their label under `"name"`, unlabeled leaves render
/// their observation index under `"id"`.
fn leaf_json(id: usize, label: Option<&str>) -> serde_json::Value {
    label.map_or_else(
        || serde_json::json!({"count": 1, "id": id}),
        |label| serde_json::json!({"count": 1, "name": label}),
    )
}

/// Renders the tree encoded by a linkage matrix as a JSON value, without
/// building a [`Dendrogram`] first.
///
/// The output shape is the one [`Dendrogram::to_json`] documents.
///
/// # Arguments
///
/// * `z`: The linkage matrix to render.
/// * `labels`: Display labels for the leaves, one per observation, in
///   observation order.
///
/// # Errors
///
/// * [`Error::InvalidInput`] if `z` is empty or `labels` is given with the
///   wrong length.
/// * [`Error::MalformedLinkage`] if `z` is not a coherent merge history, see
///   [`LinkageMatrix::validate`].
pub fn to_json_tree<T>(z: &LinkageMatrix<T>, labels: Option<&[&str]>) -> Result<serde_json::Value>
where
    T: DistanceValue + serde::Serialize,
{
    let n = z.num_observations();
    check_labels(labels, n)?;
    z.validate()?;

    let mut slots: Vec<Option<serde_json::Value>> = (0..(2 * n - 1)).map(|_| None).collect();
    for (i, slot) in slots.iter_mut().enumerate().take(n) {
        *slot = Some(leaf_json(i, labels.map(|labels| labels[i])));
    }
    for (k, row) in z.rows().iter().enumerate() {
        slots[n + k] = Some(serde_json::json!({
            "id": n + k,
            "children": [slots[row.left].take(), slots[row.right].take()],
            "dist": row.distance,
            "count": row.size,
        }));
    }

    slots
        .pop()
        .flatten()
        .map_or_else(|| unreachable!("the final merge is the root"), Ok)
}
