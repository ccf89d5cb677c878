//! Tests for the serializable views of a dendrogram.

use dendro::{single_linkage, to_json_tree, CondensedMatrix, Dendrogram, Error, LinkageMatrix, NestedNode};

mod common;

/// A labeled tree over 20 random observations.
fn random_tree() -> dendro::Result<(LinkageMatrix<f64>, Dendrogram<f64>, Vec<String>)> {
    let pdists = CondensedMatrix::from_distances(common::data_gen::condensed(20, 11), 20)?;
    let z = single_linkage(&pdists);
    let labels = common::data_gen::labels(20);
    let label_refs = labels.iter().map(String::as_str).collect::<Vec<_>>();
    let tree = Dendrogram::from_linkage(&z, Some(&label_refs))?;
    Ok((z, tree, labels))
}

/// A leaf for hand-built nested trees.
fn leaf(id: usize) -> NestedNode<f64> {
    NestedNode {
        id,
        left: None,
        right: None,
        distance: 0.0,
        count: 1,
        label: None,
    }
}

/// An inner node over two subtrees, with its count derived honestly.
fn join(id: usize, left: NestedNode<f64>, right: NestedNode<f64>, distance: f64) -> NestedNode<f64> {
    let count = left.count + right.count;
    NestedNode {
        id,
        left: Some(Box::new(left)),
        right: Some(Box::new(right)),
        distance,
        count,
        label: None,
    }
}

#[test]
fn nested_round_trip_preserves_every_node() -> dendro::Result<()> {
    let (_, tree, _) = random_tree()?;

    let nested = tree.to_nested();
    assert_eq!(nested.count, 20, "Root count mismatch: {nested:?}");

    let rebuilt = Dendrogram::from_nested(&nested)?;
    assert_eq!(rebuilt.nodes().len(), tree.nodes().len());
    for (node, original) in rebuilt.nodes().iter().zip(tree.nodes()) {
        assert_eq!(node.id(), original.id());
        assert_eq!(node.children(), original.children(), "Node {} mismatch", node.id());
        assert_eq!(node.parent(), original.parent(), "Node {} mismatch", node.id());
        assert_eq!(node.count(), original.count(), "Node {} mismatch", node.id());
        assert_eq!(node.distance(), original.distance(), "Node {} mismatch", node.id());
        assert_eq!(node.label(), original.label(), "Node {} mismatch", node.id());
    }

    Ok(())
}

#[test]
fn nested_views_from_matrix_and_tree_agree() -> dendro::Result<()> {
    let (z, tree, labels) = random_tree()?;
    let label_refs = labels.iter().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(NestedNode::from_linkage(&z, Some(&label_refs))?, tree.to_nested());
    Ok(())
}

#[test]
fn serde_round_trip_survives_the_wire() -> dendro::Result<()> {
    let (_, tree, _) = random_tree()?;
    let nested = tree.to_nested();

    let wire = serde_json::to_string(&nested).unwrap();
    let received: NestedNode<f64> = serde_json::from_str(&wire).unwrap();
    assert_eq!(received, nested);

    // The received tree still stands up to full re-validation.
    Dendrogram::from_nested(&received)?;
    Ok(())
}

#[test]
fn json_has_the_documented_shape() -> dendro::Result<()> {
    let pdists = CondensedMatrix::from_distances(common::data_gen::two_pairs(), 4)?;
    let z = single_linkage(&pdists);
    let json = to_json_tree(&z, Some(&["a", "b", "c", "d"]))?;

    assert_eq!(json["id"], 6);
    assert_eq!(json["count"], 4);
    assert_eq!(json["dist"], 0.9);
    assert_eq!(json["children"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["children"][0]["id"], 4);
    assert_eq!(json["children"][0]["children"][0], serde_json::json!({"count": 1, "name": "a"}));
    assert_eq!(json["children"][1]["children"][1], serde_json::json!({"count": 1, "name": "d"}));

    // Unlabeled leaves carry their observation index instead.
    let json = to_json_tree(&z, None)?;
    assert_eq!(json["children"][0]["children"][0], serde_json::json!({"count": 1, "id": 0}));

    Ok(())
}

#[test]
fn json_from_matrix_and_tree_agree() -> dendro::Result<()> {
    let (z, tree, labels) = random_tree()?;
    let label_refs = labels.iter().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(to_json_tree(&z, Some(&label_refs))?, tree.to_json());
    Ok(())
}

#[test]
fn exporters_reject_what_the_tree_builder_rejects() -> dendro::Result<()> {
    let (mut z, _, _) = random_tree()?;
    z.rows_mut()[3].size = 1;

    let result = to_json_tree(&z, None);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
    let result = NestedNode::from_linkage(&z, None);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");

    Ok(())
}

#[test]
fn asymmetric_nodes_are_rejected() {
    let mut bad = join(2, leaf(0), leaf(1), 0.5);
    bad.right = None;

    let result = Dendrogram::from_nested(&bad);
    assert!(matches!(result, Err(Error::AsymmetricChild { id: 2 })), "Got: {result:?}");
}

#[test]
fn corrupted_counts_are_rejected() -> dendro::Result<()> {
    let (_, tree, _) = random_tree()?;
    let mut nested = tree.to_nested();
    nested.count += 1;

    let result = Dendrogram::from_nested(&nested);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");

    Ok(())
}

#[test]
fn duplicate_ids_are_rejected() {
    let bad = join(2, leaf(0), leaf(0), 0.5);
    let result = Dendrogram::from_nested(&bad);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
}

#[test]
fn out_of_range_ids_are_rejected() {
    let bad = join(2, leaf(0), leaf(5), 0.5);
    let result = Dendrogram::from_nested(&bad);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
}

#[test]
fn leaf_ids_must_stay_below_the_merge_range() {
    // Two leaves means leaf ids 0 and 1; a leaf claiming id 2 collides with
    // the merge-id range.
    let mut bad = join(2, leaf(0), leaf(1), 0.5);
    if let Some(left) = bad.left.as_mut() {
        left.id = 2;
    }

    let result = Dendrogram::from_nested(&bad);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
}

#[test]
fn merge_ids_must_stay_above_the_leaf_range() {
    // Three leaves (0, 1, 3) put the merge range at 3..=4, so the inner
    // merge claiming id 2 sits in leaf territory.
    let inner = join(2, leaf(0), leaf(1), 0.5);
    let bad = join(4, inner, leaf(3), 0.9);

    let result = Dendrogram::from_nested(&bad);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
}

#[test]
fn children_must_precede_their_parents() {
    let inner = join(4, leaf(1), leaf(2), 0.3);
    let bad = join(3, leaf(0), inner, 0.9);

    let result = Dendrogram::from_nested(&bad);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
}

#[test]
fn matrix_files_round_trip() -> dendro::Result<()> {
    let (z, _, _) = random_tree()?;

    let dir = tempdir::TempDir::new("dendro-linkage")?;
    let path = dir.path().join("linkage.bin");
    z.save(&path)?;
    let restored = LinkageMatrix::<f64>::load(&path)?;
    assert_eq!(z, restored);

    Ok(())
}
