//! Tests for dendrogram construction and navigation.

use dendro::{single_linkage, CondensedMatrix, Dendrogram, Error, LinkageMatrix, LinkageMethod, LinkageRow};

mod common;

/// The linkage matrix for [`common::data_gen::two_pairs`].
fn two_pairs_linkage() -> dendro::Result<LinkageMatrix<f64>> {
    let pdists = CondensedMatrix::from_distances(common::data_gen::two_pairs(), 4)?;
    Ok(single_linkage(&pdists))
}

#[test]
fn the_tree_mirrors_the_merge_history() -> dendro::Result<()> {
    let z = two_pairs_linkage()?;
    let tree = Dendrogram::from_linkage(&z, None)?;

    assert_eq!(tree.cardinality(), 4);
    assert_eq!(tree.nodes().len(), 7);
    assert_eq!(tree.leaves().len(), 4);

    let root = tree.root();
    assert_eq!(root.id(), 6, "Root mismatch: {root:?}");
    assert_eq!(root.count(), 4, "Root mismatch: {root:?}");
    assert_eq!(root.parent(), None, "Root mismatch: {root:?}");
    assert_eq!(root.children(), Some((4, 5)), "Root mismatch: {root:?}");
    assert_eq!(root.distance(), 0.9, "Root mismatch: {root:?}");
    assert!(!root.is_leaf(), "Root mismatch: {root:?}");

    for (i, leaf) in tree.leaves().iter().enumerate() {
        assert_eq!(leaf.id(), i, "Leaf mismatch: {leaf:?}");
        assert!(leaf.is_leaf(), "Leaf mismatch: {leaf:?}");
        assert_eq!(leaf.count(), 1, "Leaf mismatch: {leaf:?}");
        assert_eq!(leaf.distance(), 0.0, "Leaf mismatch: {leaf:?}");
        let parent = if i < 2 { 4 } else { 5 };
        assert_eq!(leaf.parent(), Some(parent), "Leaf mismatch: {leaf:?}");
    }

    let (left, right) = tree.children_of(root).map_or_else(|| unreachable!("the root is a merge"), |pair| pair);
    assert_eq!(left.children(), Some((0, 1)), "Left child mismatch: {left:?}");
    assert_eq!(right.children(), Some((2, 3)), "Right child mismatch: {right:?}");
    assert_eq!(tree.parent_of(left), Some(root), "Left child mismatch: {left:?}");
    assert_eq!(tree.parent_of(right), Some(root), "Right child mismatch: {right:?}");
    assert_eq!(tree.parent_of(root), None);

    assert!(tree.node(7).is_none(), "There is no node 7 in {} nodes", tree.nodes().len());

    Ok(())
}

#[test]
fn labels_attach_to_the_leaves_in_order() -> dendro::Result<()> {
    let z = two_pairs_linkage()?;
    let labels = common::data_gen::labels(4);
    let labels = labels.iter().map(String::as_str).collect::<Vec<_>>();
    let tree = Dendrogram::from_linkage(&z, Some(&labels))?;

    for (leaf, &expected) in tree.leaves().iter().zip(labels.iter()) {
        assert_eq!(leaf.label(), Some(expected), "Label mismatch: {leaf:?}");
    }
    assert_eq!(tree.root().label(), None, "Merges must not carry labels");

    Ok(())
}

#[test]
fn label_counts_must_match_the_observations() -> dendro::Result<()> {
    let z = two_pairs_linkage()?;
    let result = Dendrogram::from_linkage(&z, Some(&["a", "b"]));
    assert!(matches!(result, Err(Error::InvalidInput(_))), "Got: {result:?}");
    Ok(())
}

#[test]
fn corrupted_sizes_are_rejected() -> dendro::Result<()> {
    let mut z = two_pairs_linkage()?;
    z.rows_mut()[1].size = 7;
    let result = Dendrogram::from_linkage(&z, None);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
    Ok(())
}

#[test]
fn forward_references_are_rejected() {
    // Row 0 of a matrix over 4 observations may only reference ids 0..=3,
    // so referencing 4 (the id row 0 itself creates) must fail.
    let z = LinkageMatrix::from_rows(vec![
        LinkageRow { left: 0, right: 4, distance: 0.5, size: 2 },
        LinkageRow { left: 2, right: 3, distance: 0.5, size: 2 },
        LinkageRow { left: 4, right: 5, distance: 0.9, size: 4 },
    ]);
    let result = Dendrogram::from_linkage(&z, None);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");

    let z = LinkageMatrix::from_rows(vec![
        LinkageRow { left: 0, right: 1, distance: 0.5, size: 2 },
        LinkageRow { left: 2, right: 6, distance: 0.5, size: 2 },
        LinkageRow { left: 4, right: 5, distance: 0.9, size: 4 },
    ]);
    let result = Dendrogram::from_linkage(&z, None);
    assert!(matches!(result, Err(Error::MalformedLinkage(_))), "Got: {result:?}");
}

#[test]
fn empty_matrices_are_rejected() {
    let z = LinkageMatrix::<f64>::from_rows(Vec::new());
    let result = Dendrogram::from_linkage(&z, None);
    assert!(matches!(result, Err(Error::InvalidInput(_))), "Got: {result:?}");
}

#[test]
fn hierarchy_runs_the_whole_pipeline() -> dendro::Result<()> {
    let data = common::data_gen::tabular(30, 3, -1.0, 1.0);
    let labels = common::data_gen::labels(30);
    let labels = labels.iter().map(String::as_str).collect::<Vec<_>>();

    let tree = dendro::hierarchy(&data, &common::metrics::euclidean, LinkageMethod::Average, Some(&labels))?;
    assert_eq!(tree.cardinality(), 30);
    assert_eq!(tree.root().count(), 30);
    assert_eq!(tree.leaves()[17].label(), Some("obs-17"));

    // Every non-root node's parent lists it as a child.
    for node in tree.nodes() {
        let Some(parent) = tree.parent_of(node) else {
            assert_eq!(node.id(), tree.root().id(), "Only the root has no parent: {node:?}");
            continue;
        };
        let (left, right) = tree.children_of(parent).map_or_else(|| unreachable!("parents are merges"), |pair| pair);
        assert!(
            left.id() == node.id() || right.id() == node.id(),
            "Node {} is not a child of its parent {}",
            node.id(),
            parent.id()
        );
    }

    let par_tree = dendro::par_hierarchy(&data, &common::metrics::euclidean, LinkageMethod::Average, Some(&labels))?;
    for (node, par_node) in tree.nodes().iter().zip(par_tree.nodes()) {
        assert_eq!(node.id(), par_node.id());
        assert_eq!(node.children(), par_node.children());
        assert_eq!(node.distance(), par_node.distance(), "Node mismatch: {node:?}");
    }

    Ok(())
}

#[test]
fn deep_chains_build_without_recursion() -> dendro::Result<()> {
    // A maximally unbalanced tree: each merge absorbs one more leaf.
    let n = 5_000;
    let mut rows = vec![LinkageRow { left: 0, right: 1, distance: 1.0, size: 2 }];
    for k in 1..(n - 1) {
        rows.push(LinkageRow {
            left: k + 1,
            right: n + k - 1,
            distance: 1.0 + k as f64,
            size: k + 2,
        });
    }
    let z = LinkageMatrix::from_rows(rows);

    let tree = Dendrogram::from_linkage(&z, None)?;
    assert_eq!(tree.cardinality(), n);
    assert_eq!(tree.root().count(), n);

    // Walking up from the first leaf visits every merge node.
    let mut hops = 0;
    let mut node = &tree.leaves()[0];
    while let Some(parent) = tree.parent_of(node) {
        node = parent;
        hops += 1;
    }
    assert_eq!(hops, n - 1, "The chain should be n - 1 merges tall");

    let nested = tree.to_nested();
    let rebuilt = Dendrogram::from_nested(&nested)?;
    assert_eq!(rebuilt.root().count(), n);

    Ok(())
}
