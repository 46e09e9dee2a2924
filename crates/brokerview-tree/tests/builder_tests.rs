use brokerview_tree::{Found, ManagementTree, NodeKind, Selection};

fn labels_of_children(tree: &ManagementTree, id: brokerview_tree::NodeId) -> Vec<String> {
    tree.node(id)
        .children
        .iter()
        .map(|&c| tree.node(c).label.clone())
        .collect()
}

#[test]
fn test_merge_creates_chain() {
    let mut tree = ManagementTree::new();
    let leaf = tree
        .merge("org.example:broker=B1,address=A1,queue=Q1")
        .unwrap();
    assert_eq!(tree.len(), 4); // root + broker + address + queue
    let node = tree.node(leaf);
    assert_eq!(node.label, "Q1");
    assert_eq!(node.kind, NodeKind::Queue);
    assert_eq!(node.id, "org.example:broker=B1,address=A1,queue=Q1");
}

#[test]
fn test_merge_is_idempotent() {
    let names = [
        "org.example:broker=B1",
        "org.example:broker=B1,address=A1",
        "org.example:broker=B1,address=A1,queue=Q1",
    ];
    let mut tree = ManagementTree::new();
    let first = tree.merge_batch(names);
    let count = tree.len();
    let second = tree.merge_batch(names);
    assert_eq!(tree.len(), count);
    assert_eq!(first.created, 3);
    assert_eq!(second.created, 0);
    assert_eq!(second.merged, 3);
}

#[test]
fn test_overlapping_paths_share_intermediates() {
    let mut tree = ManagementTree::new();
    tree.merge("org.example:broker=B1,address=A1,queue=Q1").unwrap();
    tree.merge("org.example:broker=B1,address=A1,queue=Q2").unwrap();

    let broker = tree.get("org.example:broker=B1").unwrap();
    let address = tree.get("org.example:broker=B1,address=A1").unwrap();
    assert_eq!(labels_of_children(&tree, tree.root()), vec!["B1"]);
    assert_eq!(labels_of_children(&tree, broker), vec!["A1"]);
    assert_eq!(labels_of_children(&tree, address), vec!["Q1", "Q2"]);
}

#[test]
fn test_source_key_order_does_not_duplicate() {
    let mut tree = ManagementTree::new();
    let a = tree.merge("org.example:broker=B1,address=A1,queue=Q1").unwrap();
    let b = tree.merge("org.example:queue=Q1,broker=B1,address=A1").unwrap();
    assert_eq!(a, b);
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_leaf_collision_is_reuse_not_error() {
    let mut tree = ManagementTree::new();
    let a = tree.merge("org.example:broker=B1,address=A1").unwrap();
    let b = tree.merge("org.example:broker=B1,address=A1").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_similar_broker_names_stay_distinct() {
    let mut tree = ManagementTree::new();
    tree.merge("org.example:broker=B1").unwrap();
    tree.merge("org.example:broker=B10").unwrap();
    assert_eq!(labels_of_children(&tree, tree.root()), vec!["B1", "B10"]);
    // B10 must not resolve to an ancestor match on B1.
    assert!(matches!(tree.find("org.example:broker=B10"), Found::Exact(_)));
}

#[test]
fn test_malformed_names_skipped_rest_of_batch_merges() {
    let mut tree = ManagementTree::new();
    let report = tree.merge_batch([
        "org.example:broker=B1",
        "not-an-object-name",
        "org.example:broker=B1,address=A1",
    ]);
    assert_eq!(report.merged, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_lookup_exact() {
    let mut tree = ManagementTree::new();
    tree.merge("org.example:broker=B1,address=A1").unwrap();
    let found = tree.find("org.example:broker=B1,address=A1");
    let Found::Exact(id) = found else {
        panic!("expected exact match, got {found:?}");
    };
    assert_eq!(tree.node(id).label, "A1");
}

#[test]
fn test_lookup_falls_back_to_deepest_ancestor() {
    let mut tree = ManagementTree::new();
    tree.merge("org.example:broker=B1,address=A1").unwrap();
    let found = tree.find("org.example:broker=B1,address=A1,queue=Q1");
    let Found::Ancestor(id) = found else {
        panic!("expected ancestor match, got {found:?}");
    };
    assert_eq!(tree.node(id).label, "A1");
    assert_eq!(tree.node(id).kind, NodeKind::Address);
}

#[test]
fn test_lookup_no_match_is_not_an_error() {
    let tree = ManagementTree::new();
    assert_eq!(tree.find("org.example:broker=B1"), Found::None);
    assert_eq!(tree.find("garbage"), Found::None);
}

#[test]
fn test_find_and_select_updates_selection_and_invokes_callback() {
    let mut tree = ManagementTree::new();
    tree.merge("org.example:broker=B1,address=DLQ").unwrap();

    let mut selection = Selection::default();
    let mut seen = Vec::new();
    let found = tree.find_and_select("org.example:broker=B1,address=DLQ", &mut selection, |node| {
        seen.push(node.label.clone());
    });

    assert!(matches!(found, Found::Exact(_)));
    assert_eq!(seen, vec!["DLQ"]);
    let selected = selection.selected().unwrap();
    assert_eq!(tree.node(selected).label, "DLQ");
}

#[test]
fn test_find_and_select_miss_leaves_selection_untouched() {
    let mut tree = ManagementTree::new();
    tree.merge("org.example:broker=B1").unwrap();

    let mut selection = Selection::default();
    tree.find_and_select("org.example:broker=B1", &mut selection, |_| {});
    let before = selection.selected();

    let found = tree.find_and_select("org.other:broker=X", &mut selection, |_| {
        panic!("callback must not run on a miss");
    });
    assert_eq!(found, Found::None);
    assert_eq!(selection.selected(), before);
}

#[test]
fn test_path_reconstruction_through_parents() {
    let mut tree = ManagementTree::new();
    let leaf = tree
        .merge("org.example:broker=B1,address=A1,queue=Q1")
        .unwrap();
    let chain: Vec<String> = tree
        .path_to(leaf)
        .into_iter()
        .map(|id| tree.node(id).label.clone())
        .collect();
    assert_eq!(chain, vec!["", "B1", "A1", "Q1"]);
}

#[test]
fn test_reset_clears_tree_and_selection() {
    let mut tree = ManagementTree::new();
    tree.merge("org.example:broker=B1").unwrap();
    let mut selection = Selection::default();
    tree.find_and_select("org.example:broker=B1", &mut selection, |_| {});
    assert!(selection.selected().is_some());

    tree.reset();
    selection.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 1);
    assert!(selection.selected().is_none());
}

#[test]
fn test_end_to_end_scenario() {
    let mut tree = ManagementTree::new();
    tree.merge_batch(["org.example:broker=B1", "org.example:broker=B1,address=DLQ"]);

    // Two-level tree: root -> B1 -> DLQ.
    assert_eq!(tree.len(), 3);
    let broker = tree.get("org.example:broker=B1").unwrap();
    assert_eq!(tree.node(broker).kind, NodeKind::Broker);
    assert_eq!(labels_of_children(&tree, broker), vec!["DLQ"]);

    let mut selection = Selection::default();
    let found = tree.find_and_select("org.example:broker=B1,address=DLQ", &mut selection, |_| {});
    let Found::Exact(id) = found else {
        panic!("expected exact match on DLQ");
    };
    assert_eq!(tree.node(id).label, "DLQ");
    assert_eq!(selection.selected(), Some(id));
}
