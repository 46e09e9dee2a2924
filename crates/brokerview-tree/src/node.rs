use serde::{Deserialize, Serialize};

/// Index of a node inside its owning [`crate::ManagementTree`].
///
/// Ids are invalidated by `reset()`; the owning view clears its selection
/// alongside the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

/// Entity classification, used by the view for icons and ordering.
/// Classification never affects merge or lookup correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Root,
    Broker,
    AddressGroup,
    Address,
    QueueGroup,
    Queue,
    Other,
}

/// One entity in the management hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Canonical accumulated object-name prefix. Unique among siblings
    /// (and, with canonical rendering, unique across the tree).
    pub id: String,
    /// Display name, the value of the most specific key.
    pub label: String,
    pub kind: NodeKind,
    /// Children in discovery order. Never re-sorted.
    pub children: Vec<NodeId>,
    /// Back-reference for path reconstruction only; ownership runs
    /// parent to child through the arena.
    pub parent: Option<NodeId>,
}

impl TreeNode {
    pub(crate) fn root() -> Self {
        TreeNode {
            id: String::new(),
            label: String::new(),
            kind: NodeKind::Root,
            children: Vec::new(),
            parent: None,
        }
    }
}
