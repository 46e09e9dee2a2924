//! The tree itself: arena storage, merge, and lookup.

use std::collections::HashMap;

use brokerview_mbean::{render_value, MbeanError, ObjectName};

use crate::node::{NodeId, TreeNode};
use crate::path::{resolve_path, PathSegment};

/// Outcome of a lookup.
///
/// `None` is a normal negative result, not an error: the entity may simply
/// not have been discovered yet, and the caller retries on the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Exact(NodeId),
    /// Deepest ancestor whose id prefixes the target, selected so the
    /// view still highlights something sensible while finer nodes load.
    Ancestor(NodeId),
    None,
}

/// Per-view selection state.
///
/// Owned by the view-state object and passed explicitly into
/// [`ManagementTree::find_and_select`]; cleared whenever the tree is
/// rebuilt from scratch, since node ids do not survive a reset.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<NodeId>,
}

impl Selection {
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

/// Counters for one batch merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Names successfully merged (created or reused).
    pub merged: usize,
    /// Nodes newly created across the batch.
    pub created: usize,
    /// Malformed names logged and skipped.
    pub skipped: usize,
}

/// Tree of management entities, built incrementally from object names.
///
/// Nodes live in an arena and are only ever appended as children, so the
/// structure cannot form cycles and never reparents. All operations are
/// synchronous and run to completion; the owning session serializes
/// merges (they are not reentrant-safe).
#[derive(Debug, Clone)]
pub struct ManagementTree {
    nodes: Vec<TreeNode>,
    index: HashMap<String, NodeId>,
}

impl Default for ManagementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagementTree {
    pub fn new() -> Self {
        ManagementTree {
            nodes: vec![TreeNode::root()],
            index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Node count including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Node whose id equals the canonical identifier, if present.
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Drop every node except a fresh root. The owning view must clear
    /// its [`Selection`] alongside; ids from before the reset are stale.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(TreeNode::root());
        self.index.clear();
    }

    /// Merge one object name into the tree, creating missing nodes along
    /// its resolved path, and return the leaf node.
    ///
    /// Matching is by accumulated canonical id, so repeated and
    /// overlapping merges reuse existing nodes instead of duplicating
    /// them. A leaf whose id already exists is reused as-is.
    pub fn merge(&mut self, raw: &str) -> Result<NodeId, MbeanError> {
        let name = ObjectName::parse(raw)?;
        let path = resolve_path(&name);

        let mut current = self.root();
        let mut accumulated = format!("{}:", name.domain);
        for (depth, segment) in path.iter().enumerate() {
            if depth > 0 {
                accumulated.push(',');
            }
            accumulated.push_str(&segment.key);
            accumulated.push('=');
            accumulated.push_str(&render_value(&segment.value));

            current = match self.index.get(&accumulated) {
                Some(&existing) => existing,
                None => self.insert_child(current, &accumulated, segment),
            };
        }
        Ok(current)
    }

    /// Merge a whole query result. Malformed names are logged and
    /// skipped; the rest of the batch still merges.
    pub fn merge_batch<I, S>(&mut self, names: I) -> MergeReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = MergeReport::default();
        let before = self.nodes.len();
        for name in names {
            match self.merge(name.as_ref()) {
                Ok(_) => report.merged += 1,
                Err(err) => {
                    tracing::warn!(name = name.as_ref(), %err, "skipping malformed object name");
                    report.skipped += 1;
                }
            }
        }
        report.created = self.nodes.len() - before;
        tracing::debug!(
            merged = report.merged,
            created = report.created,
            skipped = report.skipped,
            nodes = self.nodes.len(),
            "merged management query result"
        );
        report
    }

    /// Look up the node for `target`, which may name an entity only
    /// partially discovered.
    ///
    /// The target is canonicalized through the same parser and path
    /// resolver as merged names, then matched segment by segment, so a
    /// broker named `B1` can never falsely match one named `B10`.
    pub fn find(&self, target: &str) -> Found {
        let name = match ObjectName::parse(target) {
            Ok(name) => name,
            Err(err) => {
                tracing::debug!(target, %err, "lookup target is not a valid object name");
                return Found::None;
            }
        };
        let path = resolve_path(&name);

        let mut current = self.root();
        let mut matched = 0;
        let mut accumulated = format!("{}:", name.domain);
        for (depth, segment) in path.iter().enumerate() {
            if depth > 0 {
                accumulated.push(',');
            }
            accumulated.push_str(&segment.key);
            accumulated.push('=');
            accumulated.push_str(&render_value(&segment.value));

            match self.index.get(&accumulated) {
                Some(&child) => {
                    current = child;
                    matched += 1;
                }
                None => break,
            }
        }

        if matched == path.len() && !path.is_empty() {
            Found::Exact(current)
        } else if matched > 0 {
            Found::Ancestor(current)
        } else {
            Found::None
        }
    }

    /// [`find`](Self::find), recording the hit in `selection` and
    /// handing the resolved node to `on_select` so the view can react.
    /// A miss leaves the selection untouched.
    pub fn find_and_select<F>(&self, target: &str, selection: &mut Selection, mut on_select: F) -> Found
    where
        F: FnMut(&TreeNode),
    {
        let found = self.find(target);
        match found {
            Found::Exact(id) | Found::Ancestor(id) => {
                selection.selected = Some(id);
                on_select(self.node(id));
            }
            Found::None => {}
        }
        found
    }

    /// Chain of nodes from the root down to `id`, reconstructed through
    /// the parent back-references. Used by the view to expand ancestors
    /// of a selected node.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    fn insert_child(&mut self, parent: NodeId, id: &str, segment: &PathSegment) -> NodeId {
        let child = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            id: id.to_string(),
            label: segment.value.clone(),
            kind: segment.kind,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(child);
        self.index.insert(id.to_string(), child);
        child
    }
}
