//! Turning a flat version list into a single-rooted tree.

use palimpsest_core::{Version, VersionId};
use palimpsest_error::{PalimpsestResult, TreeError, TreeErrorKind};
use std::collections::{BTreeMap, BTreeSet};

/// Position of a node in a [`VersionTree`].
pub type NodeIndex = usize;

/// One node of a [`VersionTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// The version this node stands for; `None` for the synthetic root
    pub version: Option<VersionId>,
    /// Version number, 0 for the synthetic root
    pub ordinal: u32,
    /// Whether this is the published version
    pub is_published: bool,
    /// Parent node; `None` only for the synthetic root
    pub parent: Option<NodeIndex>,
    /// Children ordered by ordinal
    pub children: Vec<NodeIndex>,
    /// Distance from the synthetic root
    pub depth: usize,
}

impl TreeNode {
    /// True for the injected root.
    pub fn is_synthetic(&self) -> bool {
        self.version.is_none()
    }
}

/// Versions arranged under one synthetic root.
///
/// Every version without a `from_version` is a child of the root, so a
/// project with several independent lineages still forms one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTree {
    nodes: Vec<TreeNode>,
}

impl VersionTree {
    /// Index of the synthetic root.
    pub const ROOT: NodeIndex = 0;

    /// The synthetic root.
    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    /// Node at `index`.
    pub fn node(&self, index: NodeIndex) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// All nodes, root first, then versions in input order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Number of versions, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// True when no versions were given.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the node for `id`.
    pub fn find(&self, id: &VersionId) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(|node| node.version.as_ref() == Some(id))
    }

    /// Node indices in depth-first pre-order, children by ordinal.
    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev());
        }
        order
    }

    /// Node indices with every child before its parent.
    pub fn post_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(Self::ROOT, false)];
        while let Some((index, expanded)) = stack.pop() {
            if expanded {
                order.push(index);
                continue;
            }
            stack.push((index, true));
            stack.extend(self.nodes[index].children.iter().rev().map(|&c| (c, false)));
        }
        order
    }
}

/// Build the tree, injecting the synthetic root.
///
/// Fails when an id appears twice, when a `from_version` names a version
/// outside the list, or when parent links form a cycle.
#[tracing::instrument(skip(versions), fields(count = versions.len()))]
pub fn stratify(versions: &[Version]) -> PalimpsestResult<VersionTree> {
    let mut index = BTreeMap::<&VersionId, NodeIndex>::new();
    for (offset, version) in versions.iter().enumerate() {
        if index.insert(&version.id, offset + 1).is_some() {
            return Err(TreeError::new(TreeErrorKind::DuplicateId(version.id.to_string())).into());
        }
    }

    let mut nodes = Vec::with_capacity(versions.len() + 1);
    nodes.push(TreeNode {
        version: None,
        ordinal: 0,
        is_published: false,
        parent: None,
        children: Vec::new(),
        depth: 0,
    });
    for version in versions {
        let parent = match &version.from_version {
            None => VersionTree::ROOT,
            Some(parent) => *index.get(parent).ok_or_else(|| {
                TreeError::new(TreeErrorKind::MissingParent {
                    child: version.id.to_string(),
                    parent: parent.to_string(),
                })
            })?,
        };
        nodes.push(TreeNode {
            version: Some(version.id.clone()),
            ordinal: version.ordinal,
            is_published: version.is_published,
            parent: Some(parent),
            children: Vec::new(),
            depth: 0,
        });
    }

    for child in 1..nodes.len() {
        if let Some(parent) = nodes[child].parent {
            nodes[parent].children.push(child);
        }
    }
    for parent in 0..nodes.len() {
        let mut children = std::mem::take(&mut nodes[parent].children);
        children.sort_by(|&a, &b| {
            (nodes[a].ordinal, &nodes[a].version).cmp(&(nodes[b].ordinal, &nodes[b].version))
        });
        nodes[parent].children = children;
    }

    let mut reached = vec![false; nodes.len()];
    let mut stack = vec![VersionTree::ROOT];
    reached[VersionTree::ROOT] = true;
    while let Some(current) = stack.pop() {
        let depth = nodes[current].depth + 1;
        let children = nodes[current].children.clone();
        for child in children {
            nodes[child].depth = depth;
            reached[child] = true;
            stack.push(child);
        }
    }

    if let Some(stray) = reached.iter().position(|r| !r) {
        let on_cycle = cycle_member(&nodes, stray);
        let id = nodes[on_cycle]
            .version
            .as_ref()
            .map(VersionId::to_string)
            .unwrap_or_default();
        return Err(TreeError::new(TreeErrorKind::Cycle(id)).into());
    }

    tracing::debug!(versions = versions.len(), "Stratified version tree");
    Ok(VersionTree { nodes })
}

/// Follow parent links from `start` until a node repeats; that node lies on the cycle.
fn cycle_member(nodes: &[TreeNode], start: NodeIndex) -> NodeIndex {
    let mut seen = BTreeSet::new();
    let mut current = start;
    while seen.insert(current) {
        match nodes[current].parent {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}
