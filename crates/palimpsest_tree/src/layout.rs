//! Positioning a version tree for drawing.

use crate::config::LayoutConfig;
use crate::stratify::{NodeIndex, VersionTree, stratify};
use palimpsest_core::{Version, VersionId};
use palimpsest_error::PalimpsestResult;
use serde::{Deserialize, Serialize};

/// A positioned version. `x`/`y` are the top-left corner of the node box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Version id
    pub id: VersionId,
    /// Version number
    pub ordinal: u32,
    /// Parent version, absent for lineage roots
    pub parent: Option<VersionId>,
    /// Whether this is the published version
    pub is_published: bool,
    /// Level in the drawing, 0 for lineage roots
    pub depth: usize,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

/// A parent to child link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    /// Parent version
    pub source: VersionId,
    /// Child version
    pub target: VersionId,
}

/// Positioned nodes and edges, without the synthetic root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeLayout {
    /// Nodes in depth-first order
    pub nodes: Vec<LayoutNode>,
    /// One edge per version that has a parent version
    pub edges: Vec<LayoutEdge>,
    /// The version the viewport is centered on
    pub focus: Option<VersionId>,
}

impl TreeLayout {
    /// Look up a node by version id.
    pub fn node(&self, id: &VersionId) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }
}

/// Lay out `versions` as a tidy tree centered on the published version.
///
/// Leaves take successive horizontal slots in depth-first order and every
/// parent sits midway between its first and last child. Levels are spaced
/// by node height plus vertical gap. The result is shifted so the focus
/// node (the published version, else the first lineage root) is centered
/// in the viewport.
#[tracing::instrument(skip(versions, config), fields(count = versions.len()))]
pub fn layout_versions(versions: &[Version], config: &LayoutConfig) -> PalimpsestResult<TreeLayout> {
    let tree = stratify(versions)?;
    if tree.is_empty() {
        return Ok(TreeLayout::default());
    }

    let slots = assign_slots(&tree);
    let focus = focus_node(&tree);
    let (dx, dy) = match focus {
        Some(index) => {
            let (fx, fy) = position(&tree, &slots, index, config);
            (
                config.viewport_width() / 2.0 - (fx + config.node_width() / 2.0),
                config.viewport_height() / 2.0 - (fy + config.node_height() / 2.0),
            )
        }
        None => (0.0, 0.0),
    };

    let mut layout = TreeLayout {
        focus: focus.and_then(|index| tree.nodes()[index].version.clone()),
        ..TreeLayout::default()
    };
    for index in tree.pre_order() {
        let node = &tree.nodes()[index];
        let Some(id) = &node.version else {
            continue;
        };
        let parent = node
            .parent
            .and_then(|p| tree.nodes()[p].version.clone());
        if let Some(source) = &parent {
            layout.edges.push(LayoutEdge {
                source: source.clone(),
                target: id.clone(),
            });
        }
        let (x, y) = position(&tree, &slots, index, config);
        layout.nodes.push(LayoutNode {
            id: id.clone(),
            ordinal: node.ordinal,
            parent,
            is_published: node.is_published,
            depth: node.depth - 1,
            x: x + dx,
            y: y + dy,
        });
    }

    tracing::debug!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        focus = ?layout.focus,
        "Laid out version tree"
    );
    Ok(layout)
}

/// Horizontal slot of every node; leaves are whole numbers.
fn assign_slots(tree: &VersionTree) -> Vec<f64> {
    let mut slots = vec![0.0; tree.nodes().len()];
    let mut next_leaf = 0.0;
    for index in tree.post_order() {
        let children = &tree.nodes()[index].children;
        slots[index] = match (children.first(), children.last()) {
            (Some(&first), Some(&last)) => (slots[first] + slots[last]) / 2.0,
            _ => {
                let slot = next_leaf;
                next_leaf += 1.0;
                slot
            }
        };
    }
    slots
}

fn position(tree: &VersionTree, slots: &[f64], index: NodeIndex, config: &LayoutConfig) -> (f64, f64) {
    let level = tree.nodes()[index].depth.saturating_sub(1) as f64;
    (slots[index] * config.slot_width(), level * config.level_height())
}

fn focus_node(tree: &VersionTree) -> Option<NodeIndex> {
    tree.nodes()
        .iter()
        .position(|node| node.is_published && !node.is_synthetic())
        .or_else(|| tree.root().children.first().copied())
}
