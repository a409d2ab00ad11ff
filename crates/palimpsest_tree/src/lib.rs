//! Version tree layout for Palimpsest.
//!
//! Versions form a forest through their `from_version` links. [`stratify`]
//! hangs every parentless version under one synthetic root so the forest
//! becomes a single tree, and [`layout_versions`] positions that tree for
//! drawing, centered on the published version.
//!
//! # Example
//!
//! ```
//! use palimpsest_tree::{LayoutConfig, layout_versions};
//!
//! let layout = layout_versions(&[], &LayoutConfig::default()).unwrap();
//! assert!(layout.nodes.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod layout;
mod stratify;

pub use config::{LayoutConfig, LayoutConfigBuilder};
pub use layout::{LayoutEdge, LayoutNode, TreeLayout, layout_versions};
pub use stratify::{NodeIndex, TreeNode, VersionTree, stratify};
