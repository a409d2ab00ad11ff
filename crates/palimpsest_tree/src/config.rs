//! Layout geometry.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Node size, spacing and viewport used by [`layout_versions`](crate::layout_versions).
///
/// Loaded from the `[tree]` table of the configuration file; every field
/// has a default.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct LayoutConfig {
    /// Width of one node box
    #[serde(default = "default_node_width")]
    #[builder(default = "default_node_width()")]
    node_width: f64,

    /// Height of one node box
    #[serde(default = "default_node_height")]
    #[builder(default = "default_node_height()")]
    node_height: f64,

    /// Space between neighbouring leaf slots
    #[serde(default = "default_horizontal_gap")]
    #[builder(default = "default_horizontal_gap()")]
    horizontal_gap: f64,

    /// Space between tree levels
    #[serde(default = "default_vertical_gap")]
    #[builder(default = "default_vertical_gap()")]
    vertical_gap: f64,

    /// Width of the area the tree is drawn in
    #[serde(default = "default_viewport_width")]
    #[builder(default = "default_viewport_width()")]
    viewport_width: f64,

    /// Height of the area the tree is drawn in
    #[serde(default = "default_viewport_height")]
    #[builder(default = "default_viewport_height()")]
    viewport_height: f64,
}

fn default_node_width() -> f64 {
    200.0
}

fn default_node_height() -> f64 {
    80.0
}

fn default_horizontal_gap() -> f64 {
    40.0
}

fn default_vertical_gap() -> f64 {
    60.0
}

fn default_viewport_width() -> f64 {
    1200.0
}

fn default_viewport_height() -> f64 {
    800.0
}

impl LayoutConfig {
    /// Distance between the left edges of adjacent leaf slots.
    pub fn slot_width(&self) -> f64 {
        self.node_width + self.horizontal_gap
    }

    /// Distance between the top edges of adjacent levels.
    pub fn level_height(&self) -> f64 {
        self.node_height + self.vertical_gap
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: default_node_width(),
            node_height: default_node_height(),
            horizontal_gap: default_horizontal_gap(),
            vertical_gap: default_vertical_gap(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}
