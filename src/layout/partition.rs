use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::tree::arena::{NodeId, NodeTree};

/// A positioned wedge in the partition layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedNode {
    pub node: NodeId,
    /// Distance from the layout root (root = 0)
    pub depth: u16,
    pub value: f64,
    /// Start angle in radians, clockwise from 12 o'clock
    pub start: f64,
    /// Angular width in radians
    pub span: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl PositionedNode {
    pub fn end(&self) -> f64 {
        self.start + self.span
    }
}

/// The full layout result (arcs + fast lookup).
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Visible arcs in depth-first pre-order, layout root first
    pub arcs: Vec<PositionedNode>,
    /// node → index into `arcs`
    pub node_to_arc: HashMap<NodeId, usize>,
    pub root: NodeId,
    /// Value of the layout root (the 100% reference)
    pub total_value: f64,
    /// Number of concentric rings, root ring included
    pub levels: u16,
}

impl Layout {
    /// Layout with nothing laid out yet.
    pub fn empty(root: NodeId) -> Self {
        Self {
            arcs: Vec::new(),
            node_to_arc: HashMap::new(),
            root,
            total_value: 0.0,
            levels: 0,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&PositionedNode> {
        self.node_to_arc.get(&node).map(|&i| &self.arcs[i])
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

/// Configuration for the partition layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Arcs narrower than this (radians) are dropped from the output
    pub visibility_threshold: f64,
    /// Outer radius of the whole chart. 1.0 keeps the layout resolution-independent.
    pub radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.005,
            radius: 1.0,
        }
    }
}

/// Compute the sunburst partition for any subtree (root can be any node for drill-down).
///
/// Angular extents are proportional to `value / root.value`; each depth ring
/// receives an equal share of the disc's area, so radii follow a square-root
/// scale and ring areas stay comparable.
pub fn compute_layout(tree: &NodeTree, root: NodeId, config: &LayoutConfig) -> Layout {
    let total_value = tree.get(root).value;
    let levels = tree.height(root) + 1;
    let mut arcs = Vec::new();
    let mut node_to_arc = HashMap::new();

    if !(total_value > 0.0) || !total_value.is_finite() {
        tracing::debug!(
            "Skipping layout for root {:?} '{}' with zero value",
            root,
            tree.get(root).name
        );
        return Layout {
            arcs,
            node_to_arc,
            root,
            total_value: total_value.max(0.0),
            levels,
        };
    }

    let ring_area = config.radius * config.radius / levels as f64;
    let angle_per_unit = TAU / total_value;

    // Explicit stack keeps deep trees off the call stack.
    // (node, depth, start angle)
    let mut stack: Vec<(NodeId, u16, f64)> = vec![(root, 0, 0.0)];
    let mut children = Vec::new();

    while let Some((id, depth, start)) = stack.pop() {
        let node = tree.get(id);
        let span = if id == root {
            TAU
        } else {
            node.value * angle_per_unit
        };

        // Descendants are never wider than their parent.
        if span < config.visibility_threshold {
            continue;
        }

        let area_start = depth as f64 * ring_area;
        node_to_arc.insert(id, arcs.len());
        arcs.push(PositionedNode {
            node: id,
            depth,
            value: node.value,
            start,
            span,
            inner_radius: area_start.sqrt(),
            outer_radius: (area_start + ring_area).sqrt(),
        });

        children.clear();
        let mut offset = start;
        for child in tree.children(id) {
            children.push((child, depth + 1, offset));
            offset += tree.get(child).value * angle_per_unit;
        }
        // Reverse so the first child is popped (and emitted) first.
        stack.extend(children.drain(..).rev());
    }

    tracing::debug!(
        "Partition of '{}' (value={}): {} arcs over {} rings",
        tree.get(root).name,
        total_value,
        arcs.len(),
        levels
    );

    Layout {
        arcs,
        node_to_arc,
        root,
        total_value,
        levels,
    }
}
