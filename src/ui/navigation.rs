use crate::tree::arena::{NodeId, NodeTree};

/// View context: which node is the full-circle root and the value that
/// percentages are measured against. Only changed by activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    pub focus_root: NodeId,
    pub total_value: f64,
}

impl ViewContext {
    pub fn new(tree: &NodeTree) -> Self {
        Self {
            focus_root: tree.root,
            total_value: tree.get(tree.root).value,
        }
    }

    /// Node that activating `node` should re-root at, if any.
    /// Every node re-roots at itself except the current root.
    pub fn drill_target(&self, node: NodeId, tree: &NodeTree) -> Option<NodeId> {
        tree.try_get(node)?;
        (node != self.focus_root).then_some(node)
    }

    /// Parent of the current root, if it has one.
    pub fn parent_target(&self, tree: &NodeTree) -> Option<NodeId> {
        tree.try_get(self.focus_root)?.parent
    }

    pub fn focus(&mut self, node: NodeId, tree: &NodeTree) {
        self.focus_root = node;
        self.total_value = tree.get(node).value;
    }
}
