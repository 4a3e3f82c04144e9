use std::fmt;

use compact_str::CompactString;

/// Index into the arena `Vec<SunNode>`. Uses u32 to keep nodes compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Join key correlating one node across two layout computations:
/// the node's name plus its level in the full tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub name: CompactString,
    pub level: u16,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.level)
    }
}

/// A single node of the hierarchy, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
#[derive(Debug, Clone)]
pub struct SunNode {
    /// Display name, unique among siblings only
    pub name: CompactString,
    /// Weight. For leaves: provided size. For internal nodes: sum of children.
    pub value: f64,
    /// Supplied colour string, if any (resolved by the renderer)
    pub color: Option<CompactString>,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// First child node index (None for leaves)
    pub first_child: Option<NodeId>,
    /// Last child, kept so children append in declared order
    pub last_child: Option<NodeId>,
    /// Next sibling node index (None if last child)
    pub next_sibling: Option<NodeId>,
    /// Position among siblings (drives the ordinal palette)
    pub sibling_index: u32,
    /// Distance from the tree root (root = 0)
    pub level: u16,
}

impl SunNode {
    pub fn new(name: &str, value: f64, color: Option<&str>) -> Self {
        Self {
            name: CompactString::new(name),
            value,
            color: color.map(CompactString::new),
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            sibling_index: 0,
            level: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }
}

/// The hierarchy stored as a flat arena of nodes.
#[derive(Debug, Clone)]
pub struct NodeTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<SunNode>,
    /// Root node index
    pub root: NodeId,
}

impl NodeTree {
    /// Create a tree holding only its root.
    pub fn new(root: SunNode) -> Self {
        let mut root = root;
        root.parent = None;
        root.level = 0;
        NodeTree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Append a child under the given parent, after its existing children.
    /// Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: SunNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        let parent_node = &self.nodes[parent.index()];
        node.parent = Some(parent);
        node.level = parent_node.level + 1;
        node.next_sibling = None;
        node.sibling_index = match parent_node.last_child {
            Some(last) => self.nodes[last.index()].sibling_index + 1,
            None => 0,
        };

        match parent_node.last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> &SunNode {
        &self.nodes[id.index()]
    }

    /// Get a node by ID, or `None` for an index outside the arena.
    pub fn try_get(&self, id: NodeId) -> Option<&SunNode> {
        self.nodes.get(id.index())
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node, in declared order.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    pub fn key_of(&self, id: NodeId) -> NodeKey {
        let node = self.get(id);
        NodeKey {
            name: node.name.clone(),
            level: node.level,
        }
    }

    /// Number of edges on the longest downward path from `id`.
    pub fn height(&self, id: NodeId) -> u16 {
        let base = self.get(id).level;
        let mut max_level = base;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            max_level = max_level.max(self.get(current).level);
            stack.extend(self.children(current));
        }
        max_level - base
    }

    /// Ancestor chain of `node`, outermost first and ending with `node`,
    /// excluding `layout_root`. Stops early at a dangling parent index and
    /// returns what was collected so far.
    pub fn ancestors_of(&self, node: NodeId, layout_root: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = node;
        loop {
            if current == layout_root {
                break;
            }
            let Some(entry) = self.try_get(current) else {
                break;
            };
            match entry.parent {
                Some(parent) => {
                    chain.push(current);
                    current = parent;
                }
                // Reached the tree root without meeting `layout_root`.
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    /// Slash-joined names from the tree root down to `id`.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);

        while let Some(id) = current {
            let Some(node) = self.try_get(id) else {
                break;
            };
            parts.push(node.name.as_str());
            current = node.parent;
        }

        parts.reverse();
        parts.join("/")
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a NodeTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (NodeTree, [NodeId; 4]) {
        let mut tree = NodeTree::new(SunNode::new("root", 0.0, None));
        let a = tree.add_child(tree.root, SunNode::new("A", 0.0, None));
        let b = tree.add_child(tree.root, SunNode::new("B", 25.0, None));
        let c = tree.add_child(a, SunNode::new("C", 50.0, None));
        let root = tree.root;
        (tree, [a, b, c, root])
    }

    #[test]
    fn children_keep_declared_order() {
        let (tree, [a, b, _, root]) = small_tree();
        let kids: Vec<_> = tree.children(root).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.get(b).sibling_index, 1);
    }

    #[test]
    fn ancestors_of_root_is_empty() {
        let (tree, [.., root]) = small_tree();
        assert!(tree.ancestors_of(root, root).is_empty());
    }

    #[test]
    fn ancestors_are_outermost_first_and_end_with_node() {
        let (tree, [a, _, c, root]) = small_tree();
        assert_eq!(tree.ancestors_of(c, root), vec![a, c]);
        assert_eq!(tree.ancestors_of(c, a), vec![c]);
    }

    #[test]
    fn ancestors_stop_at_dangling_parent() {
        let (mut tree, [a, _, c, root]) = small_tree();
        tree.nodes[a.index()].parent = Some(NodeId(999));
        assert_eq!(tree.ancestors_of(c, root), vec![a, c]);
        assert!(tree.ancestors_of(NodeId(1234), root).is_empty());
    }

    #[test]
    fn key_joins_name_and_level() {
        let (tree, [_, _, c, _]) = small_tree();
        assert_eq!(tree.key_of(c).to_string(), "C2");
        assert_eq!(tree.path_of(c), "root/A/C");
        assert_eq!(tree.height(tree.root), 2);
    }
}
