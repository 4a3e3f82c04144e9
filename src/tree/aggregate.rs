use super::arena::NodeTree;

/// Compute aggregated values for all internal nodes (bottom-up).
/// After this, each internal node's `value` equals the sum of its children's values.
pub fn aggregate_values(tree: &mut NodeTree) {
    // Process nodes in reverse order (children before parents) since
    // children always have higher indices than their parents in our arena.
    // This is guaranteed by the add_child insertion order.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let node = &tree.nodes[i];
        if node.is_leaf() {
            continue;
        }

        let mut total = 0.0;
        let mut child = node.first_child;
        while let Some(child_id) = child {
            total += tree.nodes[child_id.index()].value;
            child = tree.nodes[child_id.index()].next_sibling;
        }
        tree.nodes[i].value = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::arena::SunNode;

    #[test]
    fn internal_values_are_sums_of_children() {
        let mut tree = NodeTree::new(SunNode::new("root", 0.0, None));
        // Internal nodes ignore whatever value they were created with.
        let a = tree.add_child(tree.root, SunNode::new("A", 999.0, None));
        tree.add_child(a, SunNode::new("C", 50.0, None));
        tree.add_child(a, SunNode::new("D", 25.0, None));
        tree.add_child(tree.root, SunNode::new("B", 25.0, None));

        aggregate_values(&mut tree);

        assert_eq!(tree.get(a).value, 75.0);
        assert_eq!(tree.get(tree.root).value, 100.0);
    }
}
