pub mod aggregate;
pub mod arena;
pub mod input;

use std::path::{Path, PathBuf};

use self::arena::{NodeId, NodeTree, SunNode};
use self::input::RawNode;

/// Bundled demo hierarchy (source files of a robotics code base, sized in lines).
const SAMPLE_TREE_JSON: &str = include_str!("../../data/ravon.json");

/// Errors surfaced to whoever supplies the input tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("failed to read tree file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed tree JSON")]
    Json(#[from] serde_json::Error),
    #[error("node '{name}' has invalid size '{raw}' (expected a non-negative number)")]
    InvalidSize { name: String, raw: String },
}

/// Build a NodeTree from the raw input hierarchy.
///
/// Children keep their declared order. Leaves without `size` weigh 0.
/// Iterative, so arbitrarily deep inputs cannot overflow the stack.
pub fn build_tree(raw: &RawNode) -> Result<NodeTree, TreeError> {
    let mut tree = NodeTree::new(to_node(raw)?);

    // (input node, arena id of its parent)
    let mut stack: Vec<(&RawNode, NodeId)> = Vec::new();
    for child in raw.child_nodes().iter().rev() {
        stack.push((child, tree.root));
    }

    while let Some((raw_node, parent)) = stack.pop() {
        let id = tree.add_child(parent, to_node(raw_node)?);
        for child in raw_node.child_nodes().iter().rev() {
            stack.push((child, id));
        }
    }

    aggregate::aggregate_values(&mut tree);

    let root = tree.get(tree.root);
    tracing::info!(
        "Tree built: {} nodes, root '{}' with value {}",
        tree.len(),
        root.name,
        root.value
    );

    Ok(tree)
}

fn to_node(raw: &RawNode) -> Result<SunNode, TreeError> {
    let color = raw
        .color
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    // Size only counts on leaves; internal values are aggregated later.
    let value = if raw.child_nodes().is_empty() {
        match &raw.size {
            None => 0.0,
            Some(size) => match size.as_f64() {
                Some(v) if v.is_finite() && v >= 0.0 => v,
                _ => {
                    return Err(TreeError::InvalidSize {
                        name: raw.name.clone(),
                        raw: size.raw(),
                    })
                }
            },
        }
    } else {
        0.0
    };

    Ok(SunNode::new(&raw.name, value, color))
}

/// Parse and build a tree from JSON text.
pub fn parse_tree(json: &str) -> Result<NodeTree, TreeError> {
    let raw: RawNode = serde_json::from_str(json)?;
    build_tree(&raw)
}

/// Load a tree from a JSON file on disk.
pub fn load_tree(path: &Path) -> Result<NodeTree, TreeError> {
    tracing::info!("Loading tree from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tree(&text)
}

/// The bundled demo tree.
pub fn sample_tree() -> Result<NodeTree, TreeError> {
    parse_tree(SAMPLE_TREE_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::input::RawSize;

    #[test]
    fn builds_values_bottom_up_in_declared_order() {
        let raw = RawNode::branch(
            "root",
            vec![
                RawNode::branch("A", vec![RawNode::leaf("C", 50.0), RawNode::leaf("D", 25.0)]),
                RawNode::leaf("B", 25.0),
            ],
        );
        let tree = build_tree(&raw).unwrap();
        let names: Vec<_> = tree
            .children(tree.root)
            .map(|id| tree.get(id).name.to_string())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(tree.get(tree.root).value, 100.0);
        let a = tree.children(tree.root).next().unwrap();
        assert_eq!(tree.get(a).value, 75.0);
    }

    #[test]
    fn missing_leaf_size_counts_as_zero() {
        let mut leaf = RawNode::leaf("x", 0.0);
        leaf.size = None;
        let tree = build_tree(&RawNode::branch("root", vec![leaf, RawNode::leaf("y", 3.0)])).unwrap();
        assert_eq!(tree.get(tree.root).value, 3.0);
    }

    #[test]
    fn size_on_internal_node_is_ignored() {
        let mut branch = RawNode::branch("A", vec![RawNode::leaf("C", 2.0)]);
        branch.size = Some(RawSize::Number(1000.0));
        let tree = build_tree(&RawNode::branch("root", vec![branch])).unwrap();
        assert_eq!(tree.get(tree.root).value, 2.0);
    }

    #[test]
    fn rejects_negative_and_non_numeric_sizes() {
        let bad = RawNode::branch("root", vec![RawNode::leaf("neg", -1.0)]);
        assert!(matches!(build_tree(&bad), Err(TreeError::InvalidSize { .. })));

        let err = parse_tree(r#"{"name":"r","children":[{"name":"q","size":"lots"}]}"#);
        match err {
            Err(TreeError::InvalidSize { name, raw }) => {
                assert_eq!(name, "q");
                assert_eq!(raw, "lots");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn trims_supplied_colors() {
        let tree = parse_tree(r##"{"name":"r","color":" #d9d9d9","size":1}"##).unwrap();
        assert_eq!(tree.get(tree.root).color.as_deref(), Some("#d9d9d9"));
    }

    #[test]
    fn bundled_sample_loads() {
        let tree = sample_tree().unwrap();
        assert_eq!(tree.get(tree.root).name, "RAVON");
        assert!(tree.len() > 1000);
        assert!(tree.get(tree.root).value > 0.0);
    }
}
