use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

use vello::kurbo::{CircleSegment, Point};

use crate::animation::{AngularExtent, ArcTween};
use crate::layout::{Layout, PositionedNode};
use crate::render::colors::{node_color, AppColor};
use crate::tree::arena::{NodeId, NodeKey, NodeTree};

/// Static description of one drawable wedge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgeShape {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub fill: AppColor,
}

/// A rendered wedge plus the interaction state attached to it.
#[derive(Debug, Clone)]
pub struct Wedge {
    pub node: NodeId,
    pub key: NodeKey,
    pub depth: u16,
    /// Angular extent currently on screen
    pub shown: AngularExtent,
    /// Zoom tween from the previous position to the layout target
    pub tween: ArcTween,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub fill: AppColor,
    pub opacity: f32,
    /// Whether pointer-enter is currently delivered for this wedge
    pub hover_armed: bool,
    /// The layout root occupies the centre but is never drawn
    pub visible: bool,
}

impl Wedge {
    pub fn shape(&self) -> WedgeShape {
        WedgeShape {
            start_angle: self.shown.start,
            end_angle: self.shown.end(),
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
            fill: self.fill,
        }
    }

    /// Whether the polar point (`angle` clockwise from 12 o'clock, `radius`
    /// in layout units) lies on this wedge as currently shown.
    pub fn contains(&self, angle: f64, radius: f64) -> bool {
        angle >= self.shown.start
            && angle < self.shown.end()
            && radius >= self.inner_radius
            && radius < self.outer_radius
    }
}

/// Maps positioned nodes to wedges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcRenderer;

impl ArcRenderer {
    pub fn describe(&self, tree: &NodeTree, arc: &PositionedNode) -> WedgeShape {
        WedgeShape {
            start_angle: arc.start,
            end_angle: arc.end(),
            inner_radius: arc.inner_radius,
            outer_radius: arc.outer_radius,
            fill: node_color(tree, arc.node),
        }
    }

    /// Build the complete wedge set for a layout.
    ///
    /// Wedges whose key appears in `previous` start from that extent; the
    /// rest grow from a zero span at their target start.
    pub fn build_wedges(
        &self,
        tree: &NodeTree,
        layout: &Layout,
        previous: &HashMap<NodeKey, AngularExtent>,
    ) -> Vec<Wedge> {
        let mut claimed = std::collections::HashSet::new();
        layout
            .arcs
            .iter()
            .map(|arc| {
                let key = tree.key_of(arc.node);
                let target = AngularExtent::from(arc);
                // Duplicate keys: only the first occurrence inherits a position.
                let from = match previous.get(&key) {
                    Some(extent) if claimed.insert(key.clone()) => *extent,
                    _ => AngularExtent::collapsed_at(target.start),
                };
                let shape = self.describe(tree, arc);
                Wedge {
                    node: arc.node,
                    key,
                    depth: arc.depth,
                    shown: from,
                    tween: ArcTween::new(from, target),
                    inner_radius: shape.inner_radius,
                    outer_radius: shape.outer_radius,
                    fill: shape.fill,
                    opacity: 1.0,
                    hover_armed: true,
                    visible: arc.depth > 0,
                }
            })
            .collect()
    }
}

/// Displayed extents keyed for the next rebuild. First occurrence of a key wins.
pub fn snapshot_extents(wedges: &[Wedge]) -> HashMap<NodeKey, AngularExtent> {
    let mut extents = HashMap::with_capacity(wedges.len());
    for wedge in wedges {
        extents.entry(wedge.key.clone()).or_insert(wedge.shown);
    }
    extents
}

/// Annular sector for a wedge, centred at `center`, with layout radii scaled by `scale`.
pub fn wedge_path(shape: &WedgeShape, center: Point, scale: f64) -> CircleSegment {
    // Layout angles run clockwise from 12 o'clock; kurbo's run clockwise from 3 o'clock (y down).
    CircleSegment::new(
        center,
        shape.outer_radius * scale,
        shape.inner_radius * scale,
        shape.start_angle - FRAC_PI_2,
        shape.end_angle - shape.start_angle,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};
    use crate::tree::build_tree;
    use crate::tree::input::RawNode;

    fn tree() -> NodeTree {
        build_tree(&RawNode::branch(
            "root",
            vec![RawNode::leaf("A", 60.0).with_color("#3182bd"), RawNode::leaf("B", 40.0)],
        ))
        .unwrap()
    }

    #[test]
    fn root_wedge_is_hidden() {
        let tree = tree();
        let layout = compute_layout(&tree, tree.root, &LayoutConfig::default());
        let wedges = ArcRenderer.build_wedges(&tree, &layout, &HashMap::new());
        assert_eq!(wedges.len(), 3);
        assert!(!wedges[0].visible);
        assert!(wedges[1..].iter().all(|w| w.visible && w.hover_armed));
    }

    #[test]
    fn describe_uses_layout_extents_and_color() {
        let tree = tree();
        let layout = compute_layout(&tree, tree.root, &LayoutConfig::default());
        let shape = ArcRenderer.describe(&tree, &layout.arcs[1]);
        assert_eq!(shape.start_angle, 0.0);
        assert!((shape.end_angle - 0.6 * std::f64::consts::TAU).abs() < 1e-9);
        assert_eq!(shape.fill, AppColor::from_rgb8(0x31, 0x82, 0xbd));
    }

    #[test]
    fn matched_keys_start_from_previous_extent() {
        let tree = tree();
        let layout = compute_layout(&tree, tree.root, &LayoutConfig::default());
        let mut previous = HashMap::new();
        let a_key = tree.key_of(layout.arcs[1].node);
        previous.insert(a_key, AngularExtent::new(1.0, 0.5));

        let wedges = ArcRenderer.build_wedges(&tree, &layout, &previous);
        assert_eq!(wedges[1].shown, AngularExtent::new(1.0, 0.5));
        assert_eq!(wedges[1].tween.to, AngularExtent::from(&layout.arcs[1]));
        // B has no previous position and grows in place.
        assert_eq!(wedges[2].shown.span, 0.0);
        assert_eq!(wedges[2].shown.start, layout.arcs[2].start);
    }

    #[test]
    fn contains_respects_angle_and_ring() {
        let tree = tree();
        let layout = compute_layout(&tree, tree.root, &LayoutConfig::default());
        let mut wedges = ArcRenderer.build_wedges(&tree, &layout, &HashMap::new());
        for w in &mut wedges {
            w.shown = w.tween.to;
        }
        let a = &wedges[1];
        let mid_ring = (a.inner_radius + a.outer_radius) / 2.0;
        assert!(a.contains(0.1, mid_ring));
        assert!(!a.contains(0.1, a.inner_radius / 2.0));
        assert!(!a.contains(5.0, mid_ring));
    }
}
