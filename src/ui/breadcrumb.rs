//! Breadcrumb trail: the hovered node's ancestor chain drawn as a row of
//! arrow-shaped crumbs, followed by the percentage readout.
//!
//! Crumbs are keyed by [`NodeKey`]. An update appends crumbs for new keys,
//! drops crumbs whose key left the chain (immediately, no exit animation),
//! and re-positions every remaining crumb by its index in the chain.

use compact_str::CompactString;

use crate::render::colors::{node_color, AppColor};
use crate::tree::arena::{NodeId, NodeKey, NodeTree};

/// Breadcrumb dimensions: width, height, spacing, width of tip/tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreadcrumbDims {
    pub w: f64,
    pub h: f64,
    pub s: f64,
    pub t: f64,
}

impl Default for BreadcrumbDims {
    fn default() -> Self {
        Self {
            w: 220.0,
            h: 50.0,
            s: 3.0,
            t: 50.0,
        }
    }
}

impl BreadcrumbDims {
    /// Horizontal distance between consecutive crumbs.
    pub fn stride(&self) -> f64 {
        self.w + self.s
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crumb {
    pub key: NodeKey,
    pub node: NodeId,
    pub label: CompactString,
    pub fill: AppColor,
    pub index: usize,
    /// Left edge of the crumb within the trail
    pub offset_x: f64,
}

/// Trailing percentage label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndLabel {
    pub text: String,
    /// Horizontal centre of the label
    pub x: f64,
}

/// What an update changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrailUpdate {
    pub entered: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BreadcrumbTrail {
    crumbs: Vec<Crumb>,
    end_label: EndLabel,
    visible: bool,
    dims: BreadcrumbDims,
}

impl BreadcrumbTrail {
    pub fn new(dims: BreadcrumbDims) -> Self {
        Self {
            dims,
            ..Self::default()
        }
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    pub fn end_label(&self) -> &EndLabel {
        &self.end_label
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn dims(&self) -> BreadcrumbDims {
        self.dims
    }

    pub fn set_dims(&mut self, dims: BreadcrumbDims) {
        self.dims = dims;
        self.reposition();
    }

    pub fn labels(&self) -> Vec<&str> {
        self.crumbs.iter().map(|c| c.label.as_str()).collect()
    }

    /// Show `chain` (outermost first) with `percentage` as the end label and make the trail visible.
    pub fn update(&mut self, tree: &NodeTree, chain: &[NodeId], percentage: &str) -> TrailUpdate {
        let keys: Vec<NodeKey> = chain.iter().map(|&id| tree.key_of(id)).collect();

        let before = self.crumbs.len();
        self.crumbs.retain(|crumb| keys.contains(&crumb.key));
        let removed = before - self.crumbs.len();

        let mut entered = 0;
        let mut next = Vec::with_capacity(keys.len());
        for (index, (key, &node)) in keys.into_iter().zip(chain).enumerate() {
            let crumb = match self.crumbs.iter().position(|c| c.key == key) {
                Some(pos) => {
                    let mut crumb = self.crumbs.swap_remove(pos);
                    crumb.node = node;
                    crumb
                }
                None => {
                    entered += 1;
                    Crumb {
                        label: tree.get(node).name.clone(),
                        fill: node_color(tree, node),
                        key,
                        node,
                        index,
                        offset_x: 0.0,
                    }
                }
            };
            next.push(crumb);
        }
        self.crumbs = next;
        self.end_label.text = percentage.to_string();
        self.reposition();
        self.visible = true;

        TrailUpdate { entered, removed }
    }

    fn reposition(&mut self) {
        let stride = self.dims.stride();
        for (index, crumb) in self.crumbs.iter_mut().enumerate() {
            crumb.index = index;
            crumb.offset_x = index as f64 * stride;
        }
        self.end_label.x = (self.crumbs.len() as f64 + 0.5) * stride;
    }
}

/// Outline of the `index`-th crumb relative to its own left edge: a
/// rectangle with an arrow tip on the right and, for every crumb but the
/// first, a notch on the left that receives the previous tip.
pub fn breadcrumb_points(index: usize, dims: &BreadcrumbDims) -> Vec<(f64, f64)> {
    let BreadcrumbDims { w, h, t, .. } = *dims;
    let mut points = vec![(0.0, 0.0), (w, 0.0), (w + t, h / 2.0), (w, h), (0.0, h)];
    if index > 0 {
        points.push((t, h / 2.0));
    }
    points
}
