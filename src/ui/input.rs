use std::f64::consts::TAU;

use winit::event::{ElementState, MouseButton};
use winit::keyboard::{Key, NamedKey};

use crate::config::SunburstConfig;
use crate::render::arc::Wedge;
use crate::tree::arena::NodeId;

/// Margin around the trail and the chart, in logical pixels.
const MARGIN: f32 = 10.0;

/// Mouse state tracking.
#[derive(Debug, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    /// Pointer is over the chart's bounding underlay
    pub inside_chart: bool,
    /// Wedge the pointer last entered
    pub hovered: Option<NodeId>,
}

/// Where the chart sits in the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub center_x: f32,
    pub center_y: f32,
    /// Pixels per layout unit (the layout's outer radius is 1.0)
    pub radius: f32,
    /// Top-left corner of the breadcrumb trail
    pub trail_origin: (f32, f32),
}

impl ChartGeometry {
    /// Place the trail along the top edge and centre the chart below it,
    /// shrinking the chart if the window is smaller than configured.
    pub fn fit(width: f32, height: f32, config: &SunburstConfig) -> Self {
        let trail_height = config.breadcrumb.h as f32;
        let available_h = (height - trail_height - 3.0 * MARGIN).max(2.0);
        let available_w = (width - 2.0 * MARGIN).max(2.0);
        let radius = config
            .chart_radius()
            .min(available_w / 2.0)
            .min(available_h / 2.0)
            .max(1.0);
        Self {
            center_x: width / 2.0,
            center_y: trail_height + 2.0 * MARGIN + radius,
            radius,
            trail_origin: (MARGIN, MARGIN),
        }
    }

    /// Polar coordinates of a window point: angle clockwise from 12 o'clock
    /// in [0, 2π), and radius in layout units.
    pub fn to_polar(&self, x: f32, y: f32) -> (f64, f64) {
        let dx = (x - self.center_x) as f64;
        let dy = (y - self.center_y) as f64;
        let mut angle = dx.atan2(-dy);
        if angle < 0.0 {
            angle += TAU;
        }
        let radius = dx.hypot(dy) / self.radius as f64;
        (angle, radius)
    }
}

/// Hit-test: find the visible wedge under the given point.
/// Deeper wedges come later in the list, so search from the end.
pub fn hit_test(wedges: &[Wedge], geometry: &ChartGeometry, x: f32, y: f32) -> Option<NodeId> {
    let (angle, radius) = geometry.to_polar(x, y);
    wedges
        .iter()
        .rev()
        .find(|w| w.visible && w.contains(angle, radius))
        .map(|w| w.node)
}

/// Whether the point lies on the invisible disc underneath the chart.
/// Leaving it is what counts as leaving the chart.
pub fn inside_underlay(geometry: &ChartGeometry, x: f32, y: f32) -> bool {
    geometry.to_polar(x, y).1 <= 1.0
}

/// Input action produced from raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Pointer entered a wedge
    Hover { node: NodeId },
    /// Pointer left the chart
    Leave,
    /// Left click on a wedge (re-root)
    Activate { node: NodeId },
    /// Right click, back button, Backspace or Escape
    NavigateUp,
    /// F2
    OpenSettings,
    /// No action
    None,
}

/// Process a cursor move. Emits `Hover` when a new wedge is entered and
/// `Leave` when the pointer exits the underlay.
pub fn process_cursor_moved(
    mouse: &mut MouseState,
    x: f32,
    y: f32,
    wedges: &[Wedge],
    geometry: &ChartGeometry,
) -> InputAction {
    mouse.x = x;
    mouse.y = y;

    let inside = inside_underlay(geometry, x, y);
    let was_inside = std::mem::replace(&mut mouse.inside_chart, inside);
    if !inside {
        mouse.hovered = None;
        return if was_inside {
            InputAction::Leave
        } else {
            InputAction::None
        };
    }

    let node = hit_test(wedges, geometry, x, y);
    if node == mouse.hovered {
        return InputAction::None;
    }
    mouse.hovered = node;
    match node {
        Some(node) => InputAction::Hover { node },
        None => InputAction::None,
    }
}

/// The pointer left the window entirely.
pub fn process_cursor_left(mouse: &mut MouseState) -> InputAction {
    mouse.hovered = None;
    if std::mem::take(&mut mouse.inside_chart) {
        InputAction::Leave
    } else {
        InputAction::None
    }
}

/// Process a mouse button event.
pub fn process_mouse_button(
    button: MouseButton,
    state: ElementState,
    mouse: &MouseState,
    wedges: &[Wedge],
    geometry: &ChartGeometry,
) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match button {
        MouseButton::Left => {
            if let Some(node) = hit_test(wedges, geometry, mouse.x, mouse.y) {
                InputAction::Activate { node }
            } else {
                InputAction::None
            }
        }
        MouseButton::Back | MouseButton::Right => InputAction::NavigateUp,
        _ => InputAction::None,
    }
}

/// Process a keyboard event.
pub fn process_key(key: Key, state: ElementState) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match key.as_ref() {
        Key::Named(NamedKey::Backspace) | Key::Named(NamedKey::Escape) => {
            InputAction::NavigateUp
        }
        Key::Named(NamedKey::F2) => InputAction::OpenSettings,
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::layout::{compute_layout, LayoutConfig};
    use crate::render::arc::ArcRenderer;
    use crate::tree::arena::NodeTree;
    use crate::tree::build_tree;
    use crate::tree::input::RawNode;

    fn setup() -> (NodeTree, Vec<Wedge>, ChartGeometry) {
        let tree = build_tree(&RawNode::branch(
            "root",
            vec![
                RawNode::branch("A", vec![RawNode::leaf("C", 50.0), RawNode::leaf("D", 10.0)]),
                RawNode::leaf("B", 40.0),
            ],
        ))
        .unwrap();
        let layout = compute_layout(&tree, tree.root, &LayoutConfig::default());
        let mut wedges = ArcRenderer.build_wedges(&tree, &layout, &HashMap::new());
        for w in &mut wedges {
            w.shown = w.tween.to;
        }
        let geometry = ChartGeometry {
            center_x: 100.0,
            center_y: 100.0,
            radius: 100.0,
            trail_origin: (0.0, 0.0),
        };
        (tree, wedges, geometry)
    }

    fn name(tree: &NodeTree, id: Option<NodeId>) -> Option<&str> {
        id.map(|id| tree.get(id).name.as_str())
    }

    #[test]
    fn polar_angles_run_clockwise_from_top() {
        let (_, _, g) = setup();
        let (up, _) = g.to_polar(100.0, 50.0);
        let (right, _) = g.to_polar(150.0, 100.0);
        let (left, r) = g.to_polar(50.0, 100.0);
        assert!(up.abs() < 1e-9);
        assert!((right - TAU / 4.0).abs() < 1e-9);
        assert!((left - 3.0 * TAU / 4.0).abs() < 1e-9);
        assert!((r - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hit_test_finds_ring_and_sector() {
        let (tree, wedges, g) = setup();
        // Three levels: rings end at sqrt(1/3), sqrt(2/3), 1.
        // Just right of 12 o'clock in the middle ring is A; further out is C.
        assert_eq!(name(&tree, hit_test(&wedges, &g, 110.0, 30.0)), Some("A"));
        assert_eq!(name(&tree, hit_test(&wedges, &g, 110.0, 5.0)), Some("C"));
        // Left half, middle ring: B (starts at 0.6 of the circle).
        assert_eq!(name(&tree, hit_test(&wedges, &g, 30.0, 100.0)), Some("B"));
        // Centre disc belongs to the hidden root.
        assert_eq!(hit_test(&wedges, &g, 100.0, 100.0), None);
    }

    #[test]
    fn cursor_moves_emit_hover_once_and_leave_on_exit() {
        let (tree, wedges, g) = setup();
        let mut mouse = MouseState::default();

        let action = process_cursor_moved(&mut mouse, 110.0, 30.0, &wedges, &g);
        let InputAction::Hover { node } = action else {
            panic!("expected hover, got {action:?}");
        };
        assert_eq!(tree.get(node).name, "A");
        assert_eq!(process_cursor_moved(&mut mouse, 111.0, 31.0, &wedges, &g), InputAction::None);
        assert_eq!(process_cursor_moved(&mut mouse, 400.0, 400.0, &wedges, &g), InputAction::Leave);
        assert_eq!(process_cursor_moved(&mut mouse, 401.0, 400.0, &wedges, &g), InputAction::None);
        assert_eq!(process_cursor_left(&mut mouse), InputAction::None);
    }

    #[test]
    fn buttons_and_keys_map_to_actions() {
        let (_, wedges, g) = setup();
        let mouse = MouseState {
            x: 110.0,
            y: 30.0,
            ..MouseState::default()
        };
        assert!(matches!(
            process_mouse_button(MouseButton::Left, ElementState::Pressed, &mouse, &wedges, &g),
            InputAction::Activate { .. }
        ));
        assert_eq!(
            process_mouse_button(MouseButton::Right, ElementState::Pressed, &mouse, &wedges, &g),
            InputAction::NavigateUp
        );
        assert_eq!(
            process_key(Key::Named(NamedKey::Escape), ElementState::Pressed),
            InputAction::NavigateUp
        );
        assert_eq!(
            process_key(Key::Named(NamedKey::F2), ElementState::Released),
            InputAction::None
        );
    }

    #[test]
    fn geometry_fits_small_windows() {
        let config = SunburstConfig::default();
        let roomy = ChartGeometry::fit(1280.0, 800.0, &config);
        assert_eq!(roomy.radius, 300.0);
        assert_eq!(roomy.center_x, 640.0);
        let cramped = ChartGeometry::fit(300.0, 800.0, &config);
        assert_eq!(cramped.radius, 140.0);
    }
}
