use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vello::Scene;

use sunburst_rs::animation::{Clock, SystemClock};
use sunburst_rs::config::SunburstConfig;
use sunburst_rs::render::scene::build_scene;
use sunburst_rs::render::text::TextRenderer;
use sunburst_rs::tree::arena::NodeTree;
use sunburst_rs::tree::{load_tree, sample_tree};
use sunburst_rs::ui::config_dialog::DialogResult;
use sunburst_rs::ui::input::{ChartGeometry, InputAction, MouseState};
use sunburst_rs::ui::interaction::{Intent, InteractionController};

/// Load the tree at `path`, or the bundled sample when there is none.
pub fn load_source(path: Option<&Path>) -> Result<NodeTree> {
    match path {
        Some(path) => load_tree(path).with_context(|| format!("loading tree from {}", path.display())),
        None => sample_tree().context("loading bundled sample tree"),
    }
}

/// Top-level application state.
pub struct App {
    pub tree: NodeTree,
    pub tree_path: Option<PathBuf>,
    pub controller: InteractionController,
    clock: SystemClock,

    pub text_renderer: TextRenderer,
    pub label_font_path: String,

    // UI state
    pub mouse: MouseState,
    pub geometry: ChartGeometry,

    // Rendering
    pub scene: Scene,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl App {
    pub fn new(tree: NodeTree, tree_path: Option<PathBuf>, config: SunburstConfig) -> Self {
        let mut text_renderer = TextRenderer::new();
        if let Err(e) = text_renderer.load_system_font("default") {
            tracing::warn!("Failed to load system font, labels will not be drawn: {}", e);
        }

        let clock = SystemClock::new();
        let controller = InteractionController::new(&tree, config, clock.now());
        let (viewport_width, viewport_height) = (1280.0, 800.0);
        let geometry = ChartGeometry::fit(viewport_width, viewport_height, controller.config());

        Self {
            tree,
            tree_path,
            controller,
            clock,
            text_renderer,
            label_font_path: String::new(),
            mouse: MouseState::default(),
            geometry,
            scene: Scene::new(),
            viewport_width,
            viewport_height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport_width = width.max(1) as f32;
        self.viewport_height = height.max(1) as f32;
        self.geometry = ChartGeometry::fit(self.viewport_width, self.viewport_height, self.controller.config());
    }

    /// Feed an input action to the controller. Returns true if a redraw is needed.
    pub fn handle_action(&mut self, action: InputAction) -> bool {
        let intent = match action {
            InputAction::Hover { node } => Intent::Hover(node),
            InputAction::Leave => Intent::Leave,
            InputAction::Activate { node } => Intent::Activate(node),
            InputAction::NavigateUp => Intent::NavigateUp,
            InputAction::OpenSettings | InputAction::None => return false,
        };
        let changed = self.controller.dispatch(&self.tree, intent, self.clock.now());
        if changed && matches!(intent, Intent::Activate(_) | Intent::NavigateUp) {
            // The wedge under the pointer changed; let the next move re-enter it.
            self.mouse.hovered = None;
        }
        changed
    }

    /// Advance animations and rebuild the scene. Returns true while more frames are needed.
    pub fn frame(&mut self) -> bool {
        self.controller.tick(self.clock.now());
        build_scene(
            &mut self.scene,
            &self.controller,
            &self.tree,
            &self.geometry,
            &self.text_renderer,
        );
        self.controller.is_animating()
    }

    pub fn title(&self) -> String {
        let focus = self.controller.context().focus_root;
        format!("Sunburst - {}", self.tree.path_of(focus))
    }

    pub fn dialog_state(&self) -> DialogResult {
        DialogResult {
            tree_path: self.tree_path.clone(),
            config: self.controller.config().clone(),
            label_font_path: self.label_font_path.clone(),
        }
    }

    /// Apply settings from the dialog, reloading the tree if its source changed.
    pub fn apply_settings(&mut self, settings: DialogResult) -> Result<()> {
        if settings.label_font_path != self.label_font_path {
            self.label_font_path = settings.label_font_path.clone();
            if !self.label_font_path.is_empty() {
                if let Err(e) = self
                    .text_renderer
                    .load_font_from_path("default", Path::new(&self.label_font_path))
                {
                    tracing::warn!("Failed to load custom font '{}': {}", self.label_font_path, e);
                }
            }
        }

        let now = self.clock.now();
        if settings.tree_path != self.tree_path {
            let tree = load_source(settings.tree_path.as_deref())?;
            self.controller = InteractionController::new(&tree, settings.config, now);
            self.tree = tree;
            self.tree_path = settings.tree_path;
            self.mouse = MouseState::default();
        } else {
            self.controller.apply_config(&self.tree, settings.config, now);
        }
        self.geometry = ChartGeometry::fit(self.viewport_width, self.viewport_height, self.controller.config());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(load_source(None).unwrap(), None, SunburstConfig::default())
    }

    fn child_named(tree: &NodeTree, name: &str) -> sunburst_rs::tree::arena::NodeId {
        tree.children(tree.root)
            .find(|&id| tree.get(id).name == name)
            .unwrap()
    }

    #[test]
    fn title_follows_focus() {
        let mut app = app();
        assert_eq!(app.title(), "Sunburst - RAVON");

        let etc = child_named(&app.tree, "etc");
        assert!(app.handle_action(InputAction::Activate { node: etc }));
        assert_eq!(app.title(), "Sunburst - RAVON/etc");

        assert!(app.handle_action(InputAction::NavigateUp));
        assert_eq!(app.title(), "Sunburst - RAVON");
    }

    #[test]
    fn settings_without_new_path_keep_tree() {
        let mut app = app();
        let nodes = app.tree.len();
        let mut settings = app.dialog_state();
        settings.config.chart_width = 400.0;
        settings.config.chart_height = 400.0;

        app.apply_settings(settings).unwrap();
        assert_eq!(app.tree.len(), nodes);
        assert_eq!(app.geometry.radius, 200.0);
    }

    #[test]
    fn missing_tree_file_is_reported() {
        let mut app = app();
        let mut settings = app.dialog_state();
        settings.tree_path = Some(PathBuf::from("/nonexistent/tree.json"));
        assert!(app.apply_settings(settings).is_err());
        assert_eq!(app.tree_path, None);
    }
}
