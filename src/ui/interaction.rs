//! Hover / leave / activate state machine.
//!
//! Pointer events arrive as [`Intent`] values and are reduced into the
//! controller's state by [`InteractionController::dispatch`]. Animations run
//! on a [`Timeline`]; [`InteractionController::tick`] samples them and
//! handles their completions. Every wedge-set rebuild bumps a generation
//! counter, and completions carrying an older generation are ignored.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::animation::task::{ease_cubic_in_out, Completed};
use crate::animation::{Lerp, TaskId, Timeline};
use crate::config::SunburstConfig;
use crate::layout::{compute_layout, Layout};
use crate::render::arc::{snapshot_extents, ArcRenderer, Wedge};
use crate::tree::arena::{NodeId, NodeTree};
use crate::ui::breadcrumb::BreadcrumbTrail;
use crate::ui::navigation::ViewContext;
use crate::ui::percentage::format_percentage;

/// What the pointer asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Hover(NodeId),
    Leave,
    Activate(NodeId),
    NavigateUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    Idle,
    Hovering(NodeId),
}

/// Centre label showing the hovered node's share.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplanationPanel {
    pub percentage: String,
    pub visible: bool,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Zoom { generation: u64 },
    Reset { generation: u64 },
}

/// Opacities the running reset fades from.
#[derive(Debug, Clone)]
struct ResetFade {
    task: TaskId,
    wedge_opacity: Vec<f32>,
    explanation_opacity: f32,
}

pub struct InteractionController {
    config: SunburstConfig,
    context: ViewContext,
    layout: Layout,
    wedges: Vec<Wedge>,
    trail: BreadcrumbTrail,
    explanation: ExplanationPanel,
    pointer: PointerState,
    hover_enabled: bool,
    timeline: Timeline<Transition>,
    zoom: Option<TaskId>,
    reset: Option<ResetFade>,
    generation: u64,
}

impl InteractionController {
    /// Lay out the whole tree and start the intro zoom.
    pub fn new(tree: &NodeTree, config: SunburstConfig, now: Duration) -> Self {
        let config = config.validated();
        let context = ViewContext::new(tree);
        let mut controller = Self {
            trail: BreadcrumbTrail::new(config.breadcrumb),
            layout: Layout::empty(tree.root),
            config,
            context,
            wedges: Vec::new(),
            explanation: ExplanationPanel::default(),
            pointer: PointerState::Idle,
            hover_enabled: true,
            timeline: Timeline::new(),
            zoom: None,
            reset: None,
            generation: 0,
        };
        controller.reroot(tree, tree.root, now);
        controller
    }

    /// Reduce one intent. Returns true if anything visible changed.
    pub fn dispatch(&mut self, tree: &NodeTree, intent: Intent, now: Duration) -> bool {
        match intent {
            Intent::Hover(node) => self.hover(tree, node),
            Intent::Leave => self.leave(now),
            Intent::Activate(node) => match self.context.drill_target(node, tree) {
                Some(target) => {
                    self.reroot(tree, target, now);
                    true
                }
                None => false,
            },
            Intent::NavigateUp => match self.context.parent_target(tree) {
                Some(parent) => {
                    self.reroot(tree, parent, now);
                    true
                }
                None => false,
            },
        }
    }

    /// Sample running transitions at `now` and handle any that finished.
    /// Returns true if a redraw is needed.
    pub fn tick(&mut self, now: Duration) -> bool {
        if self.timeline.is_idle() {
            return false;
        }

        if let Some(t) = self.zoom.and_then(|id| self.timeline.progress(id, now)) {
            for wedge in &mut self.wedges {
                wedge.shown = wedge.tween.sample(t);
            }
        }

        if let Some(fade) = &self.reset {
            if let Some(t) = self.timeline.progress(fade.task, now) {
                for (wedge, from) in self.wedges.iter_mut().zip(&fade.wedge_opacity) {
                    wedge.opacity = <f32 as Lerp>::lerp(from, &1.0, t);
                }
                self.explanation.opacity = <f32 as Lerp>::lerp(&fade.explanation_opacity, &0.0, t);
            }
        }

        for done in self.timeline.advance(now) {
            self.on_complete(done);
        }
        true
    }

    /// Replace the options and re-lay out the current focus with them.
    pub fn apply_config(&mut self, tree: &NodeTree, config: SunburstConfig, now: Duration) {
        self.config = config.validated();
        self.trail.set_dims(self.config.breadcrumb);
        let focus = self.context.focus_root;
        self.reroot(tree, focus, now);
    }

    fn hover(&mut self, tree: &NodeTree, node: NodeId) -> bool {
        if !self.hover_enabled {
            return false;
        }
        let armed = self
            .wedges
            .iter()
            .any(|w| w.node == node && w.visible && w.hover_armed);
        if !armed {
            return false;
        }

        let percentage = format_percentage(tree.get(node).value, self.context.total_value, &self.config);
        let chain = tree.ancestors_of(node, self.context.focus_root);
        self.trail.update(tree, &chain, &percentage);
        self.explanation = ExplanationPanel {
            percentage,
            visible: true,
            opacity: 1.0,
        };

        let highlighted: HashSet<NodeId> = chain.into_iter().collect();
        for wedge in &mut self.wedges {
            wedge.opacity = if highlighted.contains(&wedge.node) {
                1.0
            } else {
                self.config.dimmed_opacity
            };
        }
        self.pointer = PointerState::Hovering(node);
        true
    }

    fn leave(&mut self, now: Duration) -> bool {
        self.trail.set_visible(false);

        if let Some(previous) = self.reset.take() {
            self.timeline.cancel(previous.task);
        }
        self.hover_enabled = false;
        for wedge in &mut self.wedges {
            wedge.hover_armed = false;
        }

        let task = self.timeline.start(
            Transition::Reset {
                generation: self.generation,
            },
            self.config.reset_duration(),
            ease_cubic_in_out,
            now,
        );
        self.reset = Some(ResetFade {
            task,
            wedge_opacity: self.wedges.iter().map(|w| w.opacity).collect(),
            explanation_opacity: self.explanation.opacity,
        });
        true
    }

    fn reroot(&mut self, tree: &NodeTree, target: NodeId, now: Duration) {
        let previous = snapshot_extents(&self.wedges);

        self.context.focus(target, tree);
        self.layout = compute_layout(tree, target, &self.config.layout_config());

        self.generation += 1;
        if let Some(zoom) = self.zoom.take() {
            self.timeline.cancel(zoom);
        }
        if let Some(fade) = self.reset.take() {
            self.timeline.cancel(fade.task);
        }

        self.wedges = ArcRenderer.build_wedges(tree, &self.layout, &previous);
        self.hover_enabled = true;
        self.pointer = PointerState::Idle;
        self.trail.set_visible(false);
        self.explanation.visible = false;
        self.explanation.opacity = 0.0;

        self.zoom = Some(self.timeline.start(
            Transition::Zoom {
                generation: self.generation,
            },
            self.config.zoom_duration(),
            ease_cubic_in_out,
            now,
        ));

        info!(
            "Re-rooted at '{}' (total {}), {} wedges",
            tree.path_of(target),
            self.context.total_value,
            self.wedges.len()
        );
        debug!(
            "Layout: {} levels, generation {}",
            self.layout.levels, self.generation
        );
    }

    fn on_complete(&mut self, done: Completed<Transition>) {
        match done.payload {
            Transition::Zoom { generation }
                if generation == self.generation && self.zoom == Some(done.id) =>
            {
                for wedge in &mut self.wedges {
                    wedge.shown = wedge.tween.to;
                }
                self.zoom = None;
            }
            Transition::Reset { generation }
                if generation == self.generation
                    && self.reset.as_ref().map(|f| f.task) == Some(done.id) =>
            {
                for wedge in &mut self.wedges {
                    wedge.opacity = 1.0;
                    wedge.hover_armed = true;
                }
                self.hover_enabled = true;
                self.pointer = PointerState::Idle;
                self.explanation.visible = false;
                self.explanation.opacity = 0.0;
                self.reset = None;
            }
            stale => trace!("Ignoring stale completion {:?}", stale),
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    pub fn config(&self) -> &SunburstConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn wedges(&self) -> &[Wedge] {
        &self.wedges
    }

    pub fn trail(&self) -> &BreadcrumbTrail {
        &self.trail
    }

    pub fn explanation(&self) -> &ExplanationPanel {
        &self.explanation
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn is_hover_enabled(&self) -> bool {
        self.hover_enabled
    }

    pub fn is_animating(&self) -> bool {
        !self.timeline.is_idle()
    }

    pub fn opacity_of(&self, node: NodeId) -> Option<f32> {
        self.wedges.iter().find(|w| w.node == node).map(|w| w.opacity)
    }

    pub fn wedge_of(&self, node: NodeId) -> Option<&Wedge> {
        self.wedges.iter().find(|w| w.node == node)
    }
}
