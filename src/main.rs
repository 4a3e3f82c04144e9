mod app;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use app::App;
use sunburst_rs::config::SunburstConfig;
use sunburst_rs::render::RenderState;
use sunburst_rs::ui::config_dialog;
use sunburst_rs::ui::input::{self, InputAction};

/// Main application handler for winit's event loop.
struct SunburstApp {
    app: App,
    render_state: Option<RenderState>,
    window: Option<Arc<Window>>,
}

impl SunburstApp {
    fn new(app: App) -> Self {
        Self {
            app,
            render_state: None,
            window: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn update_window_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.app.title());
        }
    }

    fn handle_action(&mut self, action: InputAction) {
        if action == InputAction::OpenSettings {
            self.open_settings();
            return;
        }
        let rerooted = matches!(action, InputAction::Activate { .. } | InputAction::NavigateUp);
        if self.app.handle_action(action) {
            if rerooted {
                self.update_window_title();
            }
            self.request_redraw();
        }
    }

    fn open_settings(&mut self) {
        let Some(settings) =
            config_dialog::run_config_dialog("Sunburst - Settings", self.app.dialog_state())
        else {
            return;
        };
        if let Err(e) = self.app.apply_settings(settings) {
            tracing::error!("Failed to apply settings: {:#}", e);
        }
        self.update_window_title();
        self.request_redraw();
    }
}

impl ApplicationHandler for SunburstApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.app.title())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(RenderState::new(window.clone())) {
            Ok(state) => {
                let size = window.inner_size();
                tracing::info!(
                    "Window initialized: scale_factor={:.3}, physical_size={}x{}",
                    window.scale_factor(),
                    size.width,
                    size.height
                );
                self.app.resize(size.width, size.height);
                self.render_state = Some(state);
                window.request_redraw();
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render_state {
                    render.resize(size.width, size.height);
                }
                self.app.resize(size.width, size.height);
                self.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let action = input::process_cursor_moved(
                    &mut self.app.mouse,
                    position.x as f32,
                    position.y as f32,
                    self.app.controller.wedges(),
                    &self.app.geometry,
                );
                self.handle_action(action);
            }

            WindowEvent::CursorLeft { .. } => {
                let action = input::process_cursor_left(&mut self.app.mouse);
                self.handle_action(action);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let action = input::process_mouse_button(
                    button,
                    state,
                    &self.app.mouse,
                    self.app.controller.wedges(),
                    &self.app.geometry,
                );
                self.handle_action(action);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let action = input::process_key(event.logical_key.clone(), event.state);
                self.handle_action(action);
            }

            WindowEvent::RedrawRequested => {
                let animating = self.app.frame();

                if let Some(render) = &mut self.render_state {
                    if let Err(e) = render.render(&self.app.scene) {
                        tracing::error!("Render error: {}", e);
                    }
                }

                // Keep frames coming until every transition has finished
                if animating {
                    self.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sunburst_rs=info".parse()?),
        )
        .init();

    // Optional path argument; the bundled sample is shown without one
    let tree_path = std::env::args().nth(1).map(PathBuf::from);
    let tree = app::load_source(tree_path.as_deref())?;

    tracing::info!("Sunburst starting, source: {:?}", tree_path);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = SunburstApp::new(App::new(tree, tree_path, SunburstConfig::default()));
    event_loop.run_app(&mut app)?;

    Ok(())
}
