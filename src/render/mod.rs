pub mod arc;
pub mod colors;
pub mod scene;
pub mod text;

use std::sync::Arc;

use anyhow::{Context, Result};
use vello::peniko::Color;
use vello::wgpu;
use vello::{AaConfig, AaSupport, RenderParams, Renderer, RendererOptions, Scene};
use winit::window::Window;

/// Page colour behind the chart.
const BACKGROUND: Color = Color::WHITE;

/// Offscreen image the sunburst is rasterized into before it reaches the window.
///
/// Vello writes through a storage binding, which swapchain formats rarely
/// allow, so every frame goes through this texture and a blit.
struct ChartTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl ChartTarget {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sunburst chart target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            view,
            width,
            height,
        }
    }

    fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width.max(1) && self.height == height.max(1)
    }

    fn params(&self) -> RenderParams {
        RenderParams {
            base_color: BACKGROUND,
            width: self.width,
            height: self.height,
            antialiasing_method: AaConfig::Area,
        }
    }

    /// Copy the rasterized chart onto the swapchain image.
    fn present_to(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        blitter: &wgpu::util::TextureBlitter,
        frame: &wgpu::TextureView,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("sunburst present"),
        });
        blitter.copy(device, &mut encoder, &self.view, frame);
        queue.submit(Some(encoder.finish()));
    }
}

/// GPU state for drawing the chart into a window.
pub struct RenderState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    target: ChartTarget,
    blitter: wgpu::util::TextureBlitter,
}

impl RenderState {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No GPU adapter can present to this window")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("Failed to open GPU device")?;

        let size = window.inner_size();
        let format = surface
            .get_capabilities(&adapter)
            .formats
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface reported no supported formats"))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        // Wedges and trail polygons are plain fills, area coverage is enough.
        let renderer = Renderer::new(
            &device,
            RendererOptions {
                use_cpu: false,
                antialiasing_support: AaSupport::area_only(),
                num_init_threads: None,
                pipeline_cache: None,
            },
        )?;

        let target = ChartTarget::new(&device, surface_config.width, surface_config.height);
        let blitter = wgpu::util::TextureBlitter::new(&device, format);

        let info = adapter.get_info();
        tracing::info!("GPU ready: {} ({:?}), surface {:?}", info.name, info.backend, format);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            renderer,
            target,
            blitter,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.target.matches(width, height) {
            return;
        }
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
        self.target = ChartTarget::new(&self.device, width, height);
        tracing::debug!("Chart target resized to {}x{}", self.target.width, self.target.height);
    }

    /// Rasterize `scene` and show it in the window.
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let frame = self.surface.get_current_texture()?;

        self.renderer.render_to_texture(
            &self.device,
            &self.queue,
            scene,
            &self.target.view,
            &self.target.params(),
        )?;

        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.target
            .present_to(&self.device, &self.queue, &self.blitter, &frame_view);

        frame.present();
        Ok(())
    }
}
