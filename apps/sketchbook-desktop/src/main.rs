mod controls;
mod sketches;

use anyhow::{Context, Result};
use clap::Parser;
use controls::{Controls, FixedStep};
use egui::Context as EguiContext;
use glam::Vec2;
use sketches::SketchKind;
use sketchbook_assets::TextureCache;
use sketchbook_common::SketchbookConfig;
use sketchbook_input::{Action, KeyBindings};
use sketchbook_render::Sketch;
use sketchbook_render_wgpu::{GpuContext, RenderError, WgpuRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "sketchbook-desktop", about = "Run a sketch in a window")]
struct Cli {
    /// Sketch to open
    #[arg(value_enum, default_value = "pong")]
    sketch: SketchKind,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Texture directory (overrides the config's assets_dir)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Application state.
struct AppState {
    kind: SketchKind,
    sketch: Box<dyn Sketch>,
    controls: Controls,
    textures: TextureCache,
    window_size: (u32, u32),
    vsync: bool,
    show_hud: bool,
    last_frame: Instant,
    step: FixedStep,
}

impl AppState {
    fn new(kind: SketchKind, config: &SketchbookConfig) -> Result<Self> {
        let sketch = sketches::build(kind, config)?;
        let bindings =
            KeyBindings::with_overrides(&config.bindings).context("applying key bindings")?;
        Ok(Self {
            kind,
            sketch,
            controls: Controls::new(bindings),
            textures: TextureCache::new(&config.assets_dir),
            window_size: (config.window.width, config.window.height),
            vsync: config.window.vsync,
            show_hud: true,
            last_frame: Instant::now(),
            step: FixedStep::new(config.tick_interval()),
        })
    }

    /// Run every tick that came due since the last frame.
    fn update(&mut self) {
        let now = Instant::now();
        let elapsed = (now - self.last_frame).as_secs_f64();
        self.last_frame = now;
        let dt = self.step.interval() as f32;
        for _ in 0..self.step.advance(elapsed) {
            self.sketch.tick(dt, &self.controls.held);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if pressed && key == KeyCode::F1 {
            self.show_hud = !self.show_hud;
            return false;
        }
        if pressed && key == KeyCode::Escape {
            return true;
        }
        if let Some(action) = self.controls.key(key, pressed, self.sketch.as_mut()) {
            if pressed {
                tracing::debug!(?key, %action, "key action");
            }
        }
        false
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        egui::Window::new(self.kind.title())
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(self.sketch.status());
                ui.separator();

                for action in [
                    Action::LeftPaddleUp,
                    Action::LeftPaddleDown,
                    Action::RightPaddleUp,
                    Action::RightPaddleDown,
                    Action::DepthIncrease,
                    Action::DepthDecrease,
                    Action::Reset,
                    Action::TogglePause,
                ] {
                    let keys = self.controls.bindings.keys_for(action);
                    if !keys.is_empty() {
                        ui.label(format!("{action}: {}", keys.join(", ")));
                    }
                }
                if self.sketch.canvas_size().is_none() {
                    ui.label("Drag: orbit   Wheel: zoom");
                }
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        self.sketch.on_action(Action::Reset);
                    }
                    if ui.button("Pause").clicked() {
                        self.sketch.on_action(Action::TogglePause);
                    }
                });
                ui.small("F1 hides this panel, Esc quits");
            });
    }
}

/// GPU-backed application.
struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> Result<(), RenderError> {
        let gpu = GpuContext::new(window.clone(), self.state.vsync)?;
        let (width, height) = gpu.size();
        let mut renderer = WgpuRenderer::new(&gpu.device, &gpu.queue, gpu.format(), width, height)?;
        if self.state.sketch.canvas_size().is_none() {
            renderer.upload_scene(
                &gpu.device,
                &gpu.queue,
                &self.state.sketch.scene_assets(),
                &mut self.state.textures,
            )?;
            for missing in self.state.textures.missing() {
                tracing::warn!(texture = missing, "texture missing, drawn with a fallback");
            }
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self) {
        self.state.update();

        let Self {
            state,
            window: Some(window),
            gpu: Some(gpu),
            renderer: Some(renderer),
            egui_ctx,
            egui_winit: Some(egui_winit),
            egui_renderer: Some(egui_renderer),
        } = self
        else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (width, height) = gpu.size();
        let frame = state.sketch.frame(width as f32 / height.max(1) as f32);
        if let Err(e) = renderer.render(&gpu.device, &gpu.queue, &view, &frame) {
            tracing::error!("render failed: {e}");
        }

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        egui_winit.handle_platform_output(window, full_output.platform_output);
        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.state.window_size;
        let attrs = Window::default_attributes()
            .with_title(format!("Sketchbook - {}", self.state.kind.title()))
            .with_inner_size(PhysicalSize::new(width, height));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("cannot create window: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.init_gpu(window.clone()) {
            tracing::error!("GPU initialisation failed: {e}");
            event_loop.exit();
            return;
        }
        tracing::info!(sketch = self.state.sketch.name(), "window ready");
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    if gpu.resize(new_size.width, new_size.height) {
                        if let Some(renderer) = &mut self.renderer {
                            renderer.resize(&gpu.device, new_size.width, new_size.height);
                        }
                    }
                }
            }
            WindowEvent::Focused(false) => self.state.controls.release_all(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key, key_state == ElementState::Pressed) {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state
                    .controls
                    .set_dragging(btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                self.state
                    .controls
                    .cursor_moved(position, self.state.sketch.as_mut());
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state
                    .controls
                    .scroll(delta, self.state.sketch.as_mut());
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("sketchbook-desktop starting");

    let mut config = SketchbookConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    if let Some(assets) = cli.assets {
        config.assets_dir = assets;
    }
    let state = AppState::new(cli.sketch, &config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
