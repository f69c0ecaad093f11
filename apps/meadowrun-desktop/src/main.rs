use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use meadowrun_common::Direction;
use meadowrun_input::{Action, FrameInput};
use meadowrun_kernel::{GameConfig, Session};
use meadowrun_render::{FrameScene, RenderView, SceneLayout};
use meadowrun_render_wgpu::WgpuRenderer;
use meadowrun_tools::{SessionInspector, hud_lines};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

const TITLE: &str = "Meadowrun";

#[derive(Parser)]
#[command(name = "meadowrun-desktop", about = "Run the meadow corridor")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game config; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Frame counter for the window title, refreshed twice a second.
struct FrameStats {
    frames: u32,
    window_start: Instant,
}

impl FrameStats {
    fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
        }
    }

    fn record(&mut self, now: Instant) -> Option<String> {
        self.frames += 1;
        let span = now - self.window_start;
        if span < Duration::from_millis(500) {
            return None;
        }
        let fps = self.frames as f32 / span.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(format!(
            "{TITLE} - {:.0} ms/frame {:.0}",
            1000.0 / fps.max(f32::EPSILON),
            fps
        ))
    }
}

/// Game-side state: the session plus raw input gathered between frames.
struct AppState {
    session: Session,
    layout: SceneLayout,
    keys_held: HashSet<KeyCode>,
    pending: Vec<Action>,
    look_delta: (f64, f64),
    mouse_captured: bool,
    show_debug: bool,
    aspect: f32,
    started: Instant,
    last_frame: Instant,
    stats: FrameStats,
}

impl AppState {
    fn new(session: Session) -> Self {
        let now = Instant::now();
        Self {
            session,
            layout: SceneLayout::default(),
            keys_held: HashSet::new(),
            pending: Vec::new(),
            look_delta: (0.0, 0.0),
            mouse_captured: false,
            show_debug: false,
            aspect: 16.0 / 9.0,
            started: now,
            last_frame: now,
            stats: FrameStats::new(now),
        }
    }

    fn clock(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Collect this frame's actions and advance the session one tick.
    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let mut frame = FrameInput::new(dt, self.clock());
        for (key, direction) in [
            (KeyCode::KeyW, Direction::Forward),
            (KeyCode::KeyS, Direction::Backward),
            (KeyCode::KeyA, Direction::Left),
            (KeyCode::KeyD, Direction::Right),
        ] {
            if self.keys_held.contains(&key) {
                frame.push(Action::Move(direction));
            }
        }
        if self.keys_held.contains(&KeyCode::Space) {
            frame.push(Action::Jump);
        }
        let (dx, dy) = std::mem::take(&mut self.look_delta);
        if dx != 0.0 || dy != 0.0 {
            frame.push(Action::look_from_motion(dx, dy));
        }
        for action in self.pending.drain(..) {
            frame.push(action);
        }

        self.session.tick(&frame);
        for event in self.session.drain_events() {
            tracing::debug!(?event, "game event");
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            self.keys_held.remove(&key);
            return;
        }
        // Edge-triggered keys fire once per press, not per repeat.
        if !self.keys_held.insert(key) {
            return;
        }
        match key {
            KeyCode::Enter | KeyCode::NumpadEnter => self.pending.push(Action::ConfirmStart),
            KeyCode::KeyR => self.pending.push(Action::Restart),
            KeyCode::F1 => self.show_debug = !self.show_debug,
            _ => {}
        }
    }

    fn frame_scene(&self) -> (FrameScene, RenderView) {
        let view = RenderView::from_camera(self.session.camera(), self.aspect);
        let scene = FrameScene::build(
            &self.layout,
            view.eye,
            self.session.obstacles().positions(),
            self.clock(),
        );
        (scene, view)
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        let summary = SessionInspector::summary(&self.session, self.clock());

        egui::Area::new(egui::Id::new("hud"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 24.0])
            .show(ctx, |ui| {
                for line in hud_lines(&summary) {
                    ui.label(
                        egui::RichText::new(line)
                            .size(22.0)
                            .color(egui::Color32::WHITE)
                            .strong(),
                    );
                }
            });

        if !self.show_debug {
            return;
        }
        egui::Window::new("Session")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.label(format!("Phase: {:?}", summary.phase));
                ui.label(format!("Round: {}  Seed: {}", summary.round, summary.seed));
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    summary.position.x, summary.position.y, summary.position.z
                ));
                ui.label(format!(
                    "Yaw: {:.1}  Pitch: {:.1}  FOV: {:.0}",
                    summary.yaw, summary.pitch, summary.zoom
                ));
                ui.label(format!("Jumping: {}", summary.jumping));
                if let Some((index, dist)) = SessionInspector::nearest_obstacle(&self.session) {
                    ui.label(format!("Nearest grass: #{index} at {dist:.2}"));
                }
                ui.separator();
                ui.small("F1: Toggle | RMB: Look | WASD: Move | Space: Jump | Enter: Start | R: Restart");
            });
    }
}

/// Window and GPU resources, created once the event loop is running.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("meadowrun_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn set_mouse_capture(&self, captured: bool) {
        self.window.set_cursor_visible(!captured);
        let mode = if captured {
            CursorGrabMode::Confined
        } else {
            CursorGrabMode::None
        };
        if let Err(e) = self.window.set_cursor_grab(mode) {
            tracing::debug!("cursor grab unavailable: {e}");
        }
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(session: Session) -> Self {
        Self {
            state: AppState::new(session),
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        self.state.update();
        if let Some(title) = self.state.stats.record(Instant::now()) {
            gpu.window.set_title(&title);
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (scene, view) = self.state.frame_scene();
        gpu.renderer
            .render(&gpu.device, &gpu.queue, &target, &scene, &view);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
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
                        view: &target,
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
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.aspect = gpu.aspect();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialise graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
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
                    gpu.resize(new_size);
                    self.state.aspect = gpu.aspect();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape && key_state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.mouse_captured = btn_state == ElementState::Pressed;
                if let Some(gpu) = &self.gpu {
                    gpu.set_mouse_capture(self.state.mouse_captured);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 20.0) as f32,
                };
                self.state.pending.push(Action::Zoom(lines));
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mouse_captured {
                self.state.look_delta.0 += delta.0;
                self.state.look_delta.1 += delta.1;
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = GameConfig::load_or_default(cli.config.as_deref())?;
    let session = Session::new(config)?;
    tracing::info!("meadowrun-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(session);
    event_loop.run_app(&mut app)?;

    Ok(())
}
