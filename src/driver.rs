//! Application event loop.
//!
//! The driver owns the window, every GPU resource and the scene. It turns winit
//! events into input state and, on every redraw, runs one frame:
//!
//! 1. Count the frame; once per second log the average frame time
//! 2. Move the camera from the input gathered since the last frame
//! 3. Render the scene into the offscreen target
//! 4. Composite the target into the window through the post effect
//! 5. Present and request the next redraw
//!
//! The loop ends when Escape is pressed or the window is closed.

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use crate::{
    camera::{Camera, Projection},
    config::Config,
    context::Context,
    controls::{Controls, InputState},
    data_structures::scene_graph::Scene,
    frame::Frame,
    offscreen::OffscreenTarget,
    pipelines::{basic::SceneRenderer, light::LightUniform, post::PostStage},
    post::{ModeSelector, PostClock, PostUniform},
    resources::{self, arena::GpuArena},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    Exiting,
}

impl RunState {
    pub fn on_key(&mut self, code: KeyCode, state: ElementState) {
        if code == KeyCode::Escape && state.is_pressed() {
            *self = RunState::Exiting;
        }
    }

    pub fn on_close_requested(&mut self) {
        *self = RunState::Exiting;
    }

    pub fn is_running(&self) -> bool {
        *self == RunState::Running
    }
}

/// Frame time accounting over one-second windows.
#[derive(Debug)]
pub struct FrameStats {
    frames: u32,
    last: Instant,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self { frames: 0, last: now }
    }

    /// Counts a frame. Returns the average milliseconds per frame whenever a second has passed.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        if now.saturating_duration_since(self.last) < Duration::from_secs(1) {
            return None;
        }
        let ms = 1000.0 / f64::from(self.frames);
        self.frames = 0;
        self.last += Duration::from_secs(1);
        // Don't report a burst of seconds after a long stall
        if now.saturating_duration_since(self.last) >= Duration::from_secs(1) {
            self.last = now;
        }
        Some(ms)
    }
}

/// Everything that exists once the window is open.
pub struct AppState {
    ctx: Context,
    arena: GpuArena,
    scene: Scene,
    camera: Camera,
    controls: Controls,
    input: InputState,
    modes: ModeSelector,
    clock: PostClock,
    target: OffscreenTarget,
    scene_renderer: SceneRenderer,
    post: PostStage,
    stats: FrameStats,
    last_frame: Instant,
    recenter_cursor: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &Config) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config.clear_colour).await?;
        let target = OffscreenTarget::new(&ctx.device, config.offscreen_descriptor())?;

        let mut arena = GpuArena::new(&ctx.device, &ctx.queue);
        let scene = resources::load_scene(&config.models, &config.asset_dir, &mut arena).await;
        if scene.is_empty() {
            log::warn!("None of the models could be loaded, the scene is empty.");
        }

        let (width, height) = target.size();
        let projection = Projection::new(width, height, config.fovy, config.znear, config.zfar);
        let camera = Camera::new(
            config.camera_position,
            config.camera_yaw,
            config.camera_pitch,
            projection,
        );
        let controls = Controls::new(config.speed, config.sensitivity);

        let scene_renderer = SceneRenderer::new(
            &ctx.device,
            target.descriptor(),
            arena.material_layout(),
            &camera,
            LightUniform::new(config.light_position, config.light_colour),
        );
        let post = PostStage::new(&ctx.device, ctx.config.format, &target.color);
        let recenter_cursor = grab_cursor(&ctx.window);

        let now = Instant::now();
        Ok(Self {
            ctx,
            arena,
            scene,
            camera,
            controls,
            input: InputState::new(),
            modes: ModeSelector::new(),
            clock: PostClock::starting_at(now, config.time_scale),
            target,
            scene_renderer,
            post,
            stats: FrameStats::new(now),
            last_frame: now,
            recenter_cursor,
        })
    }

    fn redraw(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        if let Some(ms) = self.stats.tick(now) {
            log::info!("{:.3} ms/frame", ms);
        }
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        self.controls.update(&mut self.camera, &mut self.input, dt);
        if self.recenter_cursor {
            self.recenter();
        }

        let render = self.scene.render(&self.camera);
        self.scene_renderer
            .prepare(&self.ctx.device, &self.ctx.queue, &render);
        let post_uniform = PostUniform::new(self.modes.current(), self.clock.time_at(now));

        Frame::begin(&self.ctx)?
            .render_scene(&self.target, &self.scene_renderer, &self.arena, &render)
            .composite(&self.post, &post_uniform)
            .present();
        Ok(())
    }

    fn recenter(&self) {
        let size = self.ctx.window.inner_size();
        let center = PhysicalPosition::new(size.width / 2, size.height / 2);
        if let Err(e) = self.ctx.window.set_cursor_position(center) {
            log::trace!("Cursor could not be recentered: {}", e);
        }
    }

    fn on_keyboard(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.input.press(code);
                self.modes.press(code);
            }
            ElementState::Released => self.input.release(code),
        }
    }
}

/// Hides the cursor and keeps it inside the window. Returns whether it needs recentering.
fn grab_cursor(window: &Window) -> bool {
    window.set_cursor_visible(false);
    if window.set_cursor_grab(CursorGrabMode::Locked).is_ok() {
        return false;
    }
    match window.set_cursor_grab(CursorGrabMode::Confined) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("The cursor can't be grabbed: {}", e);
            true
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: Config,
    state: Option<AppState>,
    run_state: RunState,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            run_state: RunState::Running,
            startup_error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("Startup failed: {:#}", error);
        self.startup_error = Some(error);
        self.run_state = RunState::Exiting;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || !self.run_state.is_running() {
            return;
        }
        let (width, height) = self.config.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("creating the window"));
                return;
            }
        };

        match self
            .async_runtime
            .block_on(AppState::new(window, &self.config))
        {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.input.move_cursor(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => self.run_state.on_close_requested(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.run_state.on_key(code, key_state);
                state.on_keyboard(code, key_state);
            }
            WindowEvent::Focused(false) => state.input.release_all(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match state.redraw() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.ctx.reconfigure();
                }
                Err(e) => log::error!("Unable to render {}", e),
            },
            _ => {}
        }

        if !self.run_state.is_running() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.ctx.window.request_redraw();
        }
    }
}

/// Opens the window and renders until the user quits.
///
/// Returns the error that prevented start-up, if any.
pub fn run(config: Config) -> anyhow::Result<()> {
    if let Err(e) = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }
    log::info!("Kia ora");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => {
            log::info!("Goodbye");
            Ok(())
        }
    }
}

