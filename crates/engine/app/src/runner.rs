//! Window and GL runtime for the path tracer
//!
//! Creates the window and OpenGL context, owns the GPU resources and the
//! render loop, and turns winit events into host input. The render loop's
//! ticks ride on winit redraw requests: scheduling a tick requests a redraw,
//! and the redraw handler runs the tick if its token is still live.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use glow::{Context, UniformLocation};
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use renderer::{
    AccumulationBuffer, FrameScheduler, FrameToken, GlFrameTarget, GpuResources, GpuSettings,
    RenderError, RenderLoop, TickOutcome,
};
use scene::{Capacity, Scene};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

#[cfg(target_os = "linux")]
use winit::platform::x11::EventLoopBuilderExtX11;

use crate::camera::OrbitConfig;
use crate::config::ViewerConfig;
use crate::controls::SceneCommand;
use crate::host::{PointerButtons, SceneHost};

/// Errors that end [`run`]
#[derive(Error, Debug)]
pub enum RunError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Debug mode configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DebugMode {
    /// Number of rendered frames before exiting
    pub frames: u64,
    /// Path to save the accumulated image
    pub output_path: PathBuf,
}

/// Configuration for the viewer runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Side length of the square window and render target
    pub resolution: u32,
    pub gl_major: u8,
    pub gl_minor: u8,
    pub capacity: Capacity,
    pub orbit: OrbitConfig,
    pub home_camera: scene::Camera,
    pub noise_texture: Option<PathBuf>,
    pub debug_mode: Option<DebugMode>,
}

impl RuntimeConfig {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            title: config.window.title.clone(),
            resolution: config.render.resolution,
            gl_major: config.window.gl_major,
            gl_minor: config.window.gl_minor,
            capacity: config.capacity(),
            orbit: config.orbit(),
            home_camera: config.home_camera(),
            noise_texture: config.render.noise_texture.clone(),
            debug_mode: None,
        }
    }

    /// Enable debug mode with the specified number of frames
    pub fn with_debug_mode(mut self, frames: u64, output_path: PathBuf) -> Self {
        self.debug_mode = Some(DebugMode { frames, output_path });
        self
    }
}

/// [`FrameScheduler`] backed by window redraw requests
///
/// Holds at most one due token. Cancelling it means the next redraw finds
/// nothing to run.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    window: Option<Arc<Window>>,
    next_id: u64,
    due: Option<FrameToken>,
}

impl RedrawScheduler {
    pub fn new(window: Option<Arc<Window>>) -> Self {
        Self {
            window,
            next_id: 0,
            due: None,
        }
    }

    /// Take the token for the redraw being handled
    pub fn take_due(&mut self) -> Option<FrameToken> {
        self.due.take()
    }
}

impl FrameScheduler for RedrawScheduler {
    fn schedule(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken::new(self.next_id);
        self.due = Some(token);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        if self.due == Some(token) {
            self.due = None;
        }
    }
}

/// Live GL state, present between `resumed` and teardown
struct GlState {
    window: Arc<Window>,
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    gl: Context,
    resources: GpuResources,
    render_loop: RenderLoop<RedrawScheduler, UniformLocation>,
}

/// Runtime state for the viewer
pub struct ViewerRuntime {
    config: RuntimeConfig,
    host: SceneHost,
    error_sender: Sender<RenderError>,
    state: Option<GlState>,
    cursor: (f32, f32),
    buttons: PointerButtons,
    frames_rendered: u64,
    fatal: Option<RenderError>,
}

impl ViewerRuntime {
    /// Create a runtime that starts with `scene` published
    pub fn new(config: RuntimeConfig, scene: Scene) -> Self {
        let (mut host, error_sender) = SceneHost::new(config.orbit, config.home_camera);
        host.replace_scene(scene);
        Self {
            config,
            host,
            error_sender,
            state: None,
            cursor: (0.0, 0.0),
            buttons: PointerButtons::NONE,
            frames_rendered: 0,
            fatal: None,
        }
    }

    pub fn host(&self) -> &SceneHost {
        &self.host
    }

    fn init_gl(&mut self, event_loop: &ActiveEventLoop) -> Result<GlState, RenderError> {
        let unavailable = |what: &str, e: &dyn std::fmt::Display| {
            RenderError::ContextUnavailable(format!("{what}: {e}"))
        };
        let side = self.config.resolution;

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_transparency(false);
        let display_builder =
            DisplayBuilder::new().with_window_attributes(Some(window_attributes(&self.config)));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                // glutin only calls the picker with a non-empty set
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() < accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| unavailable("no GL display", &e))?;

        let window = window
            .ok_or_else(|| RenderError::ContextUnavailable("window was not created".into()))?;
        let window = Arc::new(window);
        let window_handle = window.window_handle().ok().map(|h| h.as_raw());
        let raw_handle = window_handle
            .ok_or_else(|| RenderError::ContextUnavailable("no window handle".into()))?;
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                self.config.gl_major,
                self.config.gl_minor,
            ))))
            .build(window_handle);

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| unavailable("context creation failed", &e))?;

        let size = window.inner_size();
        let width = NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN);
        let height = NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN);
        let attrs =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(raw_handle, width, height);

        let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|e| unavailable("surface creation failed", &e))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| unavailable("make current failed", &e))?;

        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            tracing::warn!(error = %e, "vsync unavailable");
        }

        let gl =
            unsafe { Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s)) };
        tracing::info!(
            major = self.config.gl_major,
            minor = self.config.gl_minor,
            "OpenGL context created"
        );

        let settings = GpuSettings {
            capacity: self.config.capacity,
            resolution: side,
            noise_path: self.config.noise_texture.as_deref(),
        };
        let resources = unsafe { GpuResources::create(&gl, &settings)? };

        let synchronizer = resources.synchronizer();
        tracing::debug!(capacity = ?synchronizer.capacity(), "uniform slots resolved");
        let mut render_loop = RenderLoop::new(
            RedrawScheduler::new(Some(Arc::clone(&window))),
            synchronizer,
            side,
            self.error_sender.clone(),
        );
        render_loop.start();

        Ok(GlState {
            window,
            context,
            surface,
            gl,
            resources,
            render_loop,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        tracing::error!(error = %err, "fatal render error");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn handle_mouse_input(&mut self, state: ElementState, button: MouseButton) {
        let mask = match button {
            MouseButton::Left => PointerButtons::PRIMARY,
            MouseButton::Right => PointerButtons::SECONDARY,
            MouseButton::Middle => PointerButtons::AUXILIARY,
            _ => return,
        };
        match state {
            ElementState::Pressed => {
                self.buttons = self.buttons.with(mask);
                if mask == PointerButtons::PRIMARY {
                    self.host.on_pointer_down(self.cursor.0, self.cursor.1);
                }
            }
            ElementState::Released => self.buttons = self.buttons.without(mask),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(token) = state.render_loop.scheduler_mut().take_due() else {
            return;
        };

        unsafe { state.resources.poll_noise(&state.gl) };

        let outcome = {
            let mut target = unsafe { GlFrameTarget::new(&state.gl, &state.resources) };
            state.render_loop.tick(token, &mut target, self.host.current_scene())
        };
        self.host.drain_errors();

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => return self.fail(event_loop, err),
        };

        if presents_frame(outcome) {
            if let Err(e) = state.surface.swap_buffers(&state.context) {
                tracing::warn!(error = %e, "swap_buffers failed");
            }
        }

        if let TickOutcome::Rendered { frame_index } = outcome {
            self.frames_rendered += 1;
            tracing::trace!(frame_index, "frame rendered");
            self.check_debug_exit(event_loop);
        }
    }

    fn check_debug_exit(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(debug_mode), Some(state)) = (self.config.debug_mode.as_ref(), self.state.as_ref())
        else {
            return;
        };
        if self.frames_rendered < debug_mode.frames {
            tracing::debug!(
                frame = self.frames_rendered,
                total = debug_mode.frames,
                "debug frame"
            );
            return;
        }

        let path = &debug_mode.output_path;
        match save_capture(state.render_loop.accumulation(), path) {
            Ok(()) => tracing::info!(path = %path.display(), "screenshot saved"),
            Err(e) => tracing::error!(error = %e, "failed to capture frame"),
        }
        event_loop.exit();
    }

    fn teardown(&mut self) {
        if let Some(state) = self.state.take() {
            let GlState {
                gl,
                resources,
                render_loop,
                context,
                surface,
                window,
            } = state;
            drop(render_loop);
            unsafe { resources.destroy(&gl) };
            drop(surface);
            drop(context);
            drop(window);
            tracing::info!(frames = self.frames_rendered, "renderer shut down");
        }
    }
}

/// Window matching the fixed square render target
///
/// Not resizable: the viewport, readback and previous-frame texture all stay
/// at the configured resolution.
fn window_attributes(config: &RuntimeConfig) -> WindowAttributes {
    Window::default_attributes()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::PhysicalSize::new(config.resolution, config.resolution))
        .with_resizable(false)
}

/// Whether a tick left a new frame in the back buffer
fn presents_frame(outcome: TickOutcome) -> bool {
    matches!(outcome, TickOutcome::Rendered { .. })
}

/// Write the accumulated pixels to `path` as an image
fn save_capture(
    accumulation: &AccumulationBuffer,
    path: &std::path::Path,
) -> Result<(), image::ImageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(image::ImageError::IoError)?;
    }
    let image = accumulation.to_image().ok_or_else(|| {
        image::ImageError::Parameter(image::error::ParameterError::from_kind(
            image::error::ParameterErrorKind::DimensionMismatch,
        ))
    })?;
    image.save(path)
}

impl ApplicationHandler for ViewerRuntime {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        tracing::info!("initializing window and GL context");

        match self.init_gl(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    let width = NonZeroU32::new(size.width);
                    let height = NonZeroU32::new(size.height);
                    if let (Some(width), Some(height)) = (width, height) {
                        state.surface.resize(&state.context, width, height);
                    }
                    state.render_loop.invalidate();
                    state.window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.host.on_pointer_move(self.cursor.0, self.cursor.1, self.buttons);
            }
            WindowEvent::MouseInput { state, button, .. } => self.handle_mouse_input(state, button),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape {
                        event_loop.exit();
                    } else if let Some(command) = SceneCommand::from_key(key) {
                        self.host.apply(command);
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Create an event loop
pub fn create_event_loop() -> Result<EventLoop<()>, winit::error::EventLoopError> {
    #[cfg(target_os = "linux")]
    {
        let mut builder = EventLoop::builder();
        builder.with_x11();
        builder.build()
    }

    #[cfg(not(target_os = "linux"))]
    {
        EventLoop::new()
    }
}

/// Run the viewer until the window closes
///
/// Returns the fatal render error that stopped it, if any.
pub fn run(config: RuntimeConfig, scene: Scene) -> Result<(), RunError> {
    let event_loop = create_event_loop()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut runtime = ViewerRuntime::new(config, scene);
    event_loop.run_app(&mut runtime)?;

    match runtime.fatal.take() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraw_scheduler_holds_latest_token() {
        let mut scheduler = RedrawScheduler::new(None);
        let first = scheduler.schedule();
        let second = scheduler.schedule();

        assert_ne!(first, second);
        assert_eq!(scheduler.take_due(), Some(second));
        assert_eq!(scheduler.take_due(), None);
    }

    #[test]
    fn test_redraw_scheduler_cancel() {
        let mut scheduler = RedrawScheduler::new(None);
        let stale = scheduler.schedule();
        let live = scheduler.schedule();

        scheduler.cancel(stale);
        assert_eq!(scheduler.take_due(), Some(live));

        let token = scheduler.schedule();
        scheduler.cancel(token);
        assert_eq!(scheduler.take_due(), None);
    }

    #[test]
    fn test_runtime_config_from_viewer_config() {
        let config = RuntimeConfig::from_config(&ViewerConfig::default())
            .with_debug_mode(3, PathBuf::from("out.png"));
        assert_eq!(config.resolution, 720);
        assert_eq!(config.capacity, Capacity::default());
        assert_eq!(
            config.debug_mode,
            Some(DebugMode {
                frames: 3,
                output_path: PathBuf::from("out.png"),
            })
        );
    }

    #[test]
    fn test_runtime_publishes_initial_scene() {
        let config = RuntimeConfig::from_config(&ViewerConfig::default());
        let runtime = ViewerRuntime::new(config, Scene::default());
        assert_eq!(**runtime.host().current_scene().unwrap(), Scene::default());
        assert!(runtime.host().last_error().is_none());
    }

    #[test]
    fn test_window_fixed_to_render_resolution() {
        let config = RuntimeConfig::from_config(&ViewerConfig::default());
        let attributes = window_attributes(&config);

        assert!(!attributes.resizable);
        assert_eq!(attributes.title, "Path Tracer");
        assert_eq!(
            attributes.inner_size,
            Some(winit::dpi::Size::Physical(winit::dpi::PhysicalSize::new(720, 720)))
        );
    }

    #[test]
    fn test_only_rendered_ticks_present() {
        assert!(presents_frame(TickOutcome::Rendered { frame_index: 1 }));
        assert!(!presents_frame(TickOutcome::Skipped));
        assert!(!presents_frame(TickOutcome::Idle));
        assert!(!presents_frame(TickOutcome::Stale));
    }
}
