//! Standalone demo window backed by winit.
//!
//! ```no_run
//! # use instancing::{DemoKind, Viewer};
//! Viewer::builder()
//!     .with_demo(DemoKind::Cubes)
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    error::DemoError, options::Options, DemoCommand, DemoEngine, DemoKind,
    InputEvent, MouseButton,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    demo: DemoKind,
    options: Option<Options>,
}

impl ViewerBuilder {
    /// Create a builder for the forest demo with default options.
    fn new() -> Self {
        Self {
            demo: DemoKind::default(),
            options: None,
        }
    }

    /// Choose which demo to run.
    #[must_use]
    pub fn with_demo(mut self, demo: DemoKind) -> Self {
        self.demo = demo;
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            demo: self.demo,
            options: self.options.unwrap_or_default(),
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window running one instancing demo.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    demo: DemoKind,
    options: Options,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Viewer`] if the event loop cannot be created or
    /// exits abnormally, or the engine's error if it failed to start.
    pub fn run(self) -> Result<(), DemoError> {
        let event_loop =
            EventLoop::new().map_err(|e| DemoError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            demo: self.demo,
            options: Some(self.options),
            startup_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| DemoError::Viewer(e.to_string()))?;
        app.startup_error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<DemoEngine>,
    demo: DemoKind,
    options: Option<Options>,
    startup_error: Option<DemoError>,
}

/// Surface size for a window size; never zero.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    /// Carry out a command the engine handed back.
    fn apply_window_command(
        &self,
        event_loop: &ActiveEventLoop,
        command: DemoCommand,
    ) {
        let Some(window) = &self.window else {
            return;
        };
        match command {
            DemoCommand::Quit => {
                log::info!("quit requested");
                event_loop.exit();
            }
            DemoCommand::Fullscreen => {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
            DemoCommand::Windowed => window.set_fullscreen(None),
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(options) = self.options.take() else {
            return;
        };

        let title = format!("{} - {}", options.window.title, self.demo);
        let mut attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                options.window.width,
                options.window.height,
            ));
        if options.window.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.startup_error = Some(DemoError::Viewer(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        let (vp_w, vp_h) = viewport_size(window.inner_size());
        let engine = match pollster::block_on(DemoEngine::new(
            window.clone(),
            (vp_w, vp_h),
            self.demo,
            &options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                self.startup_error = Some(e);
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };

        let command = match event {
            WindowEvent::Resized(event_size) => {
                let (vp_w, vp_h) = viewport_size(event_size);
                engine.resize(vp_w, vp_h);
                None
            }

            WindowEvent::RedrawRequested => {
                match engine.render() {
                    Ok(()) => {}
                    Err(
                        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost,
                    ) => {
                        let (vp_w, vp_h) = viewport_size(window.inner_size());
                        engine.resize(vp_w, vp_h);
                    }
                    Err(e) => {
                        log::error!("render error: {e:?}");
                    }
                }
                window.request_redraw();
                None
            }

            WindowEvent::MouseInput { button, state, .. } => engine
                .handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                }),

            WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let moved = InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                };
                engine.handle_input(moved)
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                engine.handle_input(InputEvent::Scroll {
                    delta: scroll_delta,
                })
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                engine.handle_key_press(&format!("{code:?}"))
            }

            _ => None,
        };

        if let Some(command) = command {
            self.apply_window_command(event_loop, command);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = &self.engine {
            log::info!(
                "{} demo closed at {} instances",
                engine.kind(),
                engine.scene().count().get()
            );
        }
    }
}
