//! The windowing/context collaborator.
//!
//! [`WindowSystem`] is the contract the frame loop runs against;
//! [`GlWindow`] is the production implementation over winit and glutin.
//! Tests substitute a scripted implementation, so the loop's cooperative
//! close behavior is checked without a display server.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::{Display, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use glutin_winit::GlWindow as _;
use raw_window_handle::HasRawWindowHandle;
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::EventLoopExtPumpEvents;
use winit::window::{Window as WinitWindow, WindowBuilder};

use crate::HarnessConfig;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("failed to initialize window: {0}")]
    Init(String),
    #[error("failed to initialize GL context: {0}")]
    Context(String),
    #[error("failed to swap buffers: {0}")]
    Swap(String),
}

/// The windowing service the frame loop depends on.
///
/// All calls are synchronous; polling and presentation block until done.
/// Construction (window creation, making the context current) happens in
/// the concrete implementation's constructor.
pub trait WindowSystem {
    /// Current drawable size in pixels.
    fn size(&self) -> (u32, u32);
    /// Whether a close has been requested, by the user or via
    /// [`WindowSystem::set_should_close`].
    fn should_close(&self) -> bool;
    fn set_should_close(&mut self, close: bool);
    /// Whether a key is currently held down.
    fn key_pressed(&self, key: KeyCode) -> bool;
    /// Pump the platform event queue, updating close and key state.
    fn poll_events(&mut self);
    /// Present the frame.
    fn swap_buffers(&mut self) -> Result<(), WindowError>;
    /// Seconds of wall-clock time since startup.
    fn time(&self) -> f32;
}

/// Production window: winit window + glutin GL 3.3 core context.
///
/// The window is fixed-size and the context is made current on the
/// constructing thread, which must also be the thread that runs the loop.
pub struct GlWindow {
    event_loop: EventLoop<()>,
    window: WinitWindow,
    display: Display,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    pressed: HashSet<KeyCode>,
    close_requested: bool,
    started: Instant,
}

impl GlWindow {
    pub fn new(config: &HarnessConfig) -> Result<Self, WindowError> {
        let event_loop = EventLoop::new().map_err(|err| WindowError::Init(err.to_string()))?;

        let window_builder = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(&event_loop, ConfigTemplateBuilder::new(), |mut configs| {
                configs.next().expect("display offered no GL configs")
            })
            .map_err(|err| WindowError::Init(err.to_string()))?;
        let window =
            window.ok_or_else(|| WindowError::Init("display builder returned no window".into()))?;

        let display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(window.raw_window_handle()));
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|err| WindowError::Context(err.to_string()))?;

        let surface_attributes =
            window.build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new());
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|err| WindowError::Context(err.to_string()))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|err| WindowError::Context(err.to_string()))?;

        if let Err(err) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            log::warn!("vsync unavailable: {err}");
        }

        log::info!(
            "created {}x{} window with GL 3.3 core context",
            config.width,
            config.height
        );

        Ok(Self {
            event_loop,
            window,
            display,
            surface,
            context,
            pressed: HashSet::new(),
            close_requested: false,
            started: Instant::now(),
        })
    }

    /// Load GL function pointers from the context's display.
    pub fn load_gl(&self) -> glow::Context {
        unsafe {
            glow::Context::from_loader_function_cstr(|symbol| self.display.get_proc_address(symbol))
        }
    }
}

impl WindowSystem for GlWindow {
    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn set_should_close(&mut self, close: bool) {
        self.close_requested = close;
    }

    fn key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    fn poll_events(&mut self) {
        let Self {
            event_loop,
            pressed,
            close_requested,
            ..
        } = self;

        let _ = event_loop.pump_events(Some(Duration::ZERO), |event, _| {
            if let Event::WindowEvent { event, .. } = event {
                match event {
                    WindowEvent::CloseRequested => *close_requested = true,
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(code),
                                state,
                                ..
                            },
                        ..
                    } => {
                        match state {
                            ElementState::Pressed => {
                                pressed.insert(code);
                            }
                            ElementState::Released => {
                                pressed.remove(&code);
                            }
                        }
                    }
                    _ => {}
                }
            }
        });
    }

    fn swap_buffers(&mut self) -> Result<(), WindowError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|err| WindowError::Swap(err.to_string()))
    }

    fn time(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}
