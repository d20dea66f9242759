//! Animation loop driver.
//!
//! A winit application that translates window events into engine commands
//! and runs step -> buffer sync -> render once per `RedrawRequested`,
//! re-requesting a redraw each time. The cadence is the display's vsync
//! (the surface presents with `AutoVsync`); there is no fixed timestep and
//! no catch-up, per the frame-based time model.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::engine::{Command, Engine};
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::time::FrameTimer;

const WINDOW_TITLE: &str = "glyphdust";

/// The windowed animation application.
pub struct App {
    engine: Engine,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    timer: FrameTimer,
}

impl App {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            window: None,
            gpu: None,
            timer: FrameTimer::new(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

            let window = match event_loop.create_window(window_attrs) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let size = window.inner_size();
            self.engine.queue(Command::Resized {
                width: size.width,
                height: size.height,
            });

            self.window = Some(window.clone());
            match pollster::block_on(GpuState::new(window, &mut self.engine)) {
                Ok(gpu) => self.gpu = Some(gpu),
                Err(e) => {
                    eprintln!("{}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
                self.engine.queue(Command::Resized {
                    width: physical_size.width,
                    height: physical_size.height,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.engine.queue(Command::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::RedrawRequested => {
                self.engine.step();

                if let Some(gpu) = &mut self.gpu {
                    gpu.sync(&mut self.engine);
                    match gpu.render(self.engine.viewport().view_proj()) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => gpu.resize(winit::dpi::PhysicalSize {
                            width: gpu.config.width,
                            height: gpu.config.height,
                        }),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }

                if let Some(fps) = self.timer.update() {
                    if let Some(window) = &self.window {
                        window.set_title(&format!("{} - {:.0} fps", WINDOW_TITLE, fps));
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Run the animation. Blocks until the window is closed.
pub fn run(engine: Engine) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(engine);
    event_loop.run_app(&mut app)?;
    Ok(())
}
