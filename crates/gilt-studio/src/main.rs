mod scene;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use gilt_engine::coords::IVec2;
use gilt_engine::gpu::{GpuInit, RenderWindow, SurfaceErrorAction, TargetSettings};
use gilt_engine::logging::{init_logging, LoggingConfig};

use scene::Scene;

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    target: RenderWindow<'this>,
}

struct Studio {
    gpu_init: GpuInit,
    entry: Option<WindowEntry>,
    scene: Option<Scene>,
}

impl Studio {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("gilt studio")
            .with_inner_size(LogicalSize::new(960.0, 640.0));
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            window,
            target_builder: |w| RenderWindow::create(w, &gpu_init, TargetSettings::default()),
        }
        .try_build()?;

        let scene = entry.with_target_mut(|target| Scene::new(target))?;
        self.entry = Some(entry);
        self.scene = Some(scene);
        Ok(())
    }
}

impl ApplicationHandler for Studio {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            log::error!("failed to open studio window: {e:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(entry), Some(scene)) = (self.entry.as_mut(), self.scene.as_mut()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                // The scene owns GPU resources; drop it before the device.
                self.scene = None;
                self.entry = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                entry.with_target_mut(|t| t.resize(size));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_target_mut(|t| t.resize(size));
            }
            WindowEvent::CursorMoved { position, .. } => {
                scene.pointer_moved(IVec2::new(position.x as i32, position.y as i32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 40.0) as f32,
                };
                entry.with_target_mut(|t| scene.wheel(t, lines));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let (ElementState::Pressed, PhysicalKey::Code(code)) = (event.state, event.physical_key) {
                    entry.with_target_mut(|t| scene.key(t, code));
                }
            }
            WindowEvent::RedrawRequested => {
                let fatal = entry.with_target_mut(|t| {
                    scene.render(t);
                    t.backend().last_surface_error() == Some(SurfaceErrorAction::Fatal)
                });
                if fatal {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut studio = Studio { gpu_init: GpuInit::default(), entry: None, scene: None };

    event_loop
        .run_app(&mut studio)
        .context("winit event loop terminated with error")?;

    Ok(())
}
