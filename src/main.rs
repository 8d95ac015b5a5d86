use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use ray_arena::config::{SimConfig, env_parse, env_str};
use ray_arena::display;
use ray_arena::renderer::{Canvas, pack_rgb};
use ray_arena::sim::Simulation;

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    sim: Simulation,
    initial_size: LogicalSize<f64>,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
}

impl App {
    fn new(sim: Simulation, width: f64, height: f64) -> Self {
        Self {
            window: None,
            surface: None,
            sim,
            initial_size: LogicalSize::new(width, height),
            frame_counter: 0,
            last_fps_print: Instant::now(),
        }
    }

    fn redraw(&mut self, id: WindowId) {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return,
        };

        let size = window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return; // Minimized window, skip drawing
        };
        if let Err(e) = surface.resize(nw, nh) {
            warn!(%e, "surface resize failed");
            return;
        }
        let (dw, dh) = (size.width as usize, size.height as usize);

        let frame = self.sim.step(dw as f32, dh as f32);
        let list = display::compose(&frame, dw as f32, dh as f32);

        let mut buf = match surface.buffer_mut() {
            Ok(buf) => buf,
            Err(e) => {
                warn!(%e, "no buffer for this frame");
                return;
            }
        };
        let mut canvas = Canvas::new(&mut buf, dw, dh);
        canvas.clear(pack_rgb(0, 0, 0));
        canvas.draw(&list);
        if let Err(e) = buf.present() {
            warn!(%e, "present failed");
        }

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let player = self.sim.player();
            info!(
                fps = format_args!("{:.1}", self.frame_counter as f32 / elapsed),
                x = player.pos.x,
                y = player.pos.y,
                "frame stats"
            );
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("Ray Arena")
            .with_inner_size(self.initial_size);

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                error!(%e, "could not create window");
                event_loop.exit();
                return;
            }
        };
        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(s) => s,
            Err(e) => {
                error!(%e, "could not create drawing surface");
                event_loop.exit();
                return;
            }
        };

        self.surface = Some(surface);
        self.last_fps_print = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("escape pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.redraw(id),

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    let filter = EnvFilter::try_new(env_str("RAY_ARENA_LOG_LEVEL", "info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).compact().init();

    let config = SimConfig::from_env();
    let sim = match Simulation::arena(config) {
        Ok(sim) => sim,
        Err(e) => {
            error!(%e, "invalid simulation configuration");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            error!(%e, "could not create event loop");
            std::process::exit(1);
        }
    };
    // The simulation advances once per redraw; about_to_wait keeps redraws coming.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(
        sim,
        env_parse("RAY_ARENA_WIDTH", 1200.0),
        env_parse("RAY_ARENA_HEIGHT", 800.0),
    );
    if let Err(e) = event_loop.run_app(&mut app) {
        error!(%e, "event loop terminated with an error");
    }
}
