use anyhow::{Context, Result};
use pixels::{Pixels, SurfaceTexture};
use scenex_core::{asset_url, Phase, TrialSpec};
use scenex_experiment::{
    write_results, DisplayRegion, ScenePresenter, Session, SessionConfig, SessionEvent,
};
use scenex_render::{RenderConfig, SkiaRenderer};
use scenex_timing::{HighPrecisionTimer, Timer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

/// Frames sampled before the display timing is reported.
const CALIBRATION_FRAMES: usize = 120;

type SceneSession = Session<ScenePresenter<HighPrecisionTimer>, HighPrecisionTimer>;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    session: SceneSession,
    renderer: Option<SkiaRenderer>,
    render_config: RenderConfig,
    image_urls: Vec<String>,
    fullscreen: bool,

    current_size: Option<PhysicalSize<u32>>,
    scale_factor: f64,
    refresh_rate: Option<f64>,
    cursor: Option<PhysicalPosition<f64>>,

    calibration_logged: bool,
    results_saved: bool,
    should_exit: bool,
}

impl App {
    pub fn new(
        session_config: SessionConfig,
        render_config: RenderConfig,
        trials: Vec<TrialSpec>,
        fullscreen: bool,
    ) -> Result<Self> {
        let image_urls = trials
            .iter()
            .filter_map(|t| t.stimulus_path().map(asset_url))
            .collect();
        let timer = HighPrecisionTimer::new();
        let presenter = ScenePresenter::new(timer.clone());
        let session = Session::new(session_config, presenter, timer, trials);

        Ok(Self {
            window: None,
            pixels: None,
            session,
            renderer: None,
            render_config,
            image_urls,
            fullscreen,
            current_size: None,
            scale_factor: 1.0,
            refresh_rate: None,
            cursor: None,
            calibration_logged: false,
            results_saved: false,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!(
            platform = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "scene-choice session ready; press SPACE to start or ESC to exit"
        );
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .context("no monitor available")?;

        self.refresh_rate = monitor
            .refresh_rate_millihertz()
            .map(|rate| rate as f64 / 1000.0);

        let mut attributes = Window::default_attributes()
            .with_title("Scene Choice")
            .with_resizable(!self.fullscreen);
        if self.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        self.current_size = Some(size);
        self.scale_factor = window.scale_factor();

        info!(
            width = size.width,
            height = size.height,
            scale_factor = self.scale_factor,
            refresh_hz = self.refresh_rate,
            "display configured"
        );

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);

        let mut renderer = SkiaRenderer::new(size.width, size.height, self.render_config.clone())
            .context("creating renderer")?;
        let usable = renderer
            .images()
            .preload(self.image_urls.iter().map(String::as_str));
        if usable < self.image_urls.len() {
            warn!(
                usable,
                total = self.image_urls.len(),
                "some stimulus images could not be loaded"
            );
        }
        self.renderer = Some(renderer);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };
        let start = Instant::now();

        let stats = renderer.render_frame(
            self.session.current_phase(),
            self.session.display().view(),
            self.session.trial_progress(),
            pixels.frame_mut(),
        )?;
        pixels.render()?;

        self.session.timer.record_frame(start.elapsed());
        trace!(
            clear_ms = stats.clear.as_secs_f64() * 1e3,
            draw_ms = stats.draw.as_secs_f64() * 1e3,
            copy_ms = stats.copy.as_secs_f64() * 1e3,
            total_ms = stats.total.as_secs_f64() * 1e3,
            "frame"
        );

        if !self.calibration_logged && self.session.timer.frame_count() >= CALIBRATION_FRAMES {
            let calib = self.session.timer.calibration_stats();
            info!(
                frame_ms = calib.average_frame_time_ns / 1e6,
                jitter_ms = calib.jitter_ns / 1e6,
                min_ms = calib.min_frame_time_ns / 1e6,
                max_ms = calib.max_frame_time_ns / 1e6,
                fps = calib.effective_fps,
                "frame timing"
            );
            self.calibration_logged = true;
        }
        Ok(())
    }

    fn update(&mut self, event_loop: &ActiveEventLoop) {
        for event in self.session.update() {
            self.session.handle_event(event);
        }
        if self.session.current_phase().is_debrief() && !self.results_saved {
            self.save_results();
        }
        if self.session.should_exit() {
            self.cleanup_and_exit(event_loop);
        }
    }

    fn handle_key(&mut self, key: PhysicalKey) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        match code {
            KeyCode::Space => {
                self.session.handle_event(SessionEvent::StartPressed);
            }
            KeyCode::Escape => {
                self.session.handle_event(SessionEvent::ExitRequested);
            }
            _ => {}
        }
    }

    fn handle_click(&mut self) {
        let (Some(cursor), Some(renderer)) = (self.cursor, self.renderer.as_ref()) else {
            return;
        };
        let Some(view) = self.session.display().view() else {
            return;
        };
        let layout = renderer.layout(view);
        let Some(index) = layout.hit_test(view, cursor.x as f32, cursor.y as f32) else {
            return;
        };
        let label = view.buttons[index].label.clone();
        self.session.handle_event(SessionEvent::Click(label));
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.current_size = Some(new_size);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize buffer");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                error!(error = %e, "failed to resize canvas");
            }
        }
        info!(width = new_size.width, height = new_size.height, "display resized");
    }

    fn save_results(&mut self) {
        let path = &self.session.config.results_path;
        match write_results(path, self.session.results()) {
            Ok(()) => self.results_saved = true,
            Err(e) => error!(error = %e, path = %path.display(), "could not save results"),
        }
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if !self.results_saved && !self.session.results().is_empty() {
            self.save_results();
        }
        info!(trials = self.session.results().len(), "session closed");
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!(error = %format!("{e:#}"), "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    error!(error = %format!("{e:#}"), "render failed");
                }
                self.update(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_key(event.physical_key);
                self.update(event_loop);
            }
            WindowEvent::CursorMoved { position, .. } => self.cursor = Some(position),
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(),
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        trace!("application resources released");
    }
}
