use anyhow::{Context, Result};
use dotex_core::{Phase, StandardPhase};
use dotex_experiment::{ExperimentConfig, ExperimentEvent, ExperimentStateMachine};
use dotex_layout::LayoutStrategy;
use dotex_render::{Renderer, SkiaRenderer, render_with};
use dotex_timing::{HighPrecisionTimer, Timer};
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use std::sync::Arc;
use tiny_skia::Pixmap;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Fullscreen, Window, WindowId},
};

/// Text boxes per trial, as on the norming pages.
const RESPONSE_FIELDS: usize = 3;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    experiment: ExperimentStateMachine<StandardPhase, HighPrecisionTimer, ThreadRng>,
    renderer: SkiaRenderer,
    current_size: Option<PhysicalSize<u32>>,

    // Trial whose stimulus is on the canvas.
    shown_trial: Option<usize>,
    fields: Vec<String>,
    active_field: usize,
    results_written: bool,

    should_exit: bool,
}

impl App {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        let mut renderer = SkiaRenderer::new().with_background(config.background);
        renderer
            .attach(config.canvas_id.clone(), config.canvas_width, config.canvas_height)
            .context("allocating the stimulus canvas")?;
        let experiment =
            ExperimentStateMachine::new(config, HighPrecisionTimer::new(), rand::rng())?;

        Ok(Self {
            window: None,
            pixels: None,
            experiment,
            renderer,
            current_size: None,
            shown_trial: None,
            fields: vec![String::new(); RESPONSE_FIELDS],
            active_field: 0,
            results_written: false,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!(
            platform = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            trials = self.experiment.planned().count(),
            "starting session; SPACE to begin, ESC to quit"
        );
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let primary_monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow::anyhow!("No monitor available"))?;

        let window_attributes = Window::default_attributes()
            .with_title(self.prompt())
            .with_fullscreen(Some(Fullscreen::Borderless(Some(primary_monitor.clone()))))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        self.current_size = Some(physical_size);
        let screen = primary_monitor.size();
        self.experiment.set_screen(screen.width, screen.height);

        info!(
            width = physical_size.width,
            height = physical_size.height,
            scale_factor = window.scale_factor(),
            refresh_hz = primary_monitor
                .refresh_rate_millihertz()
                .map(|rate| rate as f64 / 1000.0),
            "display configured"
        );

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);

        window.request_redraw();
        self.window = Some(window);

        Ok(())
    }

    /// Window title for the current screen; the only text the app shows.
    fn prompt(&self) -> String {
        match self.experiment.current_phase() {
            StandardPhase::Intro => "Dot norming: press SPACE to begin".to_string(),
            StandardPhase::Instructions => {
                "You will see black and white dots. Describe how many dots of the named color \
                 there are, in your own words. SPACE to continue"
                    .to_string()
            }
            StandardPhase::ObjectTrial => {
                let (n, of) = self.experiment.trial_progress().unwrap_or((0, 0));
                let word = self
                    .experiment
                    .current_stimulus()
                    .map_or("", |s| s.color_target.word.as_str());
                format!(
                    "{n}/{of}: how many of the dots are {word}? {}  (TAB next box, ENTER submit)",
                    self.fields_line()
                )
            }
            StandardPhase::SubjectInfo => format!(
                "About you: age, native language, comments {}  (ENTER submit)",
                self.fields_line()
            ),
            StandardPhase::Thanks => "Thank you! ESC to exit".to_string(),
        }
    }

    fn fields_line(&self) -> String {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                if i == self.active_field {
                    format!("[{f}_]")
                } else {
                    format!("[{f}]")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn takes_text(&self) -> bool {
        let phase = self.experiment.current_phase();
        phase.presents_stimuli() || phase.collects_subject_info()
    }

    /// Draws a new layout onto the stimulus canvas whenever the trial on
    /// screen changes.
    fn refresh_stimulus(&mut self) -> Result<()> {
        let trial = self.experiment.trial_progress().map(|(id, _)| id);
        if trial == self.shown_trial {
            return Ok(());
        }
        self.shown_trial = trial;
        let (Some(spec), Some(strategy)) = (
            self.experiment.current_spec().cloned(),
            self.experiment.layout_strategy(),
        ) else {
            return Ok(());
        };

        let canvas_id = self.experiment.config.canvas_id.clone();
        self.renderer.clear(&canvas_id)?;
        let stats = match render_with(
            &mut self.renderer,
            &canvas_id,
            &spec,
            strategy,
            &mut self.experiment.rng,
        ) {
            Err(e) if e.is_unreachable() => {
                warn!(error = %e, strategy = strategy.name(), "layout failed, using the grid");
                render_with(
                    &mut self.renderer,
                    &canvas_id,
                    &spec,
                    LayoutStrategy::select(spec.total_count()),
                    &mut self.experiment.rng,
                )?
            }
            other => other?,
        };
        debug!(
            trial = ?trial,
            points = stats.points,
            draw_us = stats.elapsed.as_micros() as u64,
            "stimulus ready"
        );
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.refresh_stimulus()?;
        let (Some(pixels), Some(size)) = (self.pixels.as_mut(), self.current_size) else {
            return Ok(());
        };

        let started = self.experiment.timer.now();
        let frame = pixels.frame_mut();
        let background = self.experiment.config.background.to_rgba();
        for px in frame.chunks_exact_mut(4) {
            px.copy_from_slice(&background);
        }
        if self.shown_trial.is_some() {
            if let Some(canvas) = self.renderer.canvas(&self.experiment.config.canvas_id) {
                blit_centered(canvas, frame, size.width, size.height);
            }
        }
        pixels.render()?;
        let elapsed = self.experiment.timer.elapsed(started);
        self.experiment.timer.record_frame(elapsed);

        if let Some(window) = &self.window {
            window.request_redraw();
        }
        Ok(())
    }

    fn handle_input(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => {
                self.cleanup_and_exit(event_loop);
                return;
            }
            _ if !self.takes_text() => {
                if matches!(
                    event.logical_key,
                    Key::Named(NamedKey::Space | NamedKey::Enter)
                ) {
                    self.experiment.handle_event(ExperimentEvent::Continue);
                }
            }
            Key::Named(NamedKey::Enter) => self.submit(),
            Key::Named(NamedKey::Tab) => {
                self.active_field = (self.active_field + 1) % RESPONSE_FIELDS;
            }
            Key::Named(NamedKey::Backspace) => {
                self.fields[self.active_field].pop();
            }
            _ => {
                if let Some(text) = &event.text {
                    self.fields[self.active_field].extend(text.chars().filter(|c| !c.is_control()));
                }
            }
        }
        self.after_input();
    }

    fn submit(&mut self) {
        let words = self.fields.iter().map(|f| f.trim().to_string()).collect();
        if self
            .experiment
            .handle_event(ExperimentEvent::ResponseReceived(words))
        {
            self.fields.iter_mut().for_each(String::clear);
            self.active_field = 0;
        }
    }

    fn after_input(&mut self) {
        if self.experiment.is_complete() && !self.results_written {
            self.results_written = true;
            let path = self.experiment.config.results_path.clone();
            if let Err(e) = self.experiment.session_record().write_json(&path) {
                error!(error = %e, "could not save results");
            }
        }
        if let Some(window) = &self.window {
            window.set_title(&self.prompt());
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        self.current_size = Some(new_size);
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                warn!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                warn!(error = %e, "failed to resize buffer");
            }
        }
        info!(width = new_size.width, height = new_size.height, "display resized");
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        let frames = self.experiment.timer.stats();
        info!(
            complete = self.experiment.is_complete(),
            trials = self.experiment.results().len(),
            frames = frames.samples,
            avg_frame_ms = frames.average_ns / 1e6,
            jitter_ms = frames.jitter_ns / 1e6,
            "session closed"
        );
        self.should_exit = true;
        event_loop.exit();
    }
}

/// Copies `canvas` into the middle of an RGBA frame, cropping it if the
/// frame is smaller.
fn blit_centered(canvas: &Pixmap, frame: &mut [u8], frame_width: u32, frame_height: u32) {
    if frame.len() != (frame_width as usize) * (frame_height as usize) * 4 {
        return;
    }
    let width = canvas.width().min(frame_width) as usize;
    let height = canvas.height().min(frame_height) as usize;
    let x0 = (frame_width as usize - width) / 2;
    let y0 = (frame_height as usize - height) / 2;
    let src = canvas.data();
    for row in 0..height {
        let s = row * canvas.width() as usize * 4;
        let d = ((y0 + row) * frame_width as usize + x0) * 4;
        frame[d..d + width * 4].copy_from_slice(&src[s..s + width * 4]);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!(error = %e, "failed to create window and surface");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    error!(error = %e, "render failed");
                    self.cleanup_and_exit(event_loop);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                self.handle_input(&event, event_loop);
            }
            WindowEvent::Resized(sz) => self.handle_resize(sz),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.handle_resize(size);
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
