//! Ether
//!
//! Tune an atmosphere by dragging across the plane: x is weather (storm to
//! sun), y is mood (void to manic). A fluid background follows the pointer.
//! Press and hold still to charge; a completed charge distils a recipe for
//! the chosen coordinates and presents it as a receipt card.

mod drawing;
mod ui;

use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use std::time::Instant;

use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};
use shared::{
    AppPhase, Corpus, CorpusError, FluidUniforms, InteractionConfig, InteractionMachine,
    PointerKind, PointerSample, RecipeGenerator, Surface,
};
use tracing::{error, info, warn};

const SETTINGS_NAME: &str = "ether";
/// Per-frame easing of the drawn cursor toward the pointer
const CURSOR_EASE: f32 = 0.35;

/// Settings and corpus validated before the window opens
static STARTUP: OnceLock<Startup> = OnceLock::new();

#[derive(Clone)]
struct Startup {
    settings: Settings,
    generator: RecipeGenerator,
}

/// Persisted settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub interaction: InteractionConfig,
    pub reduced_motion: bool,
    pub show_grid: bool,
    /// Optional corpus file replacing the built-in one
    pub corpus_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interaction: InteractionConfig::default(),
            reduced_motion: false,
            show_grid: true,
            corpus_path: None,
        }
    }
}

fn load_generator(settings: &Settings) -> Result<RecipeGenerator, CorpusError> {
    let corpus = match &settings.corpus_path {
        Some(path) => {
            info!(path = %path.display(), "loading corpus");
            Corpus::load(path)?
        }
        None => Corpus::builtin()?,
    };
    Ok(RecipeGenerator::new(corpus.validate()?))
}

fn save_settings(settings: &Settings) {
    if let Err(e) = shared::save_config(SETTINGS_NAME, settings) {
        warn!(error = %e, "failed to save settings");
    }
}

fn main() {
    if let Err(e) = shared::init_tracing() {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let settings: Settings = shared::load_config_or_default(SETTINGS_NAME);
    let generator = match load_generator(&settings) {
        Ok(generator) => generator,
        Err(e) => {
            error!(error = %e, "corpus is incomplete, refusing to start");
            process::exit(1);
        }
    };
    let startup = Startup {
        settings,
        generator,
    };
    if STARTUP.set(startup).is_err() {
        error!("startup state already set");
        process::exit(1);
    }

    nannou::app(model).update(update).run();
}

/// Application state
pub struct Model {
    /// Owns the phase store; the only writer to it
    pub machine: InteractionMachine,
    /// Smoothed background parameters
    pub fluid: FluidUniforms,
    pub settings: Settings,
    /// Origin of the millisecond clock fed to the machine
    pub started: Instant,

    /// Raw pointer position (window coordinates)
    pub pointer: Point2,
    /// Eased cursor position for drawing
    pub cursor: Point2,
    pub cursor_visible: bool,

    pub window_rect: Rect,
    /// Animation time (seconds since start)
    pub animation_time: f32,

    /// UI state
    pub calibration_open: bool,
    pub ui_wants_pointer: bool,

    /// egui integration
    egui: Egui,
}

impl Model {
    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Forward a pointer event in window coordinates to the machine
    fn feed(&mut self, kind: PointerKind, pos: Point2) {
        let rect = self.window_rect;
        let sample = PointerSample::new(kind, pos.x - rect.left(), rect.top() - pos.y, self.now_ms());
        self.machine.handle_pointer(sample);
    }

    fn sync_surface(&mut self, rect: Rect) {
        self.window_rect = rect;
        self.machine
            .set_surface(Surface::new(0.0, 0.0, rect.w(), rect.h()));
    }

    /// Discard the recipe and start tuning again
    pub fn resample(&mut self) {
        self.machine.reset();
    }

    pub fn toggle_reduced_motion(&mut self) {
        self.settings.reduced_motion = !self.settings.reduced_motion;
        save_settings(&self.settings);
    }

    /// Delete the settings file and fall back to defaults
    pub fn forget_settings(&mut self) {
        if let Err(e) = shared::delete_config(SETTINGS_NAME) {
            warn!(error = %e, "failed to delete settings");
        }
        // The corpus in use stays loaded until restart
        self.settings = Settings {
            corpus_path: self.settings.corpus_path.take(),
            ..Settings::default()
        };
        self.machine.set_config(self.settings.interaction);
        info!("settings reset to defaults");
    }

    pub fn toggle_grid(&mut self) {
        self.settings.show_grid = !self.settings.show_grid;
        save_settings(&self.settings);
    }
}

fn model(app: &App) -> Model {
    // Disable default escape-to-exit behavior
    app.set_exit_on_escape(false);

    let startup = match STARTUP.get() {
        Some(startup) => startup.clone(),
        None => {
            error!("startup state missing");
            process::exit(1);
        }
    };

    let window_id = app
        .new_window()
        .title("Ether")
        .size(1100, 760)
        .min_size(480, 480)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_exited(mouse_exited)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);
    let rect = window.rect();

    let machine = InteractionMachine::from_entropy(
        startup.settings.interaction,
        startup.generator,
        Surface::new(0.0, 0.0, rect.w(), rect.h()),
    );

    Model {
        machine,
        fluid: FluidUniforms::default(),
        settings: startup.settings,
        started: Instant::now(),
        pointer: pt2(0.0, 0.0),
        cursor: pt2(0.0, 0.0),
        cursor_visible: false,
        window_rect: rect,
        animation_time: 0.0,
        calibration_open: false,
        ui_wants_pointer: false,
        egui,
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    model.animation_time = update.since_start.as_secs_f32();

    let rect = app.window_rect();
    if rect != model.window_rect {
        model.sync_surface(rect);
    }

    // Fire any due debounce/charge/morph timers
    let now = model.now_ms();
    model.machine.advance(now);

    let phase = model.machine.store().phase();
    let coords = model.machine.store().coordinates();
    model
        .fluid
        .step(coords, model.machine.is_charging(), phase != AppPhase::Morphing);

    model.cursor = if model.settings.reduced_motion {
        model.pointer
    } else {
        model.cursor.lerp(model.pointer, CURSOR_EASE)
    };

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let mut card = ui::ReceiptCardResult::default();
    if phase == AppPhase::Manifestation {
        if let Some(recipe) = model.machine.store().recipe() {
            card = ui::draw_receipt_card(&ctx, recipe);
        }
    }

    let mut calibration = ui::CalibrationResult::default();
    if model.calibration_open {
        calibration =
            ui::draw_calibration_panel(&ctx, &mut model.calibration_open, &mut model.settings);
    }

    model.ui_wants_pointer = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
    drop(ctx);

    // Apply UI results
    if card.resample {
        model.resample();
    }
    if calibration.forget {
        model.forget_settings();
        return;
    }
    if calibration.interaction_changed {
        model.machine.set_config(model.settings.interaction);
    }
    if calibration.changed {
        save_settings(&model.settings);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(drawing::colors::BACKGROUND);

    // Persistent fluid background
    drawing::draw_fluid(&draw, window_rect, model);

    match model.machine.store().phase() {
        AppPhase::Tuning => {
            if model.settings.show_grid {
                drawing::draw_grid_guide(&draw, window_rect);
            }
            drawing::draw_axis_labels(&draw, window_rect);
            if model.cursor_visible {
                drawing::draw_cursor(&draw, model);
            }
        }
        AppPhase::Morphing => {
            drawing::draw_morph(
                &draw,
                window_rect,
                model.machine.morph_progress(),
                model.animation_time,
                model.settings.reduced_motion,
            );
        }
        AppPhase::Manifestation => {}
    }

    drawing::draw_branding(&draw, window_rect, model.animation_time);

    // Render to frame
    draw.to_frame(app, &frame).unwrap();

    // Render egui on top
    model.egui.draw_to_frame(&frame).unwrap();
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        // C - calibration panel
        Key::C => {
            model.calibration_open = !model.calibration_open;
        }

        // G - grid guide
        Key::G => {
            model.toggle_grid();
        }

        // M - reduced motion
        Key::M => {
            model.toggle_reduced_motion();
        }

        // R / Space - resample from the receipt card
        Key::R | Key::Space => {
            if model.machine.store().phase() == AppPhase::Manifestation {
                model.resample();
            }
        }

        // Escape - close calibration
        Key::Escape => {
            model.calibration_open = false;
        }

        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left && !model.ui_wants_pointer {
        model.feed(PointerKind::Down, app.mouse.position());
    }
}

fn mouse_released(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.feed(PointerKind::Up, app.mouse.position());
    }
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.pointer = pos;
    model.cursor_visible = true;
    model.feed(PointerKind::Move, pos);
}

fn mouse_exited(app: &App, model: &mut Model) {
    model.cursor_visible = false;
    model.feed(PointerKind::Leave, app.mouse.position());
}

fn raw_window_event(app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);

    // Handle touch events (map to pointer samples)
    if let nannou::winit::event::WindowEvent::Touch(touch) = event {
        let window_rect = app.window_rect();

        // Convert touch position to nannou coordinates
        let pos = pt2(
            touch.location.x as f32 - window_rect.w() / 2.0,
            window_rect.h() / 2.0 - touch.location.y as f32,
        );

        match touch.phase {
            nannou::winit::event::TouchPhase::Started => {
                model.pointer = pos;
                model.cursor = pos;
                model.cursor_visible = true;
                model.feed(PointerKind::Down, pos);
            }
            nannou::winit::event::TouchPhase::Moved => {
                model.pointer = pos;
                model.feed(PointerKind::Move, pos);
            }
            nannou::winit::event::TouchPhase::Ended
            | nannou::winit::event::TouchPhase::Cancelled => {
                model.cursor_visible = false;
                model.feed(PointerKind::Up, pos);
            }
        }
    }
}
