//! Interaction state machine
//!
//! Converts a stream of timestamped pointer samples into phase transitions.
//! While tuning, every sample is classified by velocity: fast samples mark
//! the pointer as moving (cancelling any charge and dropping the press),
//! slow samples arm a debounce that settles the pointer as stationary. A
//! charge runs only while the pointer is pressed, stationary and not moving;
//! when it runs to completion a recipe is generated and the phase advances
//! through morphing to manifestation.
//!
//! All timing is cooperative: the owner feeds samples through
//! [`InteractionMachine::handle_pointer`] and polls
//! [`InteractionMachine::advance`] with the current monotonic time.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::coords::Coordinates;
use crate::recipe::{RandomSource, RecipeGenerator};
use crate::store::{AppPhase, Store};
use crate::timer::{TimerHandle, TimerQueue};

/// Shortest interval a velocity is measured over (about one frame)
const MIN_VELOCITY_WINDOW_MS: f64 = 16.0;

/// Timing and velocity thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pixels per millisecond above which the pointer counts as moving
    pub velocity_threshold: f64,
    /// Quiet time before a slow pointer counts as stationary
    pub stationary_debounce_ms: f64,
    /// Length of the press-and-hold charge
    pub charge_duration_ms: f64,
    /// Length of the morphing transition
    pub morph_duration_ms: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 0.5,
            stationary_debounce_ms: 200.0,
            charge_duration_ms: 1500.0,
            morph_duration_ms: 1500.0,
        }
    }
}

/// The interaction surface in pointer space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Normalize a pointer position onto the tuning plane
    pub fn normalize(&self, x: f32, y: f32) -> Option<Coordinates> {
        Coordinates::from_surface((x, y), self.left, self.top, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// Pointer left the surface; handled exactly like `Up`
    Leave,
}

/// One pointer event in surface space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    /// Monotonic time in milliseconds
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub fn new(kind: PointerKind, x: f32, y: f32, timestamp_ms: f64) -> Self {
        Self {
            kind,
            x,
            y,
            timestamp_ms,
        }
    }
}

/// Read-only view of the pointer sub-state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubState {
    pub pressing: bool,
    pub moving: bool,
    pub stationary: bool,
    /// Last accepted sample: (x, y, timestamp_ms)
    pub last_sample: Option<(f32, f32, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Debounce,
    Charge,
    Morph,
}

#[derive(Debug, Clone, Copy)]
struct Charge {
    handle: TimerHandle,
    started_ms: f64,
}

/// Owns the [`Store`] and is its only writer
pub struct InteractionMachine<R: RandomSource = StdRng> {
    config: InteractionConfig,
    store: Store,
    generator: RecipeGenerator,
    rng: R,
    surface: Surface,
    sub: SubState,
    timers: TimerQueue<TimerKind>,
    debounce: Option<TimerHandle>,
    charge: Option<Charge>,
    morph: Option<TimerHandle>,
    now_ms: f64,
}

impl InteractionMachine<StdRng> {
    /// Machine seeded from system entropy
    pub fn from_entropy(
        config: InteractionConfig,
        generator: RecipeGenerator,
        surface: Surface,
    ) -> Self {
        Self::new(config, generator, StdRng::from_entropy(), surface)
    }
}

impl<R: RandomSource> InteractionMachine<R> {
    pub fn new(
        config: InteractionConfig,
        generator: RecipeGenerator,
        rng: R,
        surface: Surface,
    ) -> Self {
        Self {
            config,
            store: Store::new(),
            generator,
            rng,
            surface,
            sub: SubState::default(),
            timers: TimerQueue::new(),
            debounce: None,
            charge: None,
            morph: None,
            now_ms: 0.0,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// New thresholds apply to timers scheduled from now on
    pub fn set_config(&mut self, config: InteractionConfig) {
        self.config = config;
    }

    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    pub fn sub_state(&self) -> SubState {
        self.sub
    }

    /// Whether a charge is in progress (the renderer's intensity signal)
    pub fn is_charging(&self) -> bool {
        self.charge.is_some()
    }

    /// Charge progress in [0, 1]; 0 when no charge is running
    pub fn charge_progress(&self) -> f32 {
        match self.charge {
            Some(charge) if self.config.charge_duration_ms > 0.0 => {
                (((self.now_ms - charge.started_ms) / self.config.charge_duration_ms) as f32)
                    .clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Progress through the morphing transition in [0, 1]
    pub fn morph_progress(&self) -> f32 {
        match self.morph.and_then(|h| self.timers.due_ms(h)) {
            Some(due) if self.config.morph_duration_ms > 0.0 => {
                let remaining = (due - self.now_ms) / self.config.morph_duration_ms;
                (1.0 - remaining as f32).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Fire every timer due at or before `now_ms`, in due order
    pub fn advance(&mut self, now_ms: f64) {
        if !now_ms.is_finite() {
            return;
        }
        while let Some((handle, kind, due_ms)) = self.timers.pop_due(now_ms) {
            self.now_ms = self.now_ms.max(due_ms);
            match kind {
                TimerKind::Debounce => self.on_debounce(handle, due_ms),
                TimerKind::Charge => self.on_charge_complete(handle, due_ms),
                TimerKind::Morph => self.on_morph_complete(handle),
            }
        }
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Process one pointer sample
    ///
    /// Timers due before the sample fire first. Samples outside the tuning
    /// phase and samples with non-finite positions are discarded.
    pub fn handle_pointer(&mut self, sample: PointerSample) {
        if !sample.timestamp_ms.is_finite() {
            trace!(?sample, "discarding sample with invalid timestamp");
            return;
        }
        self.advance(sample.timestamp_ms);

        if self.store.phase() != AppPhase::Tuning {
            return;
        }

        match sample.kind {
            PointerKind::Up | PointerKind::Leave => self.release(),
            PointerKind::Down | PointerKind::Move => {
                let Some(coords) = self.surface.normalize(sample.x, sample.y) else {
                    trace!(?sample, "discarding non-finite pointer sample");
                    return;
                };
                self.store.set_coordinates(coords);

                if sample.kind == PointerKind::Down {
                    self.press(sample);
                } else {
                    self.track(sample);
                }
                self.sub.last_sample = Some((sample.x, sample.y, sample.timestamp_ms));
            }
        }
    }

    /// Drop the recipe and return to tuning at the origin
    pub fn reset(&mut self) {
        self.timers.clear();
        self.debounce = None;
        self.charge = None;
        self.morph = None;
        self.sub = SubState::default();
        self.store.reset();
        info!(phase = %AppPhase::Tuning, "reset");
    }

    fn velocity(&self, sample: &PointerSample) -> Option<f64> {
        let (lx, ly, lt) = self.sub.last_sample?;
        let dx = (sample.x - lx) as f64;
        let dy = (sample.y - ly) as f64;
        let distance = (dx * dx + dy * dy).sqrt();
        let elapsed = (sample.timestamp_ms - lt).max(MIN_VELOCITY_WINDOW_MS);
        Some(distance / elapsed)
    }

    fn press(&mut self, sample: PointerSample) {
        self.sub.pressing = true;

        match self.velocity(&sample) {
            // No prior reference: stationary on click
            None => {
                self.cancel_debounce();
                self.sub.moving = false;
                self.sub.stationary = true;
            }
            Some(v) if v > self.config.velocity_threshold => {
                self.sub.moving = true;
                self.sub.stationary = false;
                self.restart_debounce(sample.timestamp_ms);
            }
            Some(_) => {}
        }

        if self.sub.stationary && !self.sub.moving {
            self.start_charge(sample.timestamp_ms);
        } else if self.debounce.is_none() {
            self.restart_debounce(sample.timestamp_ms);
        } else {
            debug!("charge deferred until pointer settles");
        }
    }

    fn track(&mut self, sample: PointerSample) {
        match self.velocity(&sample) {
            Some(v) if v > self.config.velocity_threshold => {
                if !self.sub.moving {
                    debug!(velocity = v, "pointer moving");
                }
                self.sub.moving = true;
                self.sub.stationary = false;
                self.sub.pressing = false;
                self.cancel_charge();
                self.restart_debounce(sample.timestamp_ms);
            }
            _ => {
                if !self.sub.stationary && self.debounce.is_none() {
                    self.restart_debounce(sample.timestamp_ms);
                }
            }
        }
    }

    fn release(&mut self) {
        self.cancel_charge();
        self.cancel_debounce();
        self.sub = SubState::default();
    }

    fn restart_debounce(&mut self, from_ms: f64) {
        self.cancel_debounce();
        let due = from_ms + self.config.stationary_debounce_ms;
        self.debounce = Some(self.timers.schedule(TimerKind::Debounce, due));
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            self.timers.cancel(handle);
        }
    }

    fn start_charge(&mut self, at_ms: f64) {
        self.cancel_charge();
        let due = at_ms + self.config.charge_duration_ms;
        let handle = self.timers.schedule(TimerKind::Charge, due);
        self.charge = Some(Charge {
            handle,
            started_ms: at_ms,
        });
        debug!(at_ms, "charge started");
    }

    fn cancel_charge(&mut self) {
        if let Some(charge) = self.charge.take() {
            self.timers.cancel(charge.handle);
            debug!("charge cancelled");
        }
    }

    fn on_debounce(&mut self, handle: TimerHandle, at_ms: f64) {
        if self.debounce != Some(handle) {
            return;
        }
        self.debounce = None;
        self.sub.moving = false;
        self.sub.stationary = true;
        trace!(at_ms, "pointer stationary");

        if self.store.phase() == AppPhase::Tuning && self.sub.pressing && self.charge.is_none() {
            self.start_charge(at_ms);
        }
    }

    fn on_charge_complete(&mut self, handle: TimerHandle, at_ms: f64) {
        match self.charge {
            Some(charge) if charge.handle == handle => {}
            _ => return,
        }
        self.charge = None;

        let ready = self.store.phase() == AppPhase::Tuning
            && self.sub.pressing
            && self.sub.stationary
            && !self.sub.moving;
        if !ready {
            return;
        }

        let snapshot = self.store.coordinates();
        let recipe = self.generator.generate(snapshot, &mut self.rng);
        info!(
            id = %recipe.id,
            weather = %recipe.weather,
            mood = %recipe.mood,
            x = snapshot.x,
            y = snapshot.y,
            "recipe generated"
        );
        self.store.set_recipe(recipe);

        self.cancel_debounce();
        self.sub = SubState::default();
        self.store.set_phase(AppPhase::Morphing);
        info!(phase = %AppPhase::Morphing, "phase changed");

        let due = at_ms + self.config.morph_duration_ms;
        self.morph = Some(self.timers.schedule(TimerKind::Morph, due));
    }

    fn on_morph_complete(&mut self, handle: TimerHandle) {
        if self.morph != Some(handle) {
            return;
        }
        self.morph = None;
        if self.store.phase() == AppPhase::Morphing {
            self.store.set_phase(AppPhase::Manifestation);
            info!(phase = %AppPhase::Manifestation, "phase changed");
        }
    }
}
