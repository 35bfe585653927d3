//! Application phase store
//!
//! Holds the current phase, the latest coordinates and the active recipe.
//! Readers get `&Store`; every write goes through the interaction machine,
//! which owns the store, so the mutators are crate-private.

use serde::{Deserialize, Serialize};

use crate::coords::Coordinates;
use crate::recipe::Recipe;

/// Lifecycle stage of one interaction cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppPhase {
    /// Pointer tuning, waiting for a completed charge
    #[default]
    Tuning,
    /// Fixed-length transition after a recipe is generated
    Morphing,
    /// Recipe on display until reset
    Manifestation,
}

impl std::fmt::Display for AppPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppPhase::Tuning => write!(f, "TUNING"),
            AppPhase::Morphing => write!(f, "MORPHING"),
            AppPhase::Manifestation => write!(f, "MANIFESTATION"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    phase: AppPhase,
    coordinates: Coordinates,
    recipe: Option<Recipe>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    pub(crate) fn set_phase(&mut self, phase: AppPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.coordinates = coordinates;
    }

    /// Replace the active recipe
    pub(crate) fn set_recipe(&mut self, recipe: Recipe) {
        self.recipe = Some(recipe);
    }

    /// Back to tuning at the origin with no recipe
    pub(crate) fn reset(&mut self) {
        self.phase = AppPhase::Tuning;
        self.coordinates = Coordinates::ORIGIN;
        self.recipe = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::tests::{generator, FixedRandom};

    #[test]
    fn test_initial_state() {
        let store = Store::new();
        assert_eq!(store.phase(), AppPhase::Tuning);
        assert_eq!(store.coordinates(), Coordinates::ORIGIN);
        assert!(store.recipe().is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut store = Store::new();
        let coords = Coordinates::new(0.4, -0.9).unwrap();
        store.set_coordinates(coords);
        store.set_recipe(generator().generate(coords, &mut FixedRandom::new(vec![0.3])));
        store.set_phase(AppPhase::Manifestation);

        for _ in 0..2 {
            store.reset();
            assert_eq!(store.phase(), AppPhase::Tuning);
            assert_eq!(store.coordinates(), Coordinates::ORIGIN);
            assert!(store.recipe().is_none());
        }
    }

    #[test]
    fn test_new_recipe_replaces_old() {
        let mut store = Store::new();
        let gen = generator();
        let first = gen.generate(Coordinates::ORIGIN, &mut FixedRandom::new(vec![0.1]));
        let second = gen.generate(Coordinates::ORIGIN, &mut FixedRandom::new(vec![0.9]));
        store.set_recipe(first);
        store.set_recipe(second.clone());
        assert_eq!(store.recipe(), Some(&second));
    }
}
