//! Shared core for the Ether experience
//!
//! Coordinate mapping, recipe generation, the phase store and the
//! interaction state machine that drives them, plus the fluid background
//! parameters and settings persistence used by the application.

pub mod config;
pub mod coords;
pub mod corpus;
pub mod fluid;
pub mod interaction;
pub mod logging;
pub mod mapping;
pub mod recipe;
pub mod store;
pub mod timer;

pub use config::{
    delete_config, load_config, load_config_or_default, save_config, ConfigError,
};
pub use coords::Coordinates;
pub use corpus::{Corpus, CorpusError, CorpusTable};
pub use fluid::{FluidUniforms, Hsl};
pub use interaction::{
    InteractionConfig, InteractionMachine, PointerKind, PointerSample, SubState, Surface,
};
pub use logging::{init_tracing, InitError};
pub use mapping::{map_coordinates, MoodCategory, WeatherCategory};
pub use recipe::{Ingredient, IngredientKind, RandomSource, Recipe, RecipeGenerator};
pub use store::{AppPhase, Store};
pub use timer::{TimerHandle, TimerQueue};
