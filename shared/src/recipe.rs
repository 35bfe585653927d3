//! Recipe Generator
//!
//! Turns a point on the tuning plane into a [`Recipe`]: three ingredients
//! (core from the weather, mood from the mood, noise from the shared pool)
//! whose percentages always sum to exactly 100, plus a closing quote.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::coords::Coordinates;
use crate::corpus::CorpusTable;
use crate::mapping::{map_coordinates, MoodCategory, WeatherCategory};

/// Inclusive range for the core percentage
pub const CORE_RANGE: (u32, u32) = (45, 65);
/// Inclusive range for the mood percentage
pub const MOOD_RANGE: (u32, u32) = (25, 40);
/// Noise share used when core + mood leave nothing over
pub const NOISE_FALLBACK: u32 = 5;

const ID_PREFIX: &str = "ETHER-";
const ID_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of uniform draws in [0, 1)
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform index into a collection of `len` items (`len` > 0)
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Uniform integer in `lo..=hi`
    fn int_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        lo + self.index((hi - lo + 1) as usize) as u32
    }
}

impl<R: rand::RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        rand::Rng::gen::<f64>(self)
    }
}

/// Which slot of the recipe an ingredient fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientKind {
    Core,
    Mood,
    Noise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub percentage: u32,
    pub kind: IngredientKind,
}

/// The generated artifact for one completed interaction cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub timestamp: String,
    pub weather: WeatherCategory,
    pub mood: MoodCategory,
    /// Always core, mood, noise in that order
    pub ingredients: [Ingredient; 3],
    pub quote: String,
    pub coordinates: Coordinates,
}

impl Recipe {
    pub fn total_percentage(&self) -> u32 {
        self.ingredients.iter().map(|i| i.percentage).sum()
    }
}

/// Split 100 between core, mood and noise
///
/// Core is drawn from [`CORE_RANGE`], mood from [`MOOD_RANGE`], noise takes
/// the remainder. When the remainder would be zero or negative, noise is set
/// to [`NOISE_FALLBACK`] and mood absorbs the difference.
pub fn split_percentages<R: RandomSource + ?Sized>(rng: &mut R) -> (u32, u32, u32) {
    let core = rng.int_inclusive(CORE_RANGE.0, CORE_RANGE.1);
    let mood = rng.int_inclusive(MOOD_RANGE.0, MOOD_RANGE.1);
    if core + mood >= 100 {
        (core, 100 - core - NOISE_FALLBACK, NOISE_FALLBACK)
    } else {
        (core, mood, 100 - core - mood)
    }
}

/// `ETHER-` followed by six base-36 characters
pub fn recipe_id<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_LEN {
        id.push(BASE36[rng.index(BASE36.len())] as char);
    }
    id
}

/// Format as `18 OCT 2026 // 14:03:22`
pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    let month = MONTHS[now.month0() as usize];
    format!(
        "{:02} {} {} // {:02}:{:02}:{:02}",
        now.day(),
        month,
        now.year(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

fn pick<'a, R: RandomSource + ?Sized>(rng: &mut R, items: &'a [String]) -> &'a str {
    &items[rng.index(items.len())]
}

/// Generates recipes from a validated corpus
#[derive(Debug, Clone)]
pub struct RecipeGenerator {
    corpus: CorpusTable,
}

impl RecipeGenerator {
    pub fn new(corpus: CorpusTable) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &CorpusTable {
        &self.corpus
    }

    /// Generate a recipe for `coords`, stamped with the local wall clock
    pub fn generate<R: RandomSource + ?Sized>(&self, coords: Coordinates, rng: &mut R) -> Recipe {
        self.generate_at(coords, rng, &Local::now())
    }

    /// Generate a recipe for `coords`, stamped with `now`
    pub fn generate_at<R: RandomSource + ?Sized, Tz: TimeZone>(
        &self,
        coords: Coordinates,
        rng: &mut R,
        now: &DateTime<Tz>,
    ) -> Recipe {
        let (weather, mood) = map_coordinates(coords.x, coords.y);
        let (core_pct, mood_pct, noise_pct) = split_percentages(rng);

        let ingredients = [
            Ingredient {
                name: pick(rng, self.corpus.core(weather)).to_string(),
                percentage: core_pct,
                kind: IngredientKind::Core,
            },
            Ingredient {
                name: pick(rng, self.corpus.mood(mood)).to_string(),
                percentage: mood_pct,
                kind: IngredientKind::Mood,
            },
            Ingredient {
                name: pick(rng, self.corpus.noise()).to_string(),
                percentage: noise_pct,
                kind: IngredientKind::Noise,
            },
        ];

        let quote = pick(rng, self.corpus.quotes()).to_string();
        let id = recipe_id(rng);

        Recipe {
            id,
            timestamp: format_timestamp(now),
            weather,
            mood,
            ingredients,
            quote,
            coordinates: coords,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays a fixed list of draws, cycling when exhausted
    pub(crate) struct FixedRandom {
        values: Vec<f64>,
        cursor: usize,
    }

    impl FixedRandom {
        pub(crate) fn new(values: Vec<f64>) -> Self {
            Self { values, cursor: 0 }
        }
    }

    impl RandomSource for FixedRandom {
        fn next_unit(&mut self) -> f64 {
            let v = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            v
        }
    }

    pub(crate) fn generator() -> RecipeGenerator {
        RecipeGenerator::new(Corpus::builtin().unwrap().validate().unwrap())
    }

    fn assert_well_formed(recipe: &Recipe) {
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[0].kind, IngredientKind::Core);
        assert_eq!(recipe.ingredients[1].kind, IngredientKind::Mood);
        assert_eq!(recipe.ingredients[2].kind, IngredientKind::Noise);
        assert_eq!(recipe.total_percentage(), 100);
        assert!(recipe.ingredients[2].percentage >= 1);
        assert!(!recipe.id.is_empty());
        assert!(!recipe.timestamp.is_empty());
        assert!(!recipe.quote.is_empty());
    }

    #[test]
    fn test_split_always_sums_to_100() {
        for core in CORE_RANGE.0..=CORE_RANGE.1 {
            for mood in MOOD_RANGE.0..=MOOD_RANGE.1 {
                // Draws landing exactly on the chosen integers
                let core_draw = (core - CORE_RANGE.0) as f64 / 21.0 + 1e-9;
                let mood_draw = (mood - MOOD_RANGE.0) as f64 / 16.0 + 1e-9;
                let mut rng = FixedRandom::new(vec![core_draw, mood_draw]);
                let (c, m, n) = split_percentages(&mut rng);
                assert_eq!(c, core);
                assert_eq!(c + m + n, 100, "core {} mood {}", core, mood);
                assert!(n >= 1);
            }
        }
    }

    #[test]
    fn test_split_fallback_when_noise_would_vanish() {
        // Highest draws: core 65, mood 40
        let mut rng = FixedRandom::new(vec![0.999, 0.999]);
        assert_eq!(split_percentages(&mut rng), (65, 30, 5));

        // core 60 + mood 40 leaves exactly zero
        let mut rng = FixedRandom::new(vec![15.0 / 21.0 + 1e-9, 0.999]);
        assert_eq!(split_percentages(&mut rng), (60, 35, 5));
    }

    #[test]
    fn test_generated_recipes_are_well_formed() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..500 {
            let v = -1.0 + (i % 41) as f32 * 0.05;
            let coords = Coordinates::new(v, -v).unwrap();
            let recipe = generator.generate(coords, &mut rng);
            assert_well_formed(&recipe);
            assert_eq!(recipe.coordinates, coords);
        }
    }

    #[test]
    fn test_storm_void_corner_is_deterministic() {
        let generator = generator();
        let coords = Coordinates::new(-0.8, -0.8).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 7).unwrap();

        let first = generator.generate_at(coords, &mut FixedRandom::new(vec![0.25, 0.5, 0.75]), &now);
        let second = generator.generate_at(coords, &mut FixedRandom::new(vec![0.25, 0.5, 0.75]), &now);

        assert_eq!(first.weather, WeatherCategory::Storm);
        assert_eq!(first.mood, MoodCategory::Void);
        assert_eq!(first, second);
        assert_well_formed(&first);
        assert!(generator
            .corpus()
            .core(WeatherCategory::Storm)
            .contains(&first.ingredients[0].name));
        assert!(generator
            .corpus()
            .mood(MoodCategory::Void)
            .contains(&first.ingredients[1].name));
    }

    #[test]
    fn test_id_and_timestamp_format() {
        let mut rng = FixedRandom::new(vec![0.0, 0.999, 0.5]);
        let id = recipe_id(&mut rng);
        assert_eq!(id, "ETHER-0ZI0ZI");

        let now = Utc.with_ymd_and_hms(2026, 3, 4, 23, 9, 0).unwrap();
        assert_eq!(format_timestamp(&now), "04 MAR 2026 // 23:09:00");
    }
}
