//! Content corpus for recipe generation
//!
//! Loaded from TOML (a built-in copy ships with the crate) and validated
//! once at startup. Validation produces a [`CorpusTable`] that is total over
//! every weather and mood category, so lookups at generation time cannot
//! miss.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapping::{MoodCategory, WeatherCategory};

const BUILTIN_CORPUS: &str = include_str!("../assets/corpus.toml");

/// Errors raised while loading or validating a corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse corpus: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("corpus has no core entries for weather {0}")]
    MissingWeather(WeatherCategory),
    #[error("corpus has no mood entries for mood {0}")]
    MissingMood(MoodCategory),
    #[error("corpus noise pool is empty")]
    EmptyNoise,
    #[error("corpus quote pool is empty")]
    EmptyQuotes,
}

/// Raw corpus as written on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// Core ingredient names keyed by weather (`RAIN`, `SUN`, ...)
    #[serde(default)]
    pub core: BTreeMap<String, Vec<String>>,
    /// Mood ingredient names keyed by mood (`VOID`, `MANIC`, ...)
    #[serde(default)]
    pub mood: BTreeMap<String, Vec<String>>,
    /// Unconditioned noise ingredient names
    #[serde(default)]
    pub noise: Vec<String>,
    /// Closing quotes
    #[serde(default)]
    pub quotes: Vec<String>,
}

impl Corpus {
    /// The corpus bundled with the crate
    pub fn builtin() -> Result<Self, CorpusError> {
        Self::from_toml_str(BUILTIN_CORPUS)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CorpusError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a corpus file from disk
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let contents = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check that every category has at least one entry
    pub fn validate(self) -> Result<CorpusTable, CorpusError> {
        let mut core: [Vec<String>; 5] = Default::default();
        for weather in WeatherCategory::ALL {
            let names = non_empty(self.core.get(weather.key()))
                .ok_or(CorpusError::MissingWeather(weather))?;
            core[weather.rank()] = names;
        }

        let mut mood: [Vec<String>; 5] = Default::default();
        for m in MoodCategory::ALL {
            let names = non_empty(self.mood.get(m.key())).ok_or(CorpusError::MissingMood(m))?;
            mood[m.rank()] = names;
        }

        let noise = non_empty(Some(&self.noise)).ok_or(CorpusError::EmptyNoise)?;
        let quotes = non_empty(Some(&self.quotes)).ok_or(CorpusError::EmptyQuotes)?;

        Ok(CorpusTable {
            core,
            mood,
            noise,
            quotes,
        })
    }
}

/// Blank names are dropped; `None` if nothing is left
fn non_empty(names: Option<&Vec<String>>) -> Option<Vec<String>> {
    let names: Vec<String> = names?
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

/// A validated corpus, total over all categories
#[derive(Debug, Clone)]
pub struct CorpusTable {
    core: [Vec<String>; 5],
    mood: [Vec<String>; 5],
    noise: Vec<String>,
    quotes: Vec<String>,
}

impl CorpusTable {
    pub fn core(&self, weather: WeatherCategory) -> &[String] {
        &self.core[weather.rank()]
    }

    pub fn mood(&self, mood: MoodCategory) -> &[String] {
        &self.mood[mood.rank()]
    }

    pub fn noise(&self) -> &[String] {
        &self.noise
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_corpus_is_complete() {
        let table = Corpus::builtin().unwrap().validate().unwrap();
        for w in WeatherCategory::ALL {
            assert!(!table.core(w).is_empty());
        }
        for m in MoodCategory::ALL {
            assert!(!table.mood(m).is_empty());
        }
        assert!(!table.noise().is_empty());
        assert!(!table.quotes().is_empty());
    }

    #[test]
    fn test_missing_weather_is_rejected() {
        let mut corpus = Corpus::builtin().unwrap();
        corpus.core.remove("AURORA");
        let err = corpus.validate().unwrap_err();
        assert!(matches!(err, CorpusError::MissingWeather(WeatherCategory::Aurora)));
    }

    #[test]
    fn test_blank_mood_entries_count_as_missing() {
        let mut corpus = Corpus::builtin().unwrap();
        corpus
            .mood
            .insert("QUIET".to_string(), vec!["   ".to_string()]);
        let err = corpus.validate().unwrap_err();
        assert!(matches!(err, CorpusError::MissingMood(MoodCategory::Quiet)));
    }

    #[test]
    fn test_empty_pools_are_rejected() {
        let mut corpus = Corpus::builtin().unwrap();
        corpus.quotes.clear();
        assert!(matches!(corpus.validate(), Err(CorpusError::EmptyQuotes)));

        let mut corpus = Corpus::builtin().unwrap();
        corpus.noise.clear();
        assert!(matches!(corpus.validate(), Err(CorpusError::EmptyNoise)));
    }

    #[test]
    fn test_partial_file_parses_but_fails_validation() {
        let corpus = Corpus::from_toml_str("noise = [\"a\"]\nquotes = [\"b\"]\n").unwrap();
        assert!(matches!(
            corpus.validate(),
            Err(CorpusError::MissingWeather(_))
        ));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = Corpus::load(Path::new("/definitely/not/here/corpus.toml")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
