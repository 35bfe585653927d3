//! Coordinate Mapper - continuous tuning plane to discrete categories
//!
//! The x axis runs from storm (-1) to sun (+1), the y axis from void (-1)
//! to manic (+1). Each axis is split into five half-open bands by a fixed
//! boundary table; the last band is open-ended.

use serde::{Deserialize, Serialize};

/// Weather category derived from the x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherCategory {
    Rain,
    Sun,
    Fog,
    Storm,
    Aurora,
}

/// Mood category derived from the y coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoodCategory {
    Void,
    Manic,
    Joy,
    Broken,
    Quiet,
}

impl WeatherCategory {
    /// Every variant, in declaration order
    pub const ALL: [WeatherCategory; 5] = [
        WeatherCategory::Rain,
        WeatherCategory::Sun,
        WeatherCategory::Fog,
        WeatherCategory::Storm,
        WeatherCategory::Aurora,
    ];

    /// Key used by corpus files
    pub fn key(self) -> &'static str {
        match self {
            WeatherCategory::Rain => "RAIN",
            WeatherCategory::Sun => "SUN",
            WeatherCategory::Fog => "FOG",
            WeatherCategory::Storm => "STORM",
            WeatherCategory::Aurora => "AURORA",
        }
    }

    /// Longer display name for the receipt card
    pub fn display_name(self) -> &'static str {
        match self {
            WeatherCategory::Rain => "Heavy Rain",
            WeatherCategory::Sun => "First Light",
            WeatherCategory::Fog => "Mist",
            WeatherCategory::Storm => "Typhoon Eye",
            WeatherCategory::Aurora => "Aurora",
        }
    }

    /// Position on the storm-to-sun axis (0 = stormiest)
    pub fn rank(self) -> usize {
        match self {
            WeatherCategory::Storm => 0,
            WeatherCategory::Rain => 1,
            WeatherCategory::Fog => 2,
            WeatherCategory::Aurora => 3,
            WeatherCategory::Sun => 4,
        }
    }
}

impl MoodCategory {
    /// Every variant, in declaration order
    pub const ALL: [MoodCategory; 5] = [
        MoodCategory::Void,
        MoodCategory::Manic,
        MoodCategory::Joy,
        MoodCategory::Broken,
        MoodCategory::Quiet,
    ];

    /// Key used by corpus files
    pub fn key(self) -> &'static str {
        match self {
            MoodCategory::Void => "VOID",
            MoodCategory::Manic => "MANIC",
            MoodCategory::Joy => "JOY",
            MoodCategory::Broken => "BROKEN",
            MoodCategory::Quiet => "QUIET",
        }
    }

    /// Longer display name for the receipt card
    pub fn display_name(self) -> &'static str {
        match self {
            MoodCategory::Void => "Void",
            MoodCategory::Manic => "Manic",
            MoodCategory::Joy => "Small Joy",
            MoodCategory::Broken => "Broken",
            MoodCategory::Quiet => "Quiet",
        }
    }

    /// Position on the void-to-manic axis (0 = most void)
    pub fn rank(self) -> usize {
        match self {
            MoodCategory::Void => 0,
            MoodCategory::Broken => 1,
            MoodCategory::Quiet => 2,
            MoodCategory::Joy => 3,
            MoodCategory::Manic => 4,
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Upper bounds (exclusive) of the first four x bands, stormiest first
pub const WEATHER_BANDS: [(f32, WeatherCategory); 4] = [
    (-0.6, WeatherCategory::Storm),
    (-0.2, WeatherCategory::Rain),
    (0.2, WeatherCategory::Fog),
    (0.6, WeatherCategory::Aurora),
];

/// Category for x at or above the last weather bound
pub const WEATHER_TOP: WeatherCategory = WeatherCategory::Sun;

/// Upper bounds (exclusive) of the first four y bands, most void first
pub const MOOD_BANDS: [(f32, MoodCategory); 4] = [
    (-0.6, MoodCategory::Void),
    (-0.2, MoodCategory::Broken),
    (0.2, MoodCategory::Quiet),
    (0.6, MoodCategory::Joy),
];

/// Category for y at or above the last mood bound
pub const MOOD_TOP: MoodCategory = MoodCategory::Manic;

fn band<T: Copy>(value: f32, bands: &[(f32, T)], top: T) -> T {
    bands
        .iter()
        .find(|(upper, _)| value < *upper)
        .map(|&(_, category)| category)
        .unwrap_or(top)
}

/// Map the x coordinate to a weather category
pub fn weather_for(x: f32) -> WeatherCategory {
    band(x, &WEATHER_BANDS, WEATHER_TOP)
}

/// Map the y coordinate to a mood category
pub fn mood_for(y: f32) -> MoodCategory {
    band(y, &MOOD_BANDS, MOOD_TOP)
}

/// Map a point on the tuning plane to its (weather, mood) pair
///
/// Callers are expected to clamp to [-1, 1] first; values outside the
/// range fall into the outermost band.
pub fn map_coordinates(x: f32, y: f32) -> (WeatherCategory, MoodCategory) {
    (weather_for(x), mood_for(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_thresholds() {
        assert_eq!(weather_for(-1.0), WeatherCategory::Storm);
        assert_eq!(weather_for(-0.61), WeatherCategory::Storm);
        assert_eq!(weather_for(-0.6), WeatherCategory::Rain);
        assert_eq!(weather_for(-0.21), WeatherCategory::Rain);
        assert_eq!(weather_for(-0.2), WeatherCategory::Fog);
        assert_eq!(weather_for(0.0), WeatherCategory::Fog);
        assert_eq!(weather_for(0.2), WeatherCategory::Aurora);
        assert_eq!(weather_for(0.59), WeatherCategory::Aurora);
        assert_eq!(weather_for(0.6), WeatherCategory::Sun);
        assert_eq!(weather_for(1.0), WeatherCategory::Sun);
    }

    #[test]
    fn test_mood_thresholds() {
        assert_eq!(mood_for(-1.0), MoodCategory::Void);
        assert_eq!(mood_for(-0.6), MoodCategory::Broken);
        assert_eq!(mood_for(-0.2), MoodCategory::Quiet);
        assert_eq!(mood_for(0.19), MoodCategory::Quiet);
        assert_eq!(mood_for(0.2), MoodCategory::Joy);
        assert_eq!(mood_for(0.6), MoodCategory::Manic);
        assert_eq!(mood_for(1.0), MoodCategory::Manic);
    }

    #[test]
    fn test_mapping_is_total_deterministic_and_monotonic() {
        let mut prev_weather = 0;
        let mut prev_mood = 0;
        for i in 0..=400 {
            let v = -1.0 + i as f32 * 0.005;
            let (w, m) = map_coordinates(v, v);
            assert_eq!((w, m), map_coordinates(v, v));
            assert!(w.rank() >= prev_weather, "weather went backwards at {}", v);
            assert!(m.rank() >= prev_mood, "mood went backwards at {}", v);
            prev_weather = w.rank();
            prev_mood = m.rank();
        }
        assert_eq!(prev_weather, 4);
        assert_eq!(prev_mood, 4);
    }

    #[test]
    fn test_keys_round_trip_through_serde_names() {
        for w in WeatherCategory::ALL {
            let encoded = toml::Value::try_from(w).unwrap();
            assert_eq!(encoded.as_str(), Some(w.key()));
        }
        for m in MoodCategory::ALL {
            let encoded = toml::Value::try_from(m).unwrap();
            assert_eq!(encoded.as_str(), Some(m.key()));
        }
    }
}
