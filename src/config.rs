use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// Product categories the catalog draws from.
pub const CATEGORIES: [&str; 8] = [
    "Electronics",
    "Clothing",
    "Food",
    "Furniture",
    "Books",
    "Toys",
    "Sports",
    "Tools",
];

/// Zone labels are single letters, which caps the location count.
pub const MAX_LOCATIONS: usize = 26;

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, what: &str) -> Result<(), SynthError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SynthError::config(format!("{what} bounds must be finite")));
        }
        if self.min > self.max {
            return Err(SynthError::config(format!(
                "{what} min ({}) exceeds max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Inclusive hour-of-day window in which reads happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub num_products: usize,
    pub num_locations: usize,
    pub num_readers: u32,
    pub days: u32,
    pub business_hours: HourWindow,
    pub success_probability: f64,
    pub read_frequencies: Vec<u32>,
    pub price_range: ValueRange,
    /// Signal range for successful reads. Inclusive on both ends.
    pub strong_signal: ValueRange,
    /// Signal range for failed reads. `max` is exclusive and must not exceed
    /// `strong_signal.min`.
    pub weak_signal: ValueRange,
    pub temperature: ValueRange,
    pub humidity: ValueRange,
    /// RNG seed. `None` draws a fresh one per run.
    pub seed: Option<u64>,
    /// Last day of the catalog window; the simulation covers the `days`
    /// days before it. `None` means today.
    pub reference_date: Option<NaiveDate>,
    pub output_dir: PathBuf,
    /// Read events handed to the sink per write.
    pub event_batch_size: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            num_products: 1000,
            num_locations: 5,
            num_readers: 20,
            days: 7,
            business_hours: HourWindow { start: 6, end: 22 },
            success_probability: 0.85,
            read_frequencies: vec![1, 2, 3, 5, 10],
            price_range: ValueRange::new(10.0, 500.0),
            strong_signal: ValueRange::new(-85.0, -30.0),
            weak_signal: ValueRange::new(-100.0, -85.0),
            temperature: ValueRange::new(18.0, 25.0),
            humidity: ValueRange::new(30.0, 70.0),
            seed: None,
            reference_date: None,
            output_dir: PathBuf::from("data"),
            event_batch_size: 50_000,
        }
    }
}

impl SynthConfig {
    /// Load a TOML file. Missing fields keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, SynthError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SynthError> {
        Ok(toml::from_str(text)?)
    }

    /// Reject nonsensical parameters before any generation work starts.
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.num_products == 0 {
            return Err(SynthError::config("num_products must be positive"));
        }
        if self.num_locations == 0 || self.num_locations > MAX_LOCATIONS {
            return Err(SynthError::config(format!(
                "num_locations must be between 1 and {MAX_LOCATIONS}, got {}",
                self.num_locations
            )));
        }
        if self.num_readers == 0 {
            return Err(SynthError::config("num_readers must be positive"));
        }
        if self.days == 0 {
            return Err(SynthError::config("days must be positive"));
        }
        let hours = self.business_hours;
        if hours.start > hours.end || hours.end > 23 {
            return Err(SynthError::config(format!(
                "business_hours must satisfy start <= end <= 23, got {}..={}",
                hours.start, hours.end
            )));
        }
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(SynthError::config(format!(
                "success_probability must lie in [0, 1], got {}",
                self.success_probability
            )));
        }
        if self.read_frequencies.is_empty() {
            return Err(SynthError::config("read_frequencies must not be empty"));
        }
        self.price_range.check("price_range")?;
        if self.price_range.min < 0.0 {
            return Err(SynthError::config("price_range min must not be negative"));
        }
        self.strong_signal.check("strong_signal")?;
        self.weak_signal.check("weak_signal")?;
        if self.weak_signal.min >= self.weak_signal.max {
            return Err(SynthError::config("weak_signal range must not be empty"));
        }
        if self.weak_signal.max > self.strong_signal.min {
            return Err(SynthError::config(format!(
                "weak_signal max ({}) overlaps strong_signal min ({})",
                self.weak_signal.max, self.strong_signal.min
            )));
        }
        self.temperature.check("temperature")?;
        self.humidity.check("humidity")?;
        if self.event_batch_size == 0 {
            return Err(SynthError::config("event_batch_size must be positive"));
        }
        Ok(())
    }

    /// Zone labels `Zone_A`, `Zone_B`, ... one per configured location.
    pub fn location_labels(&self) -> Vec<String> {
        (b'A'..=b'Z')
            .take(self.num_locations)
            .map(|letter| format!("Zone_{}", letter as char))
            .collect()
    }

    /// Reader ids `READER_01` .. `READER_NN`.
    pub fn reader_label(index: u32) -> String {
        format!("READER_{index:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_config_error(config: SynthConfig) {
        match config.validate() {
            Err(SynthError::Config(_)) => {}
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        SynthConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_counts() {
        assert_config_error(SynthConfig {
            num_products: 0,
            ..Default::default()
        });
        assert_config_error(SynthConfig {
            num_readers: 0,
            ..Default::default()
        });
        assert_config_error(SynthConfig {
            days: 0,
            ..Default::default()
        });
        assert_config_error(SynthConfig {
            num_locations: 0,
            ..Default::default()
        });
    }

    #[test]
    fn rejects_empty_frequency_set() {
        assert_config_error(SynthConfig {
            read_frequencies: vec![],
            ..Default::default()
        });
    }

    #[test]
    fn rejects_overlapping_signal_ranges() {
        assert_config_error(SynthConfig {
            strong_signal: ValueRange::new(-90.0, -30.0),
            weak_signal: ValueRange::new(-100.0, -85.0),
            ..Default::default()
        });
    }

    #[test]
    fn rejects_bad_probability_and_hours() {
        assert_config_error(SynthConfig {
            success_probability: 1.5,
            ..Default::default()
        });
        assert_config_error(SynthConfig {
            success_probability: f64::NAN,
            ..Default::default()
        });
        assert_config_error(SynthConfig {
            business_hours: HourWindow { start: 22, end: 6 },
            ..Default::default()
        });
        assert_config_error(SynthConfig {
            business_hours: HourWindow { start: 6, end: 24 },
            ..Default::default()
        });
    }

    #[test]
    fn location_labels_follow_zone_letters() {
        let config = SynthConfig {
            num_locations: 3,
            ..Default::default()
        };
        assert_eq!(config.location_labels(), vec!["Zone_A", "Zone_B", "Zone_C"]);
        assert_eq!(SynthConfig::reader_label(7), "READER_07");
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let config = SynthConfig::from_toml_str(
            r#"
            num_products = 10
            seed = 42
            read_frequencies = [1]

            [business_hours]
            start = 8
            end = 17
            "#,
        )
        .unwrap();
        assert_eq!(config.num_products, 10);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.read_frequencies, vec![1]);
        assert_eq!(config.business_hours, HourWindow { start: 8, end: 17 });
        assert_eq!(config.days, 7);
        assert_eq!(config.num_readers, 20);
    }

    #[test]
    fn malformed_toml_is_a_config_file_error() {
        let err = SynthConfig::from_toml_str("num_products = \"many\"").unwrap_err();
        assert!(matches!(err, SynthError::ConfigFile(_)));
    }
}
