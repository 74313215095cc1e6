//! Runtime settings loaded from environment variables.
//!
//! The binary calls `dotenvy::dotenv()` first, so values may also come from a
//! `.env` file. Every setting has a default; only malformed values are errors.

use crate::errors::{Error, Result};
use std::path::PathBuf;

/// Default store location: a fresh in-memory `SQLite` database per process.
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Settings that shape how the store is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `SeaORM` connection string (`DATABASE_URL`)
    pub database_url: String,
    /// Multiplier applied to every simulated delay (`WAYFARER_LATENCY_SCALE`); `0` disables them
    pub latency_scale: f64,
    /// Seed for the itinerary generator (`WAYFARER_SEED`); OS entropy when absent
    pub generator_seed: Option<u64>,
    /// Fixture file overriding the embedded fixtures (`WAYFARER_FIXTURES`)
    pub fixtures_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            latency_scale: 1.0,
            generator_seed: None,
            fixtures_path: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);

        let latency_scale = match lookup("WAYFARER_LATENCY_SCALE") {
            Some(raw) => {
                let scale: f64 = raw.trim().parse().map_err(|e| Error::Config {
                    message: format!("WAYFARER_LATENCY_SCALE must be a number, got {raw:?}: {e}"),
                })?;
                if !scale.is_finite() || scale < 0.0 {
                    return Err(Error::Config {
                        message: format!(
                            "WAYFARER_LATENCY_SCALE must be a non-negative number, got {raw:?}"
                        ),
                    });
                }
                scale
            }
            None => defaults.latency_scale,
        };

        let generator_seed = lookup("WAYFARER_SEED")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| Error::Config {
                    message: format!("WAYFARER_SEED must be an unsigned integer, got {raw:?}: {e}"),
                })
            })
            .transpose()?;

        let fixtures_path = lookup("WAYFARER_FIXTURES").map(PathBuf::from);

        Ok(Self {
            database_url,
            latency_scale,
            generator_seed,
            fixtures_path,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.latency_scale, 1.0);
    }

    #[test]
    fn test_reads_all_values() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://data/trips.sqlite?mode=rwc"),
            ("WAYFARER_LATENCY_SCALE", "0.5"),
            ("WAYFARER_SEED", "42"),
            ("WAYFARER_FIXTURES", "fixtures/demo.toml"),
        ]))
        .unwrap();

        assert_eq!(settings.database_url, "sqlite://data/trips.sqlite?mode=rwc");
        assert_eq!(settings.latency_scale, 0.5);
        assert_eq!(settings.generator_seed, Some(42));
        assert_eq!(
            settings.fixtures_path,
            Some(PathBuf::from("fixtures/demo.toml"))
        );
    }

    #[test]
    fn test_rejects_bad_latency_scale() {
        let result = Settings::from_lookup(lookup_from(&[("WAYFARER_LATENCY_SCALE", "fast")]));
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = Settings::from_lookup(lookup_from(&[("WAYFARER_LATENCY_SCALE", "-1")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_rejects_bad_seed() {
        let result = Settings::from_lookup(lookup_from(&[("WAYFARER_SEED", "-7")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
