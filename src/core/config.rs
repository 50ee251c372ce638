//! Runtime configuration: defaults, an optional JSON file, then env overrides.

use super::constants::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, TICK_INTERVAL_MS};
use super::geometry::Viewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

pub const ENV_SEED: &str = "FLAPPYCOW_SEED";
pub const ENV_TICK_MS: &str = "FLAPPYCOW_TICK_MS";
pub const ENV_WIDTH: &str = "FLAPPYCOW_WIDTH";
pub const ENV_HEIGHT: &str = "FLAPPYCOW_HEIGHT";

/// Settings for one game process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical viewport width that all tuning scales from
    pub viewport_width: f64,
    /// Logical viewport height that all tuning scales from
    pub viewport_height: f64,
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,
    /// Random seed for reproducible sessions (None = entropy)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            tick_interval_ms: TICK_INTERVAL_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults, then `path` (if given), then environment overrides.
    pub fn load(path: Option<&Path>) -> io::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config.validated())
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Apply `FLAPPYCOW_*` overrides from any key/value lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = read_parsed::<u64, _>(&lookup, ENV_SEED) {
            self.seed = Some(seed);
        }
        if let Some(ms) = read_parsed(&lookup, ENV_TICK_MS) {
            self.tick_interval_ms = ms;
        }
        if let Some(width) = read_parsed(&lookup, ENV_WIDTH) {
            self.viewport_width = width;
        }
        if let Some(height) = read_parsed(&lookup, ENV_HEIGHT) {
            self.viewport_height = height;
        }
    }

    /// Replace unusable values with defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !self.viewport().is_valid() {
            tracing::warn!(
                "viewport {}x{} is not usable. Falling back to {}x{}.",
                self.viewport_width,
                self.viewport_height,
                defaults.viewport_width,
                defaults.viewport_height
            );
            self.viewport_width = defaults.viewport_width;
            self.viewport_height = defaults.viewport_height;
        }
        if self.tick_interval_ms == 0 {
            tracing::warn!(
                "tick_interval_ms must be positive. Falling back to {}.",
                defaults.tick_interval_ms
            );
            self.tick_interval_ms = defaults.tick_interval_ms;
        }
        self
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn read_parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}
