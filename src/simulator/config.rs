//! Simulation configuration.

use crate::core::geometry::Viewport;

/// Configuration for a batch of autopilot runs.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random). Run `i` uses `seed + i`.
    pub seed: Option<u64>,

    /// Maximum ticks per run before it counts as timed out
    pub max_ticks_per_run: u64,

    /// How many times a run revives after landing before it ends
    pub revives_per_run: u32,

    /// Viewport every run is played at
    pub viewport: Viewport,

    /// Log verbosity (0 = silent, 1 = summary, 2 = one line per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            max_ticks_per_run: 100_000,
            revives_per_run: 0,
            viewport: Viewport::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Small batch for a fast look at the numbers
    pub fn quick() -> Self {
        Self {
            num_runs: 50,
            max_ticks_per_run: 20_000,
            ..Default::default()
        }
    }
}
