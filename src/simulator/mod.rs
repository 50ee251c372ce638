//! Monte Carlo runner for game tuning.
//!
//! Plays thousands of seeded sessions with the autopilot to see how far a
//! steady player gets and how often each power-up turns up. Every run goes
//! through `GameSession::tick`, so results match real gameplay behavior.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run, RunStats};
