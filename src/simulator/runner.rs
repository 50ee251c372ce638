//! Plays headless sessions with the autopilot and collects per-run stats.
//!
//! Each run drives a real `GameSession` tick by tick, so the numbers come
//! from the same phase ordering and spawn rules as the terminal game.

use super::config::SimConfig;
use super::report::SimReport;
use crate::autopilot::should_tap;
use crate::session::{GameSession, Services, TickResult};
use crate::spawn::{RandomSource, RngSource};
use crate::sprites::{PlayerForm, PowerUpKind};
use serde::Serialize;

/// What one run ended with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub final_score: u32,
    pub coins: u32,
    pub revives: u32,
    pub total_ticks: u64,
    pub taps: u64,
    pub coins_collected: u32,
    pub viruses_collected: u32,
    pub toasts_collected: u32,
    pub became_nyan_cat: bool,
    pub timed_out: bool,
}

impl RunStats {
    fn record_tick(&mut self, result: &TickResult) {
        for kind in &result.collected {
            match kind {
                PowerUpKind::Coin => self.coins_collected += 1,
                PowerUpKind::Virus => self.viruses_collected += 1,
                PowerUpKind::Toast => self.toasts_collected += 1,
            }
        }
    }
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let seed = config.seed.map(|s| s.wrapping_add(run_idx as u64));
        let random = RngSource::from_seed_option(seed);
        let stats = simulate_single_run(config, Box::new(random));

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Score {}, Coins {}, Revives {}, Ticks {}{}",
                run_idx + 1,
                config.num_runs,
                stats.final_score,
                stats.coins,
                stats.revives,
                stats.total_ticks,
                if stats.timed_out { " (timed out)" } else { "" }
            );
        }
        tracing::debug!(run = run_idx, score = stats.final_score, "run finished");
        all_runs.push(stats);
    }

    SimReport::from_runs(all_runs)
}

/// Play one session until it ends for good or hits the tick limit.
pub fn simulate_single_run(config: &SimConfig, random: Box<dyn RandomSource>) -> RunStats {
    let services = Services::headless(config.viewport, random);
    let mut session = GameSession::new(config.viewport, services);
    let mut stats = RunStats::default();

    loop {
        if session.ticks() >= config.max_ticks_per_run {
            stats.timed_out = true;
            break;
        }
        if should_tap(&session) && session.tap() {
            stats.taps += 1;
        }
        let result = session.tick();
        if !result.ran {
            break;
        }
        stats.record_tick(&result);

        if result.game_over {
            session.run_dead_fall();
            if session.revive_count() >= config.revives_per_run {
                break;
            }
            session.revive();
            session.run_revive();
        }
    }

    stats.final_score = session.score();
    stats.coins = session.coins();
    stats.revives = session.revive_count();
    stats.total_ticks = session.ticks();
    stats.became_nyan_cat = session.player().form() == PlayerForm::NyanCat;
    stats
}
