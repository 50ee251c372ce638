//! Services the session talks to but does not own: score keeping, audio,
//! achievements, and the game-over notification.
//!
//! All traits are `Send` so a session can be handed to the tick thread.
//! The small implementations here are enough for the terminal game, the
//! simulator, and tests.

use crate::sprites::PlayerForm;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

/// Points and coins.
pub trait ScoreBoard: Send {
    fn points(&self) -> u32;
    fn coins(&self) -> u32;
    fn add_point(&mut self);
    fn add_coin(&mut self);
    /// Never goes below zero.
    fn remove_coin(&mut self);
}

/// Sound effects the session asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Tap,
    Pass,
    Collect,
    Affliction,
    FormChange,
    Collision,
}

/// Fire-and-forget playback.
pub trait AudioCue: Send {
    fn play(&mut self, cue: Cue);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    /// Collected a toast and became the nyan cat.
    Toastification,
}

/// One-shot unlocks. Unlocking twice is harmless.
pub trait AchievementFlags: Send {
    fn unlock(&mut self, achievement: Achievement);
}

/// What a finished life looked like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub score: u32,
    pub coins: u32,
    pub revives: u32,
    pub ticks: u64,
    pub form: PlayerForm,
}

/// Told once the dead player reaches the ground.
pub trait GameOverHandler: Send {
    fn game_over(&mut self, summary: &GameSummary);
}

/// In-memory scoreboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub points: u32,
    pub coins: u32,
}

impl ScoreBoard for Counters {
    fn points(&self) -> u32 {
        self.points
    }

    fn coins(&self) -> u32 {
        self.coins
    }

    fn add_point(&mut self) {
        self.points = self.points.saturating_add(1);
    }

    fn add_coin(&mut self) {
        self.coins = self.coins.saturating_add(1);
    }

    fn remove_coin(&mut self) {
        self.coins = self.coins.saturating_sub(1);
    }
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Muted;

impl AudioCue for Muted {
    fn play(&mut self, _cue: Cue) {}
}

/// Remembers what has been unlocked.
#[derive(Debug, Clone, Default)]
pub struct AchievementLog {
    unlocked: HashSet<Achievement>,
}

impl AchievementLog {
    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }
}

impl AchievementFlags for AchievementLog {
    fn unlock(&mut self, achievement: Achievement) {
        if self.unlocked.insert(achievement) {
            tracing::info!(?achievement, "achievement unlocked");
        }
    }
}

/// Ignores the game-over notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGameOver;

impl GameOverHandler for NoGameOver {
    fn game_over(&mut self, _summary: &GameSummary) {}
}

// Shared handles let a caller keep a view of what the session reported.

impl AudioCue for Arc<Mutex<Vec<Cue>>> {
    fn play(&mut self, cue: Cue) {
        self.lock().unwrap_or_else(PoisonError::into_inner).push(cue);
    }
}

impl AchievementFlags for Arc<Mutex<AchievementLog>> {
    fn unlock(&mut self, achievement: Achievement) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unlock(achievement);
    }
}

impl GameOverHandler for Arc<Mutex<Vec<GameSummary>>> {
    fn game_over(&mut self, summary: &GameSummary) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary.clone());
    }
}

/// Forwards summaries to another thread. A closed channel is ignored.
impl GameOverHandler for Sender<GameSummary> {
    fn game_over(&mut self, summary: &GameSummary) {
        if self.send(summary.clone()).is_err() {
            tracing::debug!("game-over receiver dropped");
        }
    }
}
