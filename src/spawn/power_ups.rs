//! Power-up lifecycle and the reward rolls made after each pass.

use super::random::RandomSource;
use crate::core::geometry::Viewport;
use crate::core::{COIN_CHANCE_PERCENT, POINTS_TO_TOAST, TOAST_CHANCE_PERCENT, VIRUS_CHANCE_PERCENT};
use crate::sprites::{AssetCache, Entity, PlayerForm, PowerUp, PowerUpKind};

/// When a spawn rule is allowed to roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnGate {
    /// Score has reached the toast threshold and the player is not already
    /// the nyan cat. Guaranteed on the exact threshold score.
    Reward,
    /// No power-up is currently present.
    WhenEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRule {
    pub kind: PowerUpKind,
    pub chance_percent: f64,
    pub gate: SpawnGate,
}

/// Evaluated in order, each with its own draw.
///
/// The reward rule does not look at the current power-ups, so a toast can
/// join a coin that is still on screen. The later rules re-check emptiness
/// at their own step.
pub const SPAWN_RULES: [SpawnRule; 3] = [
    SpawnRule {
        kind: PowerUpKind::Toast,
        chance_percent: TOAST_CHANCE_PERCENT,
        gate: SpawnGate::Reward,
    },
    SpawnRule {
        kind: PowerUpKind::Coin,
        chance_percent: COIN_CHANCE_PERCENT,
        gate: SpawnGate::WhenEmpty,
    },
    SpawnRule {
        kind: PowerUpKind::Virus,
        chance_percent: VIRUS_CHANCE_PERCENT,
        gate: SpawnGate::WhenEmpty,
    },
];

/// Owns the live power-ups.
#[derive(Debug, Clone, Default)]
pub struct PowerUpSpawner {
    power_ups: Vec<PowerUp>,
}

impl PowerUpSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn len(&self) -> usize {
        self.power_ups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power_ups.is_empty()
    }

    pub fn clear(&mut self) {
        self.power_ups.clear();
    }

    /// Place a specific power-up. Consumes one draw for its fall speed.
    pub fn spawn(
        &mut self,
        kind: PowerUpKind,
        viewport: Viewport,
        assets: &dyn AssetCache,
        speed: f64,
        random: &mut dyn RandomSource,
    ) {
        let power_up = PowerUp::spawn(kind, viewport, assets, speed, random.percent());
        tracing::debug!(?kind, "power-up spawned");
        self.power_ups.push(power_up);
    }

    /// Run the reward rules for one pass. Returns the kinds spawned.
    ///
    /// A draw is only taken when a rule's gate is open, except that the
    /// exact-threshold toast needs no draw at all.
    pub fn offer_reward(
        &mut self,
        score: u32,
        form: PlayerForm,
        viewport: Viewport,
        assets: &dyn AssetCache,
        speed: f64,
        random: &mut dyn RandomSource,
    ) -> Vec<PowerUpKind> {
        let mut spawned = Vec::new();
        for rule in &SPAWN_RULES {
            let hit = match rule.gate {
                SpawnGate::Reward => {
                    if score < POINTS_TO_TOAST || form == PlayerForm::NyanCat {
                        false
                    } else if score == POINTS_TO_TOAST {
                        true
                    } else {
                        random.percent() < rule.chance_percent
                    }
                }
                SpawnGate::WhenEmpty => {
                    self.power_ups.is_empty() && random.percent() < rule.chance_percent
                }
            };
            if hit {
                self.spawn(rule.kind, viewport, assets, speed, random);
                spawned.push(rule.kind);
            }
        }
        spawned
    }

    pub fn remove_out_of_range(&mut self) -> usize {
        let before = self.power_ups.len();
        self.power_ups.retain(|p| !p.is_out_of_range());
        before - self.power_ups.len()
    }

    /// Remove and return every power-up touching the player, in order.
    pub fn take_collisions(&mut self, player: &Entity, tolerance: f64) -> Vec<PowerUpKind> {
        let mut hits = Vec::new();
        self.power_ups.retain(|p| {
            if p.body.collides_with(player, tolerance) {
                hits.push(p.kind);
                false
            } else {
                true
            }
        });
        hits
    }

    pub fn step_all(&mut self) {
        for power_up in &mut self.power_ups {
            power_up.step();
        }
    }
}
