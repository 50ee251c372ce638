//! Obstacle lifecycle: spawn when none exist, detect passes, clean up.

use super::random::RandomSource;
use crate::core::geometry::Viewport;
use crate::sprites::{AssetCache, Entity, Obstacle};

/// Owns the live obstacles. At most one exists after a spawn phase.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSpawner {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Mark every obstacle whose trailing edge is behind `player_x`.
    /// Returns how many were passed for the first time.
    pub fn check_passes(&mut self, player_x: f64) -> u32 {
        let mut passes = 0;
        for obstacle in &mut self.obstacles {
            if obstacle.is_behind(player_x) && obstacle.mark_passed() {
                passes += 1;
            }
        }
        passes
    }

    pub fn remove_out_of_range(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_out_of_range());
        before - self.obstacles.len()
    }

    pub fn any_collision(&self, player: &Entity, tolerance: f64) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.collides_with(player, tolerance))
    }

    /// Spawn a new obstacle if none exist. Consumes one draw when it does.
    pub fn spawn_if_empty(
        &mut self,
        viewport: Viewport,
        assets: &dyn AssetCache,
        speed: f64,
        random: &mut dyn RandomSource,
    ) -> bool {
        if !self.obstacles.is_empty() {
            return false;
        }
        let obstacle = Obstacle::spawn(viewport, assets, speed, random.percent());
        tracing::debug!(gap = ?obstacle.gap(), speed, "obstacle spawned");
        self.obstacles.push(obstacle);
        true
    }

    /// Refresh every obstacle's speed, then move it.
    pub fn step_all(&mut self, speed: f64) {
        for obstacle in &mut self.obstacles {
            obstacle.set_speed(speed);
            obstacle.step();
        }
    }
}
