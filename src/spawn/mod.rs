//! Entity creation and destruction rules, plus the randomness they draw on.

pub mod obstacles;
pub mod power_ups;
pub mod random;

pub use obstacles::ObstacleSpawner;
pub use power_ups::{PowerUpSpawner, SpawnGate, SpawnRule, SPAWN_RULES};
pub use random::{RandomSource, RngSource, ScriptedRandom};
