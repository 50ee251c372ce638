//! The running game: orchestration, the services it calls out to, frame
//! output, and the threads that pace it.

pub mod collaborators;
pub mod driver;
pub mod game_session;
pub mod render;

pub use collaborators::{
    Achievement, AchievementFlags, AchievementLog, AudioCue, Counters, Cue, GameOverHandler,
    GameSummary, Muted, NoGameOver, ScoreBoard,
};
pub use driver::{
    blink_interval, dead_fall_interval, lock_session, share, spawn_dead_fall, spawn_revive,
    SharedSession, TickDriver,
};
pub use game_session::{GameSession, PauseFlag, Sequence, Services, TickResult, TouchAction};
pub use render::{present, DrawCommand, DrawTarget, NullTarget, RecordingTarget, SurfaceGate};
