//! Shared constants, configuration, and viewport geometry.

pub mod config;
pub mod constants;
pub mod geometry;

pub use config::GameConfig;
pub use constants::*;
pub use geometry::{FlapTuning, Rect, Size, Vec2, Viewport};
