//! Flappy Cow - Fixed-Tick Side-Scroller Library
//!
//! This module exposes the game engine for testing, the simulator, and the
//! terminal binary.

pub mod autopilot;
pub mod core;
pub mod logging;
pub mod session;
pub mod simulator;
pub mod spawn;
pub mod sprites;
pub mod ui;
