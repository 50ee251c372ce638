//! Terminal front end: a ratatui draw target and crossterm input mapping.

pub mod input;
pub mod terminal;

pub use input::{map_key, map_mouse, GameInput};
pub use terminal::{fits, play_area, render_frame, Banner, TerminalTarget, MIN_COLS, MIN_ROWS};
