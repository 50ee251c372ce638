//! Viewport-relative geometry: points, rectangles, and the tuning values
//! that scale with screen size.
//!
//! Every speed and distance in the game is derived from the viewport so the
//! feel is identical at any resolution. The comments on each formula give
//! the value at the 720x1280 reference viewport.

use super::constants::*;
use serde::{Deserialize, Serialize};

/// A 2D vector used for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of an entity, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(pos: Vec2, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Overlap test where each edge must penetrate the other box by more
    /// than `tolerance` before a hit counts. Grazing contacts are forgiven.
    pub fn overlaps_with_tolerance(&self, other: &Rect, tolerance: f64) -> bool {
        self.x + tolerance < other.right()
            && self.right() > other.x + tolerance
            && self.y + tolerance < other.bottom()
            && self.bottom() > other.y + tolerance
    }
}

/// Flap physics constants for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlapTuning {
    /// Vertical speed set by a tap (negative = upward).
    pub tap_speed: f64,
    /// Speed gained per tick while falling.
    pub gravity: f64,
    /// Terminal falling speed.
    pub max_speed: f64,
    /// Instant vertical position change applied on tap.
    pub tap_bump: f64,
}

/// The drawable area. All tuning derives from its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn flap_tuning(&self) -> FlapTuning {
        FlapTuning {
            tap_speed: -self.height / TAP_SPEED_DIVISOR,
            gravity: self.height / GRAVITY_DIVISOR,
            max_speed: self.height / MAX_SPEED_DIVISOR,
            tap_bump: -self.height / TAP_BUMP_DIVISOR,
        }
    }

    /// Fixed horizontal position of a living player.
    pub fn player_x(&self) -> f64 {
        self.width / PLAYER_X_DIVISOR
    }

    /// Y coordinate of the ground reference line.
    pub fn ground_y(&self) -> f64 {
        self.height - self.height * GROUND_HEIGHT_RATIO
    }

    pub fn collision_tolerance(&self) -> f64 {
        self.height / COLLISION_TOLERANCE_DIVISOR
    }

    pub fn score_text_size(&self) -> f64 {
        self.height / SCORE_TEXT_DIVISOR
    }

    /// Obstacle scroll speed for the given score (positive magnitude).
    ///
    /// 16 @ 720 wide, +1.2 for every 4 points, capped at double the base.
    pub fn obstacle_speed(&self, score: u32) -> f64 {
        let base = self.width / OBSTACLE_SPEED_DIVISOR;
        let steps = (score / OBSTACLE_SPEED_STEP_POINTS) as f64;
        let increase = self.width / OBSTACLE_SPEED_STEP_DIVISOR * steps;
        (base + increase).min(OBSTACLE_SPEED_CAP_FACTOR * base)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
