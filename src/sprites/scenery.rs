//! Parallax layers and the pause button. No collision semantics.

use super::assets::{AssetCache, SpriteHandle, SpriteId};
use crate::core::geometry::{Rect, Vec2, Viewport};

const BACKGROUND_SPEED_FACTOR: f64 = 1.0 / 2.0;
const FRONTGROUND_SPEED_FACTOR: f64 = 4.0 / 3.0;

/// A horizontally wrapping layer drawn twice, side by side.
#[derive(Debug, Clone)]
pub struct ScrollLayer {
    pub sprite: SpriteHandle,
    /// Horizontal offset in `(-width, 0]`.
    pub offset: f64,
    /// Top of the layer.
    pub y: f64,
    speed_factor: f64,
}

impl ScrollLayer {
    fn new(sprite: SpriteHandle, y: f64, speed_factor: f64) -> Self {
        Self {
            sprite,
            offset: 0.0,
            y,
            speed_factor,
        }
    }

    /// Scroll left relative to the obstacle speed.
    pub fn step(&mut self, obstacle_speed: f64) {
        let width = self.sprite.frame.width;
        if width <= 0.0 {
            return;
        }
        self.offset = (self.offset - obstacle_speed * self.speed_factor) % width;
        if self.offset > 0.0 {
            self.offset -= width;
        }
    }

    /// The two tiles that cover the viewport.
    pub fn tiles(&self) -> [Rect; 2] {
        let size = self.sprite.frame;
        [
            Rect::new(self.offset, self.y, size.width, size.height),
            Rect::new(self.offset + size.width, self.y, size.width, size.height),
        ]
    }
}

/// Background, foreground, and the pause button.
#[derive(Debug, Clone)]
pub struct Scenery {
    pub background: ScrollLayer,
    pub frontground: ScrollLayer,
    pub pause_button: SpriteHandle,
    pause_rect: Rect,
}

impl Scenery {
    pub fn new(viewport: Viewport, assets: &dyn AssetCache) -> Self {
        let background = assets.sprite(SpriteId::Background);
        let frontground = assets.sprite(SpriteId::Frontground);
        let pause_button = assets.sprite(SpriteId::PauseButton);
        let frontground_y = viewport.ground_y();
        Self {
            background: ScrollLayer::new(background, 0.0, BACKGROUND_SPEED_FACTOR),
            frontground: ScrollLayer::new(frontground, frontground_y, FRONTGROUND_SPEED_FACTOR),
            pause_button,
            // Top-right corner.
            pause_rect: Rect::new(
                viewport.width - pause_button.frame.width,
                0.0,
                pause_button.frame.width,
                pause_button.frame.height,
            ),
        }
    }

    pub fn step(&mut self, obstacle_speed: f64) {
        self.background.step(obstacle_speed);
        self.frontground.step(obstacle_speed);
    }

    pub fn pause_rect(&self) -> Rect {
        self.pause_rect
    }

    pub fn is_pause_button(&self, point: Vec2) -> bool {
        self.pause_rect.contains(point)
    }
}
