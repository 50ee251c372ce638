//! A spider hanging from above and a wood log rising from below, with a gap
//! between them the player must fly through.

use super::assets::{AssetCache, SpriteId};
use super::entity::Entity;
use crate::core::geometry::Viewport;
use crate::core::{GAP_DIVISOR, GAP_OFFSET_RANGE, GAP_TOP_MARGIN_DIVISOR, MIN_GAP_DIVISOR};

#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Upper body; its bottom edge is the top of the gap.
    pub spider: Entity,
    /// Lower body; its top edge is the bottom of the gap.
    pub log: Entity,
    passed: bool,
}

impl Obstacle {
    /// Create an obstacle at the right edge of the viewport.
    ///
    /// `speed` is the current scroll speed magnitude and `percent` a uniform
    /// draw in `[0, 100)` that places the gap. Faster obstacles get a
    /// narrower gap, down to `height / 5`.
    pub fn spawn(viewport: Viewport, assets: &dyn AssetCache, speed: f64, percent: f64) -> Self {
        let h = viewport.height;
        let gap = (h / GAP_DIVISOR - speed).max(h / MIN_GAP_DIVISOR);
        let offset = percent / 100.0 * h * GAP_OFFSET_RANGE;
        let gap_top = h / GAP_TOP_MARGIN_DIVISOR + offset;

        let spider = Entity::new(assets.sprite(SpriteId::Spider), 1);
        let spider_y = gap_top - spider.size.height;
        let spider = spider.at(viewport.width, spider_y).with_velocity(-speed, 0.0);
        let log = Entity::new(assets.sprite(SpriteId::WoodLog), 1)
            .at(viewport.width, gap_top + gap)
            .with_velocity(-speed, 0.0);

        Self {
            spider,
            log,
            passed: false,
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.spider.vel.x = -speed;
        self.log.vel.x = -speed;
    }

    pub fn step(&mut self) {
        self.spider.step();
        self.log.step();
    }

    /// Vertical extent of the gap as (top, bottom).
    pub fn gap(&self) -> (f64, f64) {
        (self.spider.bounding_box().bottom(), self.log.pos.y)
    }

    pub fn is_out_of_range(&self) -> bool {
        self.spider.is_out_of_range()
    }

    /// The trailing edge is behind `player_x`.
    pub fn is_behind(&self, player_x: f64) -> bool {
        self.spider.bounding_box().right() < player_x
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    /// Flag the obstacle as passed. Returns true only the first time.
    pub fn mark_passed(&mut self) -> bool {
        if self.passed {
            return false;
        }
        self.passed = true;
        true
    }

    pub fn collides_with(&self, player: &Entity, tolerance: f64) -> bool {
        self.spider.collides_with(player, tolerance) || self.log.collides_with(player, tolerance)
    }
}
