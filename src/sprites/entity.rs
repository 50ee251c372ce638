//! The single entity record shared by every on-screen object.

use super::animation::Animation;
use super::assets::SpriteHandle;
use crate::core::geometry::{Rect, Size, Vec2};

/// Position, size, velocity, and animation state of one sprite.
///
/// Kind-specific behavior (flap physics, collision effects, gap geometry)
/// lives in the wrapper types that own an `Entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub sprite: SpriteHandle,
    /// Top-left corner.
    pub pos: Vec2,
    pub size: Size,
    pub vel: Vec2,
    pub anim: Animation,
    pub alive: bool,
}

impl Entity {
    pub fn new(sprite: SpriteHandle, frame_period: u32) -> Self {
        Self {
            sprite,
            pos: Vec2::ZERO,
            size: sprite.frame,
            vel: Vec2::ZERO,
            anim: Animation::new(sprite.columns, frame_period),
            alive: true,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn with_velocity(mut self, x: f64, y: f64) -> Self {
        self.vel = Vec2::new(x, y);
        self
    }

    pub fn advance_frame(&mut self) {
        self.anim.advance();
    }

    /// `position += velocity`.
    pub fn integrate(&mut self) {
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
    }

    /// Animate, then integrate.
    pub fn step(&mut self) {
        self.advance_frame();
        self.integrate();
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_parts(self.pos, self.size)
    }

    /// The trailing (right) edge has scrolled past the left of the viewport.
    pub fn is_out_of_range(&self) -> bool {
        self.pos.x + self.size.width < 0.0
    }

    pub fn collides_with(&self, other: &Entity, tolerance: f64) -> bool {
        self.bounding_box()
            .overlaps_with_tolerance(&other.bounding_box(), tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::assets::SpriteId;

    fn handle(columns: u32) -> SpriteHandle {
        SpriteHandle {
            id: SpriteId::Coin,
            frame: Size::new(10.0, 10.0),
            columns,
            rows: 1,
        }
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut e = Entity::new(handle(1), 1).at(5.0, 5.0).with_velocity(-2.0, 3.0);
        e.step();
        assert_eq!(e.pos, Vec2::new(3.0, 8.0));
        e.step();
        assert_eq!(e.pos, Vec2::new(1.0, 11.0));
    }

    #[test]
    fn test_step_animates() {
        let mut e = Entity::new(handle(12), 1);
        e.step();
        assert_eq!(e.anim.col(), 1);
    }

    #[test]
    fn test_out_of_range_uses_trailing_edge() {
        let e = Entity::new(handle(1), 1).at(-9.0, 0.0);
        assert!(!e.is_out_of_range());
        let e = Entity::new(handle(1), 1).at(-10.5, 0.0);
        assert!(e.is_out_of_range());
    }

    #[test]
    fn test_bounding_box_follows_position() {
        let e = Entity::new(handle(1), 1).at(4.0, 6.0);
        let bb = e.bounding_box();
        assert_eq!(bb, Rect::new(4.0, 6.0, 10.0, 10.0));
    }

    #[test]
    fn test_collision_respects_tolerance() {
        let a = Entity::new(handle(1), 1).at(0.0, 0.0);
        let b = Entity::new(handle(1), 1).at(9.0, 0.0);
        assert!(a.collides_with(&b, 0.0));
        assert!(!a.collides_with(&b, 2.0));
    }
}
