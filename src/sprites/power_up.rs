//! Collectibles that drift through the playfield.

use super::assets::{AssetCache, SpriteId};
use super::entity::Entity;
use crate::core::geometry::Viewport;
use crate::core::POWER_UP_SPAWN_X_RATIO;
use serde::{Deserialize, Serialize};

/// The concrete collectibles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Benign: worth a coin.
    Coin,
    /// Hazardous: costs a coin and masks the cow.
    Virus,
    /// Reward: turns the player into the nyan cat.
    Toast,
}

/// What happens when the player touches a power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEffect {
    ScoreBoost,
    Affliction,
    FormChange,
}

impl PowerUpKind {
    pub fn effect(&self) -> CollisionEffect {
        match self {
            Self::Coin => CollisionEffect::ScoreBoost,
            Self::Virus => CollisionEffect::Affliction,
            Self::Toast => CollisionEffect::FormChange,
        }
    }

    pub fn sprite_id(&self) -> SpriteId {
        match self {
            Self::Coin => SpriteId::Coin,
            Self::Virus => SpriteId::Virus,
            Self::Toast => SpriteId::Toast,
        }
    }

    pub fn frame_period(&self) -> u32 {
        match self {
            Self::Coin | Self::Virus => 1,
            Self::Toast => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub body: Entity,
}

impl PowerUp {
    /// Drop a power-up in from just above the top edge, four fifths across.
    ///
    /// It scrolls left with the obstacles and falls at between half and one
    /// and a half times that speed, picked by `percent` in `[0, 100)`.
    pub fn spawn(
        kind: PowerUpKind,
        viewport: Viewport,
        assets: &dyn AssetCache,
        speed: f64,
        percent: f64,
    ) -> Self {
        let body = Entity::new(assets.sprite(kind.sprite_id()), kind.frame_period());
        let y = -body.size.height;
        let body = body
            .at(viewport.width * POWER_UP_SPAWN_X_RATIO, y)
            .with_velocity(-speed, speed * (percent / 100.0 + 0.5));
        Self { kind, body }
    }

    pub fn effect(&self) -> CollisionEffect {
        self.kind.effect()
    }

    pub fn step(&mut self) {
        self.body.step();
    }

    pub fn is_out_of_range(&self) -> bool {
        self.body.is_out_of_range()
    }
}
