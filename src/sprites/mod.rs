//! Everything that gets drawn: the entity record and the kinds built on it.

pub mod animation;
pub mod assets;
pub mod entity;
pub mod obstacle;
pub mod player;
pub mod power_up;
pub mod scenery;

pub use animation::Animation;
pub use assets::{AssetCache, ScaledSprites, SpriteHandle, SpriteId};
pub use entity::Entity;
pub use obstacle::Obstacle;
pub use player::{Accessory, Player, PlayerForm, PlayerState};
pub use power_up::{CollisionEffect, PowerUp, PowerUpKind};
pub use scenery::{Scenery, ScrollLayer};
