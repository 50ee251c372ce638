//! Opaque sprite identifiers and the asset cache seam.
//!
//! The simulation never owns bitmaps. Each entity asks the cache for a
//! [`SpriteHandle`] once, when it is created, and keeps the frame size and
//! sheet layout that comes back.

use super::player::Accessory;
use crate::core::geometry::{Size, Viewport};
use crate::core::GROUND_HEIGHT_RATIO;
use serde::{Deserialize, Serialize};

/// Every drawable sheet the game knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Cow,
    NyanCat,
    Rainbow,
    Accessory(Accessory),
    Spider,
    WoodLog,
    Coin,
    Virus,
    Toast,
    Background,
    Frontground,
    PauseButton,
    Tutorial,
}

impl SpriteId {
    /// Sheet layout as (columns, rows).
    pub fn sheet_layout(&self) -> (u32, u32) {
        match self {
            Self::Cow => (8, 4),
            Self::NyanCat => (3, 2),
            Self::Rainbow => (4, 3),
            Self::Coin => (12, 1),
            Self::Toast => (3, 1),
            _ => (1, 1),
        }
    }
}

/// What an entity keeps from the asset cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteHandle {
    pub id: SpriteId,
    /// Size of a single animation frame in viewport pixels.
    pub frame: Size,
    pub columns: u32,
    pub rows: u32,
}

/// Source of sprite handles. Implemented by whatever loads and scales art.
pub trait AssetCache: Send {
    fn sprite(&self, id: SpriteId) -> SpriteHandle;
}

/// Sizes every sheet as a fixed fraction of the viewport.
///
/// Used by the terminal front end and the headless simulator, where there
/// are no bitmaps to measure.
#[derive(Debug, Clone, Copy)]
pub struct ScaledSprites {
    viewport: Viewport,
}

impl ScaledSprites {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    fn frame_size(&self, id: SpriteId) -> Size {
        let w = self.viewport.width;
        let h = self.viewport.height;
        match id {
            SpriteId::Cow | SpriteId::Accessory(_) => Size::new(h / 11.0, h / 14.0),
            SpriteId::NyanCat => Size::new(h / 11.0, h / 16.0),
            SpriteId::Rainbow => Size::new(h / 9.0, h / 16.0),
            SpriteId::Spider | SpriteId::WoodLog => Size::new(w / 5.0, h),
            SpriteId::Coin => Size::new(h / 25.0, h / 25.0),
            SpriteId::Virus => Size::new(h / 22.0, h / 22.0),
            SpriteId::Toast => Size::new(h / 18.0, h / 20.0),
            SpriteId::Background | SpriteId::Tutorial => Size::new(w, h),
            SpriteId::Frontground => Size::new(w, h * GROUND_HEIGHT_RATIO),
            SpriteId::PauseButton => Size::new(h / 16.0, h / 16.0),
        }
    }
}

impl AssetCache for ScaledSprites {
    fn sprite(&self, id: SpriteId) -> SpriteHandle {
        let (columns, rows) = id.sheet_layout();
        SpriteHandle {
            id,
            frame: self.frame_size(id),
            columns,
            rows,
        }
    }
}
