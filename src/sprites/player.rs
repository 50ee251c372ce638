//! The player-controlled entity: flap physics and the alive/dead state machine.

use super::assets::{AssetCache, SpriteId};
use super::entity::Entity;
use crate::core::geometry::{FlapTuning, Rect, Viewport};
use crate::core::{POINTS_TO_COOL, POINTS_TO_SIR};
use serde::{Deserialize, Serialize};

/// Frame period used by every form once dead.
const DEAD_FRAME_PERIOD: u32 = 3;

/// Which character the player currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerForm {
    Cow,
    /// Reward form, reached by collecting a toast.
    NyanCat,
}

impl PlayerForm {
    pub fn sprite_id(&self) -> SpriteId {
        match self {
            Self::Cow => SpriteId::Cow,
            Self::NyanCat => SpriteId::NyanCat,
        }
    }

    pub fn frame_period(&self) -> u32 {
        match self {
            Self::Cow => 3,
            Self::NyanCat => 1,
        }
    }

    pub fn dead_row(&self) -> u32 {
        match self {
            Self::Cow => 3,
            Self::NyanCat => 1,
        }
    }
}

/// Decorative overlays the cow can wear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessory {
    Scumbag,
    Sir,
    Sunglasses,
    Mask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    AliveAscending,
    AliveFalling,
    DeadFalling,
}

/// The flapping player.
///
/// Horizontal position is pinned to `viewport.width / 6`; only the vertical
/// axis is simulated. An optional overlay entity (accessory for the cow,
/// rainbow trail for the nyan cat) is moved to follow the body every step.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Entity,
    form: PlayerForm,
    tuning: FlapTuning,
    viewport: Viewport,
    accessory: Option<Accessory>,
    overlay: Option<Entity>,
}

impl Player {
    pub fn new(form: PlayerForm, viewport: Viewport, assets: &dyn AssetCache) -> Self {
        let body = Entity::new(assets.sprite(form.sprite_id()), form.frame_period())
            .at(viewport.player_x(), viewport.height / 2.0);
        let overlay = match form {
            PlayerForm::Cow => None,
            PlayerForm::NyanCat => Some(Entity::new(assets.sprite(SpriteId::Rainbow), 1)),
        };
        let mut player = Self {
            body,
            form,
            tuning: viewport.flap_tuning(),
            viewport,
            accessory: None,
            overlay,
        };
        player.sync_overlay();
        player
    }

    /// A fresh player of `form` that inherits this one's position and velocity.
    pub fn transformed(&self, form: PlayerForm, assets: &dyn AssetCache) -> Self {
        let mut next = Self::new(form, self.viewport, assets);
        next.body.pos = self.body.pos;
        next.body.vel = self.body.vel;
        next.sync_overlay();
        next
    }

    /// Flap. Returns false (and changes nothing) when dead.
    pub fn on_tap(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.body.vel.y = self.tuning.tap_speed;
        self.body.pos.y += self.tuning.tap_bump;
        true
    }

    /// One tick of animation and physics.
    ///
    /// Rising speed decays geometrically toward zero while falling speed
    /// grows linearly, which gives the flap-and-glide feel.
    pub fn step(&mut self) {
        self.body.advance_frame();
        self.body.pos.x = self.viewport.player_x();

        let t = self.tuning;
        let mut speed = self.body.vel.y;
        if speed < 0.0 {
            speed = speed * 2.0 / 3.0 + t.gravity / 2.0;
        } else {
            speed += t.gravity;
        }
        self.body.vel.y = speed.clamp(t.tap_speed, t.max_speed);
        self.body.integrate();

        if !self.is_dead() {
            self.body.anim.row = match self.form {
                PlayerForm::Cow => speed_bucket(self.body.vel.y, &t),
                PlayerForm::NyanCat => 0,
            };
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.advance_frame();
        }
        self.sync_overlay();
    }

    /// Enter the dead-fall. Idempotent.
    pub fn dead(&mut self) {
        if self.is_dead() {
            return;
        }
        self.body.alive = false;
        self.body.vel.y = self.tuning.max_speed / 2.0;
        self.body.anim.row = self.form.dead_row();
        self.body.anim.set_frame_period(DEAD_FRAME_PERIOD);
    }

    pub fn revive(&mut self, assets: &dyn AssetCache) {
        self.body.alive = true;
        self.body.vel.y = 0.0;
        self.body.anim.row = 0;
        self.body.anim.set_frame_period(self.form.frame_period());
        self.set_accessory(Accessory::Scumbag, assets);
    }

    /// Put the player back at the start position.
    pub fn reset_position(&mut self) {
        self.body.pos.x = self.viewport.player_x();
        self.body.pos.y = self.viewport.height / 2.0 - self.body.size.width / 2.0;
        self.sync_overlay();
    }

    /// Point milestones dress the cow up.
    pub fn upgrade_accessory(&mut self, points: u32, assets: &dyn AssetCache) {
        if points == POINTS_TO_SIR {
            self.set_accessory(Accessory::Sir, assets);
        } else if points == POINTS_TO_COOL {
            self.set_accessory(Accessory::Sunglasses, assets);
        }
    }

    pub fn wear_mask(&mut self, assets: &dyn AssetCache) {
        self.set_accessory(Accessory::Mask, assets);
    }

    // Only the cow has somewhere to put an accessory.
    fn set_accessory(&mut self, accessory: Accessory, assets: &dyn AssetCache) {
        if self.form != PlayerForm::Cow {
            return;
        }
        self.accessory = Some(accessory);
        self.overlay = Some(Entity::new(
            assets.sprite(SpriteId::Accessory(accessory)),
            1,
        ));
        self.sync_overlay();
    }

    fn sync_overlay(&mut self) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        match self.form {
            PlayerForm::Cow => overlay.pos = self.body.pos,
            PlayerForm::NyanCat => {
                overlay.pos.x = self.body.pos.x - overlay.size.width;
                overlay.pos.y = self.body.pos.y;
                overlay.anim.row = speed_bucket(self.body.vel.y, &self.tuning);
            }
        }
    }

    pub fn state(&self) -> PlayerState {
        if self.is_dead() {
            PlayerState::DeadFalling
        } else if self.body.vel.y < 0.0 {
            PlayerState::AliveAscending
        } else {
            PlayerState::AliveFalling
        }
    }

    /// Liveness is the body's `alive` flag.
    pub fn is_dead(&self) -> bool {
        !self.body.alive
    }

    pub fn form(&self) -> PlayerForm {
        self.form
    }

    pub fn accessory(&self) -> Option<Accessory> {
        self.accessory
    }

    pub fn tuning(&self) -> FlapTuning {
        self.tuning
    }

    pub fn speed_y(&self) -> f64 {
        self.body.vel.y
    }

    /// The overlay to draw, if any. A dead cow loses its accessory.
    pub fn visible_overlay(&self) -> Option<&Entity> {
        match self.form {
            PlayerForm::Cow if self.is_dead() => None,
            _ => self.overlay.as_ref(),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        self.body.bounding_box()
    }

    pub fn is_touching_ground(&self) -> bool {
        self.body.bounding_box().bottom() > self.viewport.ground_y()
    }

    pub fn is_touching_sky(&self) -> bool {
        self.body.pos.y < 0.0
    }

    pub fn is_touching_edge(&self) -> bool {
        self.is_touching_ground() || self.is_touching_sky()
    }
}

/// Animation row for a vertical speed: 0 gliding, 1 falling, 2 rising.
fn speed_bucket(speed_y: f64, tuning: &FlapTuning) -> u32 {
    if speed_y > tuning.tap_speed / 3.0 && speed_y < tuning.max_speed / 3.0 {
        0
    } else if speed_y > 0.0 {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::assets::ScaledSprites;

    fn cow() -> (Player, ScaledSprites) {
        let vp = Viewport::new(720.0, 1280.0);
        let assets = ScaledSprites::new(vp);
        (Player::new(PlayerForm::Cow, vp, &assets), assets)
    }

    #[test]
    fn test_new_player_defaults() {
        let (player, _) = cow();
        assert_eq!(player.state(), PlayerState::AliveFalling);
        assert!((player.body.pos.x - 120.0).abs() < 1e-9);
        assert!((player.body.pos.y - 640.0).abs() < 1e-9);
        assert!(player.accessory().is_none());
        assert!(player.visible_overlay().is_none());
    }

    #[test]
    fn test_tap_sets_speed_and_bumps_up() {
        let (mut player, _) = cow();
        let y = player.body.pos.y;
        assert!(player.on_tap());
        assert!((player.speed_y() - (-80.0)).abs() < 1e-9);
        assert!((player.body.pos.y - (y - 12.8)).abs() < 1e-9);
        assert_eq!(player.state(), PlayerState::AliveAscending);
    }

    #[test]
    fn test_ascending_speed_decays() {
        let (mut player, _) = cow();
        player.on_tap();
        player.step();
        // -80 * 2/3 + 4/2
        let expected = -80.0 * 2.0 / 3.0 + 2.0;
        assert!((player.speed_y() - expected).abs() < 1e-9);
        assert!(player.speed_y().abs() < 80.0);
    }

    #[test]
    fn test_falling_speed_grows_then_clamps() {
        let (mut player, _) = cow();
        player.step();
        assert!((player.speed_y() - 4.0).abs() < 1e-9);
        for _ in 0..20 {
            player.step();
        }
        assert!((player.speed_y() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_stays_in_bounds() {
        let (mut player, _) = cow();
        let t = player.tuning();
        for tick in 0..500u32 {
            if tick % 7 == 0 || tick % 11 == 3 {
                player.on_tap();
            }
            player.step();
            assert!(player.speed_y() >= t.tap_speed && player.speed_y() <= t.max_speed);
            // keep the player on screen so the run is long
            player.body.pos.y = 640.0;
        }
    }

    #[test]
    fn test_x_is_pinned() {
        let (mut player, _) = cow();
        player.body.pos.x = 0.0;
        player.step();
        assert!((player.body.pos.x - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_dead_ignores_taps() {
        let (mut player, _) = cow();
        player.dead();
        assert_eq!(player.state(), PlayerState::DeadFalling);
        assert!((player.speed_y() - 12.5).abs() < 1e-9);
        let y = player.body.pos.y;
        assert!(!player.on_tap());
        assert!((player.speed_y() - 12.5).abs() < 1e-9);
        assert!((player.body.pos.y - y).abs() < 1e-9);
        assert_eq!(player.body.anim.row, 3);
    }

    #[test]
    fn test_dead_is_idempotent() {
        let (mut player, _) = cow();
        player.dead();
        player.step();
        let speed = player.speed_y();
        player.dead();
        assert!((player.speed_y() - speed).abs() < 1e-9);
    }

    #[test]
    fn test_dead_fall_reaches_ground() {
        let (mut player, _) = cow();
        player.dead();
        let mut steps = 0;
        while !player.is_touching_ground() {
            let y = player.body.pos.y;
            player.step();
            assert!(player.body.pos.y > y);
            assert_eq!(player.body.anim.row, 3);
            steps += 1;
            assert!(steps < 1000);
        }
    }

    #[test]
    fn test_revive_resets_state() {
        let (mut player, assets) = cow();
        player.dead();
        player.revive(&assets);
        assert_eq!(player.state(), PlayerState::AliveFalling);
        assert_eq!(player.body.anim.row, 0);
        assert_eq!(player.accessory(), Some(Accessory::Scumbag));
    }

    #[test]
    fn test_body_alive_tracks_death() {
        let (mut player, assets) = cow();
        assert!(player.body.alive);
        player.dead();
        assert!(!player.body.alive);
        assert!(player.is_dead());
        player.revive(&assets);
        assert!(player.body.alive);
        assert!(!player.is_dead());
    }

    #[test]
    fn test_reset_position() {
        let (mut player, _) = cow();
        player.body.pos.y = 5.0;
        player.reset_position();
        let expected = 640.0 - player.body.size.width / 2.0;
        assert!((player.body.pos.y - expected).abs() < 1e-9);
    }

    #[test]
    fn test_accessory_milestones() {
        let (mut player, assets) = cow();
        player.upgrade_accessory(22, &assets);
        assert!(player.accessory().is_none());
        player.upgrade_accessory(23, &assets);
        assert_eq!(player.accessory(), Some(Accessory::Sir));
        player.upgrade_accessory(35, &assets);
        assert_eq!(player.accessory(), Some(Accessory::Sunglasses));
        player.wear_mask(&assets);
        assert_eq!(player.accessory(), Some(Accessory::Mask));
    }

    #[test]
    fn test_accessory_follows_and_hides_when_dead() {
        let (mut player, assets) = cow();
        player.wear_mask(&assets);
        player.on_tap();
        player.step();
        let overlay = player.visible_overlay().expect("mask visible");
        assert_eq!(overlay.pos, player.body.pos);
        player.dead();
        assert!(player.visible_overlay().is_none());
    }

    #[test]
    fn test_rows_follow_speed_buckets() {
        let (mut player, _) = cow();
        player.on_tap();
        player.step(); // about -51: rising
        assert_eq!(player.body.anim.row, 2);
        player.body.vel.y = 0.0;
        player.step(); // 4: gliding
        assert_eq!(player.body.anim.row, 0);
        player.body.vel.y = 20.0;
        player.step(); // 24: falling
        assert_eq!(player.body.anim.row, 1);
    }

    #[test]
    fn test_transform_inherits_motion() {
        let (mut player, assets) = cow();
        player.on_tap();
        player.step();
        let cat = player.transformed(PlayerForm::NyanCat, &assets);
        assert_eq!(cat.form(), PlayerForm::NyanCat);
        assert_eq!(cat.body.pos, player.body.pos);
        assert_eq!(cat.body.vel, player.body.vel);
        let rainbow = cat.visible_overlay().expect("rainbow trail");
        assert!((rainbow.pos.x - (cat.body.pos.x - rainbow.size.width)).abs() < 1e-9);
    }

    #[test]
    fn test_nyan_cat_ignores_accessories() {
        let vp = Viewport::default();
        let assets = ScaledSprites::new(vp);
        let mut cat = Player::new(PlayerForm::NyanCat, vp, &assets);
        cat.wear_mask(&assets);
        cat.upgrade_accessory(23, &assets);
        assert!(cat.accessory().is_none());
        assert_eq!(
            cat.visible_overlay().map(|o| o.sprite.id),
            Some(SpriteId::Rainbow)
        );
    }

    #[test]
    fn test_edges() {
        let (mut player, _) = cow();
        assert!(!player.is_touching_edge());
        player.body.pos.y = -1.0;
        assert!(player.is_touching_sky());
        player.body.pos.y = 1280.0;
        assert!(player.is_touching_ground());
    }
}
