//! The fixed-tick orchestrator.
//!
//! One call to [`GameSession::tick`] runs every phase of a simulation step
//! in a fixed order and then asks the draw target for a frame. The dead-fall
//! and revive sequences are stepped separately, one frame per call, so a
//! scheduler can run them at their own cadence.

use super::collaborators::{
    Achievement, AchievementFlags, AchievementLog, AudioCue, Counters, Cue, GameOverHandler,
    GameSummary, Muted, NoGameOver, ScoreBoard,
};
use super::render::{present, DrawCommand, DrawTarget, NullTarget};
use crate::core::geometry::{Rect, Vec2, Viewport};
use crate::core::REVIVE_BLINK_FRAMES;
use crate::spawn::{ObstacleSpawner, PowerUpSpawner, RandomSource};
use crate::sprites::{
    AssetCache, CollisionEffect, Entity, Obstacle, Player, PlayerForm, PowerUp, PowerUpKind,
    ScaledSprites, Scenery, SpriteId,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Paused state shared between input handling and the scheduler.
#[derive(Debug, Clone, Default)]
pub struct PauseFlag(Arc<AtomicBool>);

impl PauseFlag {
    pub fn new(paused: bool) -> Self {
        Self(Arc::new(AtomicBool::new(paused)))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A one-off sequence that replaces normal ticking while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    DeadFall,
    /// `frame` blink frames have been shown so far.
    Revive { frame: u8 },
}

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// False when the tick was skipped (paused, sequence running, or over).
    pub ran: bool,
    /// Obstacles passed for the first time this tick
    pub passes: u32,
    /// Power-ups collected this tick, in collision order
    pub collected: Vec<PowerUpKind>,
    pub obstacle_spawned: bool,
    pub power_ups_spawned: Vec<PowerUpKind>,
    /// The tick ended early in game over.
    pub game_over: bool,
    /// A frame reached the draw target.
    pub presented: bool,
}

/// What a touch was decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Ignored,
    DismissedTutorial,
    Resumed,
    Paused,
    Tapped,
}

/// Everything the session uses but does not own the logic of.
pub struct Services {
    pub score: Box<dyn ScoreBoard>,
    pub audio: Box<dyn AudioCue>,
    pub achievements: Box<dyn AchievementFlags>,
    pub game_over: Box<dyn GameOverHandler>,
    pub target: Box<dyn DrawTarget>,
    pub assets: Box<dyn AssetCache>,
    pub random: Box<dyn RandomSource>,
}

impl Services {
    /// In-memory counters, no audio, no drawing, viewport-scaled sprites.
    pub fn headless(viewport: Viewport, random: Box<dyn RandomSource>) -> Self {
        Self {
            score: Box::new(Counters::default()),
            audio: Box::new(Muted),
            achievements: Box::new(AchievementLog::default()),
            game_over: Box::new(NoGameOver),
            target: Box::new(NullTarget),
            assets: Box::new(ScaledSprites::new(viewport)),
            random,
        }
    }

    pub fn with_target(mut self, target: impl DrawTarget + 'static) -> Self {
        self.target = Box::new(target);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioCue + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_achievements(mut self, achievements: impl AchievementFlags + 'static) -> Self {
        self.achievements = Box::new(achievements);
        self
    }

    pub fn with_game_over(mut self, handler: impl GameOverHandler + 'static) -> Self {
        self.game_over = Box::new(handler);
        self
    }

    pub fn with_score(mut self, score: impl ScoreBoard + 'static) -> Self {
        self.score = Box::new(score);
        self
    }

    pub fn with_assets(mut self, assets: impl AssetCache + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }
}

pub struct GameSession {
    viewport: Viewport,
    player: Player,
    obstacles: ObstacleSpawner,
    power_ups: PowerUpSpawner,
    scenery: Scenery,
    paused: PauseFlag,
    sequence: Option<Sequence>,
    /// `game_over()` has run for the current life.
    dying: bool,
    /// The dead-fall finished and the handler was told.
    over: bool,
    tutorial: bool,
    player_visible: bool,
    revives: u32,
    ticks: u64,
    services: Services,
}

impl GameSession {
    pub fn new(viewport: Viewport, services: Services) -> Self {
        let player = Player::new(PlayerForm::Cow, viewport, services.assets.as_ref());
        let scenery = Scenery::new(viewport, services.assets.as_ref());
        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            "session started"
        );
        Self {
            viewport,
            player,
            obstacles: ObstacleSpawner::new(),
            power_ups: PowerUpSpawner::new(),
            scenery,
            paused: PauseFlag::new(false),
            sequence: None,
            dying: false,
            over: false,
            tutorial: false,
            player_visible: true,
            revives: 0,
            ticks: 0,
            services,
        }
    }

    /// Run one simulation step, then render.
    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult::default();
        if self.paused.is_set() || self.sequence.is_some() || self.over {
            return result;
        }
        result.ran = true;
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, "tick");

        // Pass check
        result.passes = self.obstacles.check_passes(self.player.body.pos.x);
        for _ in 0..result.passes {
            self.services.score.add_point();
            let points = self.services.score.points();
            self.player
                .upgrade_accessory(points, self.services.assets.as_ref());
            self.services.audio.play(Cue::Pass);
            tracing::debug!(score = points, "obstacle passed");
        }

        // Cleanup
        self.obstacles.remove_out_of_range();
        self.power_ups.remove_out_of_range();

        // Collisions. Power-ups resolve before the obstacle check, so a
        // toast grabbed on the fatal tick still transforms the player.
        let tolerance = self.viewport.collision_tolerance();
        result.collected = self.power_ups.take_collisions(&self.player.body, tolerance);
        for kind in result.collected.clone() {
            self.apply_effect(kind);
        }
        if self.obstacles.any_collision(&self.player.body, tolerance) {
            tracing::debug!(score = self.score(), "hit an obstacle");
            self.services.audio.play(Cue::Collision);
            self.game_over();
            result.game_over = true;
            return result;
        }
        if self.player.is_touching_edge() {
            tracing::debug!(y = self.player.body.pos.y, "left the playfield");
            self.game_over();
            result.game_over = true;
            return result;
        }

        // Spawning
        let score = self.score();
        let speed = self.viewport.obstacle_speed(score);
        result.obstacle_spawned = self.obstacles.spawn_if_empty(
            self.viewport,
            self.services.assets.as_ref(),
            speed,
            self.services.random.as_mut(),
        );
        for _ in 0..result.passes {
            let spawned = self.power_ups.offer_reward(
                score,
                self.player.form(),
                self.viewport,
                self.services.assets.as_ref(),
                speed,
                self.services.random.as_mut(),
            );
            result.power_ups_spawned.extend(spawned);
        }

        // Movement
        self.player.step();
        self.obstacles.step_all(speed);
        self.power_ups.step_all();
        self.scenery.step(speed);

        result.presented = self.render();
        result
    }

    fn apply_effect(&mut self, kind: PowerUpKind) {
        tracing::debug!(?kind, "power-up collected");
        let assets = self.services.assets.as_ref();
        match kind.effect() {
            CollisionEffect::ScoreBoost => {
                self.services.score.add_coin();
                self.services.audio.play(Cue::Collect);
            }
            CollisionEffect::Affliction => {
                self.services.score.remove_coin();
                self.player.wear_mask(assets);
                self.services.audio.play(Cue::Affliction);
            }
            CollisionEffect::FormChange => {
                self.services
                    .achievements
                    .unlock(Achievement::Toastification);
                self.player = self.player.transformed(PlayerForm::NyanCat, assets);
                self.services.audio.play(Cue::FormChange);
            }
        }
    }

    /// Flap, unless paused or dead.
    pub fn tap(&mut self) -> bool {
        if self.paused.is_set() || self.player.is_dead() {
            return false;
        }
        let flapped = self.player.on_tap();
        if flapped {
            self.services.audio.play(Cue::Tap);
        }
        flapped
    }

    /// Decode a touch at `point` in viewport coordinates.
    pub fn touch(&mut self, point: Vec2) -> TouchAction {
        if self.player.is_dead() || self.sequence.is_some() || self.dying || self.over {
            return TouchAction::Ignored;
        }
        if self.tutorial {
            self.tutorial = false;
            self.paused.clear();
            self.tap();
            return TouchAction::DismissedTutorial;
        }
        if self.paused.is_set() {
            self.resume();
            return TouchAction::Resumed;
        }
        if self.scenery.is_pause_button(point) {
            self.pause();
            return TouchAction::Paused;
        }
        self.tap();
        TouchAction::Tapped
    }

    pub fn pause(&mut self) {
        self.paused.set();
    }

    /// Returns whether ticking is now enabled. Resuming also drops the
    /// tutorial overlay.
    pub fn resume(&mut self) -> bool {
        if self.sequence.is_some() || self.dying || self.over {
            return false;
        }
        self.tutorial = false;
        self.paused.clear();
        true
    }

    /// Pause and render a frame with the tutorial over it. The next touch
    /// dismisses it.
    pub fn show_tutorial(&mut self) {
        self.tutorial = true;
        self.paused.set();
        self.render();
    }

    /// Begin the dead-fall. At most once per life.
    pub fn game_over(&mut self) {
        if self.dying {
            return;
        }
        self.dying = true;
        self.paused.set();
        self.player.dead();
        self.sequence = Some(Sequence::DeadFall);
        tracing::info!(score = self.score(), coins = self.coins(), "game over");
    }

    /// One dead-fall frame. Returns true while the player is still falling.
    pub fn step_dead_fall(&mut self) -> bool {
        if self.sequence != Some(Sequence::DeadFall) {
            return false;
        }
        if !self.player.is_touching_ground() {
            self.player.step();
            self.render();
        }
        if self.player.is_touching_ground() {
            self.finish_dead_fall();
            return false;
        }
        true
    }

    /// Run the dead-fall to completion without pacing.
    pub fn run_dead_fall(&mut self) {
        while self.step_dead_fall() {}
    }

    fn finish_dead_fall(&mut self) {
        self.sequence = None;
        self.over = true;
        let summary = self.summary();
        tracing::info!(score = summary.score, revives = summary.revives, "player landed");
        self.services.game_over.game_over(&summary);
    }

    /// Start a new life. Only valid once game over has completed.
    pub fn revive(&mut self) -> bool {
        if !self.over || self.sequence.is_some() {
            return false;
        }
        let assets = self.services.assets.as_ref();
        self.over = false;
        self.dying = false;
        self.player.revive(assets);
        self.player.reset_position();
        self.obstacles.clear();
        self.power_ups.clear();
        self.revives += 1;
        self.sequence = Some(Sequence::Revive { frame: 0 });
        tracing::info!(revives = self.revives, "revived");
        true
    }

    /// Show the next blink frame, or finish and resume once all are shown.
    /// Returns true while frames remain. A pause requested during the blink
    /// does not survive the resume.
    pub fn step_revive(&mut self) -> bool {
        let Some(Sequence::Revive { frame }) = self.sequence else {
            return false;
        };
        if frame >= REVIVE_BLINK_FRAMES {
            self.finish_revive();
            return false;
        }
        self.player_visible = frame % 2 == 0;
        self.render();
        self.sequence = Some(Sequence::Revive { frame: frame + 1 });
        true
    }

    /// Run the blink sequence to completion without pacing.
    pub fn run_revive(&mut self) {
        while self.step_revive() {}
    }

    // Ticking always resumes here, even if `pause()` was called mid-blink.
    fn finish_revive(&mut self) {
        self.sequence = None;
        self.player_visible = true;
        self.paused.clear();
    }

    /// Render the current state without advancing it.
    pub fn redraw(&mut self) -> bool {
        self.render()
    }

    fn render(&mut self) -> bool {
        let commands = self.compose_frame(self.player_visible, self.tutorial);
        present(self.services.target.as_mut(), &commands)
    }

    /// Build a frame back to front.
    pub fn compose_frame(&self, draw_player: bool, tutorial: bool) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let background = &self.scenery.background;
        for rect in background.tiles() {
            commands.push(sprite_command(background.sprite.id, rect, 0, 0));
        }
        for obstacle in self.obstacles.obstacles() {
            commands.push(entity_command(&obstacle.spider));
            commands.push(entity_command(&obstacle.log));
        }
        for power_up in self.power_ups.power_ups() {
            commands.push(entity_command(&power_up.body));
        }
        if draw_player {
            let overlay = self.player.visible_overlay();
            // The rainbow trails behind the cat; accessories sit on the cow.
            match self.player.form() {
                PlayerForm::NyanCat => {
                    commands.extend(overlay.map(entity_command));
                    commands.push(entity_command(&self.player.body));
                }
                PlayerForm::Cow => {
                    commands.push(entity_command(&self.player.body));
                    commands.extend(overlay.map(entity_command));
                }
            }
        }
        let frontground = &self.scenery.frontground;
        for rect in frontground.tiles() {
            commands.push(sprite_command(frontground.sprite.id, rect, 0, 0));
        }
        commands.push(sprite_command(
            SpriteId::PauseButton,
            self.scenery.pause_rect(),
            0,
            0,
        ));
        let size = self.viewport.score_text_size();
        commands.push(DrawCommand::Text {
            text: format!("Score {} / Coins {}", self.score(), self.coins()),
            x: size / 2.0,
            y: size,
            size,
        });
        if tutorial {
            commands.push(sprite_command(
                SpriteId::Tutorial,
                Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height),
                0,
                0,
            ));
        }
        commands
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score(),
            coins: self.coins(),
            revives: self.revives,
            ticks: self.ticks,
            form: self.player.form(),
        }
    }

    pub fn score(&self) -> u32 {
        self.services.score.points()
    }

    pub fn coins(&self) -> u32 {
        self.services.score.coins()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_set()
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.is_dead()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_tutorial_showing(&self) -> bool {
        self.tutorial
    }

    pub fn sequence(&self) -> Option<Sequence> {
        self.sequence
    }

    pub fn pause_flag(&self) -> PauseFlag {
        self.paused.clone()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.obstacles.obstacles()
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        self.obstacles.obstacles_mut()
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        self.power_ups.power_ups()
    }

    pub fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    pub fn revive_count(&self) -> u32 {
        self.revives
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Place a power-up directly, bypassing the reward rolls.
    pub fn spawn_power_up(&mut self, kind: PowerUpKind) {
        let speed = self.viewport.obstacle_speed(self.score());
        self.power_ups.spawn(
            kind,
            self.viewport,
            self.services.assets.as_ref(),
            speed,
            self.services.random.as_mut(),
        );
    }
}

fn sprite_command(sprite: SpriteId, rect: Rect, row: u32, col: u32) -> DrawCommand {
    DrawCommand::Sprite {
        sprite,
        rect,
        row,
        col,
    }
}

fn entity_command(entity: &Entity) -> DrawCommand {
    sprite_command(
        entity.sprite.id,
        entity.bounding_box(),
        entity.anim.row,
        entity.anim.col(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::ScriptedRandom;

    fn session() -> GameSession {
        let vp = Viewport::new(720.0, 1280.0);
        GameSession::new(
            vp,
            Services::headless(vp, Box::new(ScriptedRandom::constant(50.0))),
        )
    }

    #[test]
    fn test_first_tick_spawns_obstacle() {
        let mut s = session();
        let result = s.tick();
        assert!(result.ran);
        assert!(result.obstacle_spawned);
        assert_eq!(s.obstacles().len(), 1);
        assert!((s.obstacles()[0].spider.vel.x + 16.0).abs() < 1e-9);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut s = session();
        s.tick();
        s.pause();
        let y = s.player().body.pos.y;
        for _ in 0..10 {
            assert!(!s.tick().ran);
        }
        assert_eq!(s.player().body.pos.y, y);
        assert!(!s.tap());
        assert!(s.resume());
        assert!(s.tick().ran);
    }

    #[test]
    fn test_game_over_runs_once() {
        let mut s = session();
        s.game_over();
        let speed = s.player().speed_y();
        s.game_over();
        assert_eq!(s.player().speed_y(), speed);
        assert_eq!(s.sequence(), Some(Sequence::DeadFall));
        assert!(!s.resume());
    }

    #[test]
    fn test_revive_requires_completed_game_over() {
        let mut s = session();
        assert!(!s.revive());
        s.game_over();
        assert!(!s.revive());
        s.run_dead_fall();
        assert!(s.is_over());
        assert!(s.revive());
        assert_eq!(s.revive_count(), 1);
    }

    #[test]
    fn test_revive_blinks_then_resumes() {
        let mut s = session();
        s.game_over();
        s.run_dead_fall();
        s.revive();
        let mut frames = 0;
        while s.step_revive() {
            frames += 1;
            assert!(s.is_paused());
            assert!(!s.tick().ran);
        }
        assert_eq!(frames, REVIVE_BLINK_FRAMES as usize);
        assert!(!s.is_paused());
        assert!(s.tick().ran);
    }

    #[test]
    fn test_touch_pause_button_then_resume() {
        let mut s = session();
        let button = s.scenery().pause_rect();
        let on_button = Vec2::new(button.x + 1.0, button.y + 1.0);
        assert_eq!(s.touch(on_button), TouchAction::Paused);
        assert!(s.is_paused());
        assert_eq!(s.touch(Vec2::new(10.0, 600.0)), TouchAction::Resumed);
        assert!(!s.is_paused());
        assert_eq!(s.touch(Vec2::new(10.0, 600.0)), TouchAction::Tapped);
    }

    #[test]
    fn test_tutorial_dismissed_by_touch() {
        let mut s = session();
        s.show_tutorial();
        assert!(s.is_paused());
        let frame = s.compose_frame(true, true);
        assert!(matches!(
            frame.last(),
            Some(DrawCommand::Sprite {
                sprite: SpriteId::Tutorial,
                ..
            })
        ));
        assert_eq!(s.touch(Vec2::new(10.0, 600.0)), TouchAction::DismissedTutorial);
        assert!(!s.is_paused());
        assert!(s.player().speed_y() < 0.0);
    }

    #[test]
    fn test_resume_drops_tutorial_overlay() {
        let target = crate::session::RecordingTarget::new();
        let vp = Viewport::new(720.0, 1280.0);
        let mut s = GameSession::new(
            vp,
            Services::headless(vp, Box::new(ScriptedRandom::constant(50.0)))
                .with_target(target.clone()),
        );
        s.show_tutorial();
        assert!(s.resume());
        assert!(!s.is_tutorial_showing());
        for _ in 0..5 {
            assert!(s.tick().presented);
        }
        let frame = target.last_frame().unwrap_or_default();
        assert!(!frame.iter().any(|c| matches!(
            c,
            DrawCommand::Sprite {
                sprite: SpriteId::Tutorial,
                ..
            }
        )));
    }

    #[test]
    fn test_revive_overrides_pause_during_blink() {
        let mut s = session();
        s.game_over();
        s.run_dead_fall();
        s.revive();
        s.step_revive();
        s.pause();
        s.run_revive();
        assert!(!s.is_paused());
    }

    #[test]
    fn test_hud_text() {
        let s = session();
        let frame = s.compose_frame(true, false);
        let hud = frame.iter().find_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        });
        assert_eq!(hud.as_deref(), Some("Score 0 / Coins 0"));
    }

    #[test]
    fn test_hidden_player_not_drawn() {
        let s = session();
        let has_cow = |frame: &[DrawCommand]| {
            frame.iter().any(|c| {
                matches!(
                    c,
                    DrawCommand::Sprite {
                        sprite: SpriteId::Cow,
                        ..
                    }
                )
            })
        };
        assert!(has_cow(&s.compose_frame(true, false)));
        assert!(!has_cow(&s.compose_frame(false, false)));
    }
}
