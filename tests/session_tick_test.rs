//! Integration tests for GameSession::tick() and the state transitions
//! around it: passes, rewards, collisions, pause, dead-fall, and revive.
//!
//! Uses seeded ChaCha8Rng or scripted draws for deterministic behavior.

use flappycow::autopilot::should_tap;
use flappycow::core::geometry::{Vec2, Viewport};
use flappycow::session::{
    Achievement, AchievementLog, Counters, Cue, DrawCommand, GameSession, GameSummary,
    RecordingTarget, Sequence, Services, TouchAction,
};
use flappycow::spawn::{RandomSource, RngSource, ScriptedRandom};
use flappycow::sprites::{PlayerForm, PowerUpKind, SpriteId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

fn viewport() -> Viewport {
    Viewport::new(720.0, 1280.0)
}

fn session_with(points: u32, random: Box<dyn RandomSource>) -> GameSession {
    let vp = viewport();
    let services = Services::headless(vp, random).with_score(Counters { points, coins: 0 });
    GameSession::new(vp, services)
}

/// Draws of 99 never pass a chance roll.
fn unlucky(points: u32) -> GameSession {
    session_with(points, Box::new(ScriptedRandom::constant(99.0)))
}

/// Slide the live obstacle so its trailing edge sits just behind the player.
fn move_obstacle_behind_player(s: &mut GameSession) {
    let player_x = s.viewport().player_x();
    let obstacle = &mut s.obstacles_mut()[0];
    let x = player_x - obstacle.spider.size.width - 1.0;
    obstacle.spider.pos.x = x;
    obstacle.log.pos.x = x;
}

// =============================================================================
// Movement and spawning
// =============================================================================

#[test]
fn test_tap_then_tick_moves_player_up() {
    let mut s = unlucky(0);
    assert!((s.player().body.pos.y - 640.0).abs() < 1e-9);

    assert!(s.tap());
    assert!((s.player().speed_y() + 80.0).abs() < 1e-9);
    assert!((s.player().body.pos.y - 627.2).abs() < 1e-9);

    s.tick();
    // Rising speed decays: -80 * 2/3 + 4/2
    let expected_speed = -80.0 * 2.0 / 3.0 + 2.0;
    assert!((s.player().speed_y() - expected_speed).abs() < 1e-9);
    assert!((s.player().body.pos.y - (627.2 + expected_speed)).abs() < 1e-9);
}

#[test]
fn test_obstacle_speed_is_capped() {
    let mut s = unlucky(10_000);
    s.tick();
    let obstacle = &s.obstacles()[0];
    assert!((obstacle.spider.vel.x + 32.0).abs() < 1e-9);
    assert!((obstacle.log.vel.x + 32.0).abs() < 1e-9);
    // Gap narrows with speed: 1280/4 - 32
    let (top, bottom) = obstacle.gap();
    assert!((bottom - top - 288.0).abs() < 1e-9);
}

#[test]
fn test_never_more_than_one_obstacle() {
    let random = RngSource::new(ChaCha8Rng::seed_from_u64(42));
    let mut s = session_with(0, Box::new(random));
    for _ in 0..3000 {
        if should_tap(&s) {
            s.tap();
        }
        let result = s.tick();
        assert!(s.obstacles().len() <= 1);
        if result.game_over {
            break;
        }
    }
    assert!(s.ticks() > 0);
}

// =============================================================================
// Passing and rewards
// =============================================================================

#[test]
fn test_pass_counts_once() {
    let mut s = unlucky(0);
    s.tick();
    move_obstacle_behind_player(&mut s);

    let first = s.tick();
    assert_eq!(first.passes, 1);
    assert_eq!(s.score(), 1);
    assert!(s.obstacles()[0].is_passed());

    let second = s.tick();
    assert_eq!(second.passes, 0);
    assert_eq!(s.score(), 1);
}

#[test]
fn test_score_42_guarantees_toast() {
    let mut s = unlucky(41);
    s.tick();
    move_obstacle_behind_player(&mut s);

    let result = s.tick();
    assert_eq!(result.passes, 1);
    assert_eq!(s.score(), 42);
    assert_eq!(result.power_ups_spawned, vec![PowerUpKind::Toast]);
    assert_eq!(s.power_ups().len(), 1);
}

#[test]
fn test_no_toast_past_threshold_on_bad_roll() {
    let mut s = unlucky(42);
    s.tick();
    move_obstacle_behind_player(&mut s);

    let result = s.tick();
    assert_eq!(s.score(), 43);
    assert!(result.power_ups_spawned.is_empty());
}

#[test]
fn test_toast_turns_cow_into_nyan_cat() {
    let vp = viewport();
    let cues = Arc::new(Mutex::new(Vec::new()));
    let achievements = Arc::new(Mutex::new(AchievementLog::default()));
    let services = Services::headless(vp, Box::new(ScriptedRandom::constant(50.0)))
        .with_audio(Arc::clone(&cues))
        .with_achievements(Arc::clone(&achievements));
    let mut s = GameSession::new(vp, services);

    s.spawn_power_up(PowerUpKind::Toast);
    for _ in 0..5 {
        s.tick();
    }
    let toast = s.power_ups()[0].body.pos;
    assert!(toast.y > 0.0);
    s.player_mut().body.pos = toast;

    let result = s.tick();
    assert_eq!(result.collected, vec![PowerUpKind::Toast]);
    assert_eq!(s.player().form(), PlayerForm::NyanCat);
    assert!(achievements
        .lock()
        .unwrap()
        .is_unlocked(Achievement::Toastification));
    assert!(cues.lock().unwrap().contains(&Cue::FormChange));
}

#[test]
fn test_coin_and_virus_adjust_coins() {
    let mut s = session_with(0, Box::new(ScriptedRandom::constant(50.0)));
    s.spawn_power_up(PowerUpKind::Coin);
    for _ in 0..5 {
        s.tick();
    }
    let coin = s.power_ups()[0].body.pos;
    s.player_mut().body.pos = coin;
    assert_eq!(s.tick().collected, vec![PowerUpKind::Coin]);
    assert_eq!(s.coins(), 1);

    s.spawn_power_up(PowerUpKind::Virus);
    s.spawn_power_up(PowerUpKind::Virus);
    for _ in 0..5 {
        s.tick();
    }
    let virus = s.power_ups()[0].body.pos;
    s.player_mut().body.pos = virus;
    let collected = s.tick().collected;
    assert_eq!(collected, vec![PowerUpKind::Virus, PowerUpKind::Virus]);
    // Never below zero.
    assert_eq!(s.coins(), 0);
}

// =============================================================================
// Collisions and game over
// =============================================================================

#[test]
fn test_obstacle_hit_ends_life() {
    let vp = viewport();
    let cues = Arc::new(Mutex::new(Vec::new()));
    let services = Services::headless(vp, Box::new(ScriptedRandom::constant(50.0)))
        .with_audio(Arc::clone(&cues));
    let mut s = GameSession::new(vp, services);
    s.tick();

    // Inside the spider, well above the gap.
    let player_x = vp.player_x();
    s.obstacles_mut()[0].spider.pos.x = player_x;
    s.obstacles_mut()[0].log.pos.x = player_x;
    s.player_mut().body.pos.y = 100.0;

    let result = s.tick();
    assert!(result.game_over);
    assert!(s.is_player_dead());
    assert_eq!(s.sequence(), Some(Sequence::DeadFall));
    assert_eq!(cues.lock().unwrap().last(), Some(&Cue::Collision));
}

#[test]
fn test_leaving_the_sky_ends_life_silently() {
    let vp = viewport();
    let cues = Arc::new(Mutex::new(Vec::new()));
    let services = Services::headless(vp, Box::new(ScriptedRandom::constant(50.0)))
        .with_audio(Arc::clone(&cues));
    let mut s = GameSession::new(vp, services);
    s.player_mut().body.pos.y = -1.0;

    assert!(s.tick().game_over);
    assert!(!cues.lock().unwrap().contains(&Cue::Collision));
}

#[test]
fn test_dead_fall_ignores_input() {
    let mut s = unlucky(0);
    s.tick();
    s.game_over();

    assert!(!s.tap());
    assert_eq!(s.touch(Vec2::new(360.0, 640.0)), TouchAction::Ignored);
    assert!(!s.tick().ran);

    let y = s.player().body.pos.y;
    assert!(s.step_dead_fall());
    assert!(s.player().body.pos.y > y);

    s.run_dead_fall();
    assert!(s.is_over());
    assert!(!s.player().body.alive);
    assert!(s.player().is_touching_ground());
    assert!(s.sequence().is_none());
}

#[test]
fn test_handler_told_once_after_landing() {
    let vp = viewport();
    let summaries: Arc<Mutex<Vec<GameSummary>>> = Arc::new(Mutex::new(Vec::new()));
    let services = Services::headless(vp, Box::new(ScriptedRandom::constant(99.0)))
        .with_score(Counters { points: 7, coins: 3 })
        .with_game_over(Arc::clone(&summaries));
    let mut s = GameSession::new(vp, services);

    s.game_over();
    assert!(summaries.lock().unwrap().is_empty());
    s.run_dead_fall();
    s.run_dead_fall();

    let summaries = summaries.lock().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].score, 7);
    assert_eq!(summaries[0].coins, 3);
    assert_eq!(summaries[0].form, PlayerForm::Cow);
}

// =============================================================================
// Pause and revive
// =============================================================================

#[test]
fn test_pause_resume_preserves_state() {
    let mut s = unlucky(0);
    for _ in 0..3 {
        s.tick();
    }
    s.pause();
    let player = s.player().body.pos;
    let obstacle = s.obstacles()[0].spider.pos;
    let ticks = s.ticks();

    for _ in 0..20 {
        assert!(!s.tick().ran);
    }
    assert!(s.resume());
    assert_eq!(s.player().body.pos, player);
    assert_eq!(s.obstacles()[0].spider.pos, obstacle);
    assert_eq!(s.ticks(), ticks);
}

#[test]
fn test_revive_keeps_score_and_clears_field() {
    let mut s = unlucky(5);
    s.tick();
    s.spawn_power_up(PowerUpKind::Coin);
    s.game_over();
    s.run_dead_fall();

    assert!(s.revive());
    assert_eq!(s.score(), 5);
    assert!(s.obstacles().is_empty());
    assert!(s.power_ups().is_empty());
    assert!(!s.is_player_dead());
    assert!(!s.player().is_touching_ground());

    s.run_revive();
    assert!(!s.is_paused());
    assert!(s.tick().obstacle_spawned);
    assert_eq!(s.summary().revives, 1);
}

#[test]
fn test_revive_blink_hides_player_on_odd_frames() {
    let vp = viewport();
    let target = RecordingTarget::new();
    let services = Services::headless(vp, Box::new(ScriptedRandom::constant(99.0)))
        .with_target(target.clone());
    let mut s = GameSession::new(vp, services);
    s.game_over();
    s.run_dead_fall();
    s.revive();

    let mut visible = Vec::new();
    while s.step_revive() {
        let frame = target.last_frame().unwrap_or_default();
        visible.push(frame.iter().any(|c| {
            matches!(
                c,
                DrawCommand::Sprite {
                    sprite: SpriteId::Cow,
                    ..
                }
            )
        }));
    }
    assert_eq!(visible, vec![true, false, true, false, true, false]);
}

#[test]
fn test_tutorial_gone_once_play_resumes() {
    let vp = viewport();
    let target = RecordingTarget::new();
    let services = Services::headless(vp, Box::new(ScriptedRandom::constant(99.0)))
        .with_target(target.clone());
    let mut s = GameSession::new(vp, services);

    s.show_tutorial();
    assert!(s.resume());
    for _ in 0..5 {
        assert!(s.tick().ran);
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
fn test_toast_on_fatal_tick_still_transforms() {
    let mut s = session_with(0, Box::new(ScriptedRandom::constant(50.0)));
    s.spawn_power_up(PowerUpKind::Toast);
    for _ in 0..5 {
        s.tick();
    }
    // Toast and spider share the player's spot.
    let toast = s.power_ups()[0].body.pos;
    s.obstacles_mut()[0].spider.pos = toast;
    s.player_mut().body.pos = toast;

    let result = s.tick();
    assert_eq!(result.collected, vec![PowerUpKind::Toast]);
    assert!(result.game_over);
    assert_eq!(s.player().form(), PlayerForm::NyanCat);
}
