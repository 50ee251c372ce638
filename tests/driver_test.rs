//! Integration tests for the threaded pieces: tick driver, dead-fall and
//! revive threads, and the surface gate blocking a render.

use flappycow::core::geometry::Viewport;
use flappycow::session::{
    lock_session, share, spawn_revive, GameSession, RecordingTarget, Services, SurfaceGate,
    TickDriver,
};
use flappycow::spawn::RngSource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_full_life_then_revive() {
    let vp = Viewport::new(720.0, 1280.0);
    let (tx, rx) = mpsc::channel();
    let target = RecordingTarget::new();
    let services = Services::headless(vp, Box::new(RngSource::new(ChaCha8Rng::seed_from_u64(3))))
        .with_target(target.clone())
        .with_game_over(tx);
    let session = share(GameSession::new(vp, services));

    let mut driver = TickDriver::spawn(Arc::clone(&session), Duration::from_millis(1)).unwrap();

    // Nobody taps, so the cow falls to the ground.
    let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(first.revives, 0);
    assert!(target.frame_count() > 0);

    let handle = spawn_revive(&session, Duration::from_millis(1))
        .unwrap()
        .expect("revive after game over");
    handle.join().unwrap();

    // The driver picks the revived session back up and it falls again.
    let second = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(second.revives, 1);
    assert!(second.ticks > first.ticks);

    driver.stop();
}

#[test]
fn test_suspended_gate_blocks_until_opened() {
    let vp = Viewport::new(720.0, 1280.0);
    let gate = SurfaceGate::suspended();
    let target = RecordingTarget::with_gate(gate.clone());
    let services = Services::headless(vp, Box::new(RngSource::seeded(1))).with_target(target.clone());
    let session = share(GameSession::new(vp, services));

    let mut driver = TickDriver::spawn(Arc::clone(&session), Duration::from_millis(1)).unwrap();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(target.frame_count(), 0);

    gate.open();
    thread::sleep(Duration::from_millis(30));
    assert!(target.frame_count() > 0);

    // Closing wakes any blocked render so the driver can stop.
    gate.suspend();
    thread::sleep(Duration::from_millis(10));
    gate.close();
    driver.stop();
    assert!(!driver.is_running());
    assert!(lock_session(&session).ticks() > 0);
}
