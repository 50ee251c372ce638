//! Threads that pace a shared session: the periodic tick scheduler and the
//! one-off dead-fall and revive sequences.

use super::game_session::GameSession;
use crate::core::{DEAD_FALL_FRAME_DIVISOR, REVIVE_BLINK_TICKS};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub type SharedSession = Arc<Mutex<GameSession>>;

pub fn share(session: GameSession) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// Lock the session, recovering from a panicked holder.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, GameSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Dead-fall frames run at a fraction of the tick interval.
pub fn dead_fall_interval(tick_interval: Duration) -> Duration {
    tick_interval / DEAD_FALL_FRAME_DIVISOR
}

pub fn blink_interval(tick_interval: Duration) -> Duration {
    tick_interval * REVIVE_BLINK_TICKS
}

/// Calls `tick()` on a fixed cadence from its own thread.
///
/// When a tick ends in game over the dead-fall is started on a separate
/// thread. Stopping joins the tick thread, so close any surface gate the
/// draw target waits on first.
pub struct TickDriver {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TickDriver {
    pub fn spawn(session: SharedSession, interval: Duration) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let pause = lock_session(&session).pause_flag();
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("flappycow-tick".to_string())
            .spawn(move || {
                let mut next = Instant::now() + interval;
                while !stop_flag.load(Ordering::SeqCst) {
                    let now = Instant::now();
                    if next > now {
                        thread::sleep(next - now);
                    }
                    // Don't try to catch up after a stall.
                    next = next.max(Instant::now()) + interval;

                    if stop_flag.load(Ordering::SeqCst) {
                        break;
                    }
                    if pause.is_set() {
                        continue;
                    }
                    let result = lock_session(&session).tick();
                    if result.game_over {
                        let frame = dead_fall_interval(interval);
                        if let Err(e) = spawn_dead_fall(&session, frame) {
                            tracing::warn!("could not start dead-fall thread: {}", e);
                            lock_session(&session).run_dead_fall();
                        }
                    }
                }
                tracing::debug!("tick thread stopped");
            })?;

        tracing::debug!(interval_ms = interval.as_millis() as u64, "tick thread started");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking and wait for the thread. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("tick thread panicked");
            }
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Step the dead-fall one frame per lock until the player lands.
pub fn spawn_dead_fall(session: &SharedSession, frame: Duration) -> io::Result<JoinHandle<()>> {
    let session = Arc::clone(session);
    thread::Builder::new()
        .name("flappycow-dead-fall".to_string())
        .spawn(move || loop {
            if !lock_session(&session).step_dead_fall() {
                break;
            }
            thread::sleep(frame);
        })
}

/// Revive the session and play the blink sequence on its own thread.
/// Returns `None` when a revive is not allowed right now.
pub fn spawn_revive(
    session: &SharedSession,
    blink: Duration,
) -> io::Result<Option<JoinHandle<()>>> {
    if !lock_session(session).revive() {
        return Ok(None);
    }
    let session = Arc::clone(session);
    let handle = thread::Builder::new()
        .name("flappycow-revive".to_string())
        .spawn(move || loop {
            if !lock_session(&session).step_revive() {
                break;
            }
            thread::sleep(blink);
        })?;
    Ok(Some(handle))
}
