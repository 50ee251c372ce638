//! A simple deterministic tap policy used by the simulator and tests.

use crate::session::GameSession;
use crate::sprites::PlayerState;

/// Fraction of the playfield the player may sink to with nothing ahead.
const IDLE_FLOOR_RATIO: f64 = 0.6;

/// Decide whether to tap before the next tick.
///
/// With an obstacle ahead the policy waits until the player's feet reach
/// the bottom of the gap (less one collision tolerance) and then flaps,
/// never while already rising.
pub fn should_tap(session: &GameSession) -> bool {
    let player = session.player();
    if player.is_dead() {
        return false;
    }
    let viewport = session.viewport();
    let body = player.bounding_box();

    let ahead = session
        .obstacles()
        .iter()
        .find(|o| !o.is_passed() && !o.is_behind(body.x));

    match ahead {
        None => body.bottom() > viewport.ground_y() * IDLE_FLOOR_RATIO,
        Some(obstacle) => {
            let (_, gap_bottom) = obstacle.gap();
            let margin = viewport.collision_tolerance();
            body.bottom() > gap_bottom - margin && player.state() != PlayerState::AliveAscending
        }
    }
}
