//! Draw commands, the render target seam, and surface readiness.

use crate::core::geometry::Rect;
use crate::sprites::SpriteId;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// One primitive in a composed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A sprite-sheet cell scaled into `rect`.
    Sprite {
        sprite: SpriteId,
        rect: Rect,
        row: u32,
        col: u32,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
    },
}

/// Where frames go.
pub trait DrawTarget: Send {
    /// Block until the surface can be drawn on. `false` means skip this frame.
    fn acquire(&mut self) -> bool;
    fn draw(&mut self, command: &DrawCommand);
    fn present(&mut self);
}

/// Acquire, draw everything, present. Returns whether the frame was shown.
pub fn present(target: &mut dyn DrawTarget, commands: &[DrawCommand]) -> bool {
    if !target.acquire() {
        tracing::trace!("surface not available, frame skipped");
        return false;
    }
    for command in commands {
        target.draw(command);
    }
    target.present();
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Ready,
    NotReady,
    Closed,
}

/// Surface readiness shared between the render target and whoever owns the
/// surface. Waiters sleep on a condvar until the state changes.
#[derive(Debug, Clone)]
pub struct SurfaceGate {
    inner: Arc<(Mutex<GateState>, Condvar)>,
}

impl Default for SurfaceGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceGate {
    /// Starts ready.
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(GateState::Ready), Condvar::new())),
        }
    }

    /// Starts not ready.
    pub fn suspended() -> Self {
        let gate = Self::new();
        gate.suspend();
        gate
    }

    fn set(&self, state: GateState) {
        let (lock, cvar) = &*self.inner;
        let mut current = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == GateState::Closed {
            return;
        }
        *current = state;
        cvar.notify_all();
    }

    pub fn open(&self) {
        self.set(GateState::Ready);
    }

    pub fn suspend(&self) {
        self.set(GateState::NotReady);
    }

    /// Permanent. Wakes every waiter.
    pub fn close(&self) {
        self.set(GateState::Closed);
    }

    pub fn is_ready(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) == GateState::Ready
    }

    pub fn is_closed(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) == GateState::Closed
    }

    /// Block while not ready. Returns false once closed.
    pub fn wait_ready(&self) -> bool {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let guard = cvar
            .wait_while(guard, |state| *state == GateState::NotReady)
            .unwrap_or_else(PoisonError::into_inner);
        *guard == GateState::Ready
    }
}

/// Discards frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTarget;

impl DrawTarget for NullTarget {
    fn acquire(&mut self) -> bool {
        true
    }

    fn draw(&mut self, _command: &DrawCommand) {}

    fn present(&mut self) {}
}

/// Keeps every presented frame. Clones share the same frame log.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    frames: Arc<Mutex<Vec<Vec<DrawCommand>>>>,
    pending: Vec<DrawCommand>,
    gate: Option<SurfaceGate>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate(gate: SurfaceGate) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn last_frame(&self) -> Option<Vec<DrawCommand>> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl DrawTarget for RecordingTarget {
    fn acquire(&mut self) -> bool {
        self.pending.clear();
        self.gate.as_ref().map_or(true, SurfaceGate::wait_ready)
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.pending.push(command.clone());
    }

    fn present(&mut self) {
        let frame = std::mem::take(&mut self.pending);
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame);
    }
}
