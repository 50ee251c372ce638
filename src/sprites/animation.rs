//! Sprite-sheet frame state machine.

/// Position in a sprite sheet plus the cadence at which columns advance.
///
/// The column cycles through `[0, col_count)`, one step every
/// `frame_period` calls to [`Animation::advance`]. The row is chosen by the
/// owning entity (speed bucket, death pose, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub row: u32,
    col: u32,
    frame_counter: u32,
    frame_period: u32,
    col_count: u32,
}

impl Animation {
    pub fn new(col_count: u32, frame_period: u32) -> Self {
        Self {
            row: 0,
            col: 0,
            frame_counter: 0,
            frame_period: frame_period.max(1),
            col_count: col_count.max(1),
        }
    }

    /// Count one tick; step the column when the counter reaches the period.
    pub fn advance(&mut self) {
        self.frame_counter += 1;
        if self.frame_counter >= self.frame_period {
            self.frame_counter = 0;
            self.col = (self.col + 1) % self.col_count;
        }
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    pub fn frame_period(&self) -> u32 {
        self.frame_period
    }

    pub fn set_frame_period(&mut self, frame_period: u32) {
        self.frame_period = frame_period.max(1);
        self.frame_counter %= self.frame_period;
    }
}
