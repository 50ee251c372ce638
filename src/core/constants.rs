// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 50; // 20 updates per second
pub const DEAD_FALL_FRAME_DIVISOR: u32 = 4; // dead-fall frames run at a quarter tick
pub const REVIVE_BLINK_FRAMES: u8 = 6;
pub const REVIVE_BLINK_TICKS: u32 = 6; // delay between blink frames, in ticks

// Default viewport (720x1280 portrait, the tuning reference resolution)
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 720.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 1280.0;

// Player physics, as divisors of viewport height
pub const TAP_SPEED_DIVISOR: f64 = 16.0; // -80 @ 1280
pub const GRAVITY_DIVISOR: f64 = 320.0; // 4 @ 1280
pub const MAX_SPEED_DIVISOR: f64 = 51.2; // 25 @ 1280
pub const TAP_BUMP_DIVISOR: f64 = 100.0; // -12.8 @ 1280
pub const PLAYER_X_DIVISOR: f64 = 6.0; // player pinned at width / 6

// Collision and scenery
pub const COLLISION_TOLERANCE_DIVISOR: f64 = 50.0;
pub const GROUND_HEIGHT_RATIO: f64 = 35.0 / 720.0;
pub const SCORE_TEXT_DIVISOR: f64 = 21.0;

// Obstacle speed, as divisors of viewport width
pub const OBSTACLE_SPEED_DIVISOR: f64 = 45.0; // 16 @ 720
pub const OBSTACLE_SPEED_STEP_DIVISOR: f64 = 600.0; // +1.2 every few points @ 720
pub const OBSTACLE_SPEED_STEP_POINTS: u32 = 4;
pub const OBSTACLE_SPEED_CAP_FACTOR: f64 = 2.0;

// Obstacle gap, as divisors of viewport height
pub const GAP_DIVISOR: f64 = 4.0;
pub const MIN_GAP_DIVISOR: f64 = 5.0;
pub const GAP_TOP_MARGIN_DIVISOR: f64 = 10.0;
pub const GAP_OFFSET_RANGE: f64 = 2.0 / 5.0;

// Power-up spawning
pub const POWER_UP_SPAWN_X_RATIO: f64 = 4.0 / 5.0;
pub const POINTS_TO_TOAST: u32 = 42;
pub const TOAST_CHANCE_PERCENT: f64 = 33.0;
pub const COIN_CHANCE_PERCENT: f64 = 20.0;
pub const VIRUS_CHANCE_PERCENT: f64 = 10.0;

// Cow accessory upgrades
pub const POINTS_TO_SIR: u32 = 23;
pub const POINTS_TO_COOL: u32 = 35;
