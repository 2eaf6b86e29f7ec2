//! LifePong - Pong across a living Game of Life battlefield
//!
//! Core modules:
//! - `sim`: Simulation engine (life grid, ball physics, collisions, placement, match flow)
//! - `renderer`: Read-only frame view handed to presentation layers
//! - `platform`: Clock abstraction for wall-clock driven timers
//! - `persistence`: Grid snapshot save/load with empty-grid fallback
//! - `settings`: Data-driven match configuration

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Match configuration defaults
pub mod consts {
    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: u32 = 1200;
    pub const SCREEN_HEIGHT: u32 = 600;
    /// Target frame rate of the cooperative loop
    pub const FPS: u32 = 60;

    /// Grid cell edge length (pixels). Grid is SCREEN / CELL_SIZE cells.
    pub const CELL_SIZE: u32 = 10;
    /// Columns each player may build in
    pub const PLACING_WIDTH: u32 = 40;

    /// Ball defaults (pixels per frame)
    pub const BALL_RADIUS: f32 = 9.0;
    pub const BALL_BASE_SPEED: f32 = 6.0;
    pub const BALL_MAX_SPEED: f32 = 12.0;
    pub const BALL_ACCELERATION: f32 = 0.15;
    /// Frames between speed increments
    pub const BALL_ACCEL_INTERVAL: u64 = 120;
    /// Frames after a cell bounce before another cell hit can register
    pub const COLLISION_COOLDOWN: u32 = 5;
    /// Max launch angle off the horizontal (radians)
    pub const LAUNCH_ANGLE_JITTER: f32 = 0.4;
    /// Max random velocity kick added per component on a cell bounce
    pub const BOUNCE_JITTER: f32 = 0.2;
    pub const TRAIL_LENGTH: usize = 15;

    /// Cell budgets
    pub const STARTING_CELLS: u32 = 40;
    /// Added to every bank after a round reset (0 disables)
    pub const RESTART_CELLS: u32 = 20;
    pub const MAX_CELLS: u32 = 300;

    /// Frames between Game of Life generations
    pub const LIFE_UPDATE_INTERVAL: u64 = 3;

    /// Cell health
    pub const CELL_MAX_HEALTH: u8 = 3;
    pub const BALL_DAMAGE_BASE: u8 = 1;
    pub const BALL_DAMAGE_SPEED_BONUS: bool = true;
    /// speed / max_speed ratios that each add one point of damage
    pub const DAMAGE_TIER_1: f32 = 0.7;
    pub const DAMAGE_TIER_2: f32 = 0.9;

    /// Minimum bounce angle guard (off by default)
    pub const MIN_BOUNCE_ANGLE_ENABLED: bool = false;
    pub const MIN_BOUNCE_ANGLE: f32 = 0.2; // radians (~11.5 degrees)
    pub const MIN_BOUNCE_ADJUSTMENT: f32 = 0.3;

    /// Placement window (seconds) and edit cooldowns (milliseconds)
    pub const PLACEMENT_TIME_SECS: f32 = 30.0;
    /// Opening stretch of the window that uses the rapid cooldown
    pub const RAPID_BUILD_SECS: f32 = 10.0;
    pub const RAPID_COOLDOWN_MS: u64 = 30;
    pub const PRECISION_COOLDOWN_MS: u64 = 150;
}

/// Map a screen-space point to grid coordinates (integer division by cell size)
///
/// Negative coordinates floor toward negative infinity so they stay out of bounds.
#[inline]
pub fn screen_to_cell(pos: Vec2, cell_size: u32) -> (i32, i32) {
    let cs = cell_size as f32;
    ((pos.x / cs).floor() as i32, (pos.y / cs).floor() as i32)
}

/// Center of a grid cell in screen space
#[inline]
pub fn cell_center(cell_x: i32, cell_y: i32, cell_size: u32) -> Vec2 {
    let cs = cell_size as f32;
    Vec2::new(cell_x as f32 * cs + cs / 2.0, cell_y as f32 * cs + cs / 2.0)
}
