//! Match settings
//!
//! Every tunable of the simulation, defaulted from [`crate::consts`] and
//! optionally overridden by a JSON file next to the binary.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub screen_width: u32,
    pub screen_height: u32,
    pub fps: u32,
    pub cell_size: u32,
    /// Columns per player zone
    pub placing_width: u32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_base_speed: f32,
    pub ball_max_speed: f32,
    pub ball_acceleration: f32,
    /// Frames between speed increments
    pub ball_accel_interval: u64,
    /// Frames of cell-collision cooldown after a bounce
    pub collision_cooldown: u32,
    pub launch_angle_jitter: f32,
    pub bounce_jitter: f32,
    pub trail_length: usize,

    // === Banks ===
    pub starting_cells: u32,
    pub restart_cells: u32,
    pub max_cells: u32,

    // === Automaton ===
    pub life_update_interval: u64,
    pub cell_max_health: u8,

    // === Damage ===
    pub ball_damage_base: u8,
    pub ball_damage_speed_bonus: bool,

    // === Minimum bounce angle ===
    pub min_bounce_angle_enabled: bool,
    /// Radians
    pub min_bounce_angle: f32,
    /// Fraction of ball speed added to the starved component
    pub min_bounce_adjustment: f32,

    // === Placement window ===
    pub placement_time_secs: f32,
    pub rapid_build_secs: f32,
    pub rapid_cooldown_ms: u64,
    pub precision_cooldown_ms: u64,

    /// Reload the last locked-in arena when the binary starts
    pub resume_saved_arena: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fps: FPS,
            cell_size: CELL_SIZE,
            placing_width: PLACING_WIDTH,

            ball_radius: BALL_RADIUS,
            ball_base_speed: BALL_BASE_SPEED,
            ball_max_speed: BALL_MAX_SPEED,
            ball_acceleration: BALL_ACCELERATION,
            ball_accel_interval: BALL_ACCEL_INTERVAL,
            collision_cooldown: COLLISION_COOLDOWN,
            launch_angle_jitter: LAUNCH_ANGLE_JITTER,
            bounce_jitter: BOUNCE_JITTER,
            trail_length: TRAIL_LENGTH,

            starting_cells: STARTING_CELLS,
            restart_cells: RESTART_CELLS,
            max_cells: MAX_CELLS,

            life_update_interval: LIFE_UPDATE_INTERVAL,
            cell_max_health: CELL_MAX_HEALTH,

            ball_damage_base: BALL_DAMAGE_BASE,
            ball_damage_speed_bonus: BALL_DAMAGE_SPEED_BONUS,

            min_bounce_angle_enabled: MIN_BOUNCE_ANGLE_ENABLED,
            min_bounce_angle: MIN_BOUNCE_ANGLE,
            min_bounce_adjustment: MIN_BOUNCE_ADJUSTMENT,

            placement_time_secs: PLACEMENT_TIME_SECS,
            rapid_build_secs: RAPID_BUILD_SECS,
            rapid_cooldown_ms: RAPID_COOLDOWN_MS,
            precision_cooldown_ms: PRECISION_COOLDOWN_MS,

            resume_saved_arena: false,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "lifepong_settings.json";

    /// Grid width in cells
    pub fn grid_width(&self) -> u32 {
        self.screen_width / self.cell_size
    }

    /// Grid height in cells
    pub fn grid_height(&self) -> u32 {
        self.screen_height / self.cell_size
    }

    /// Column range `[start, end)` owned by player one
    pub fn left_zone(&self) -> (u32, u32) {
        (0, self.placing_width)
    }

    /// Column range `[start, end)` owned by player two
    pub fn right_zone(&self) -> (u32, u32) {
        let width = self.grid_width();
        (width - self.placing_width, width)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from the default file in the working directory
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
