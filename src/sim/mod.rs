//! Match simulation
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (ball serves, bounce jitter, idle AI)
//! - Playing frames are frame-counted; only placement reads the wall clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod placement;
pub mod state;
pub mod tick;

pub use collision::{
    CellImpact, GridCollision, Wall, calculate_damage, check_grid, check_wall, handle_grid,
    handle_wall, reflect_velocity,
};
pub use grid::{GridSnapshot, LifeGrid};
pub use placement::{EditAction, EditRejection, PlacementLimiter, PlacementTimer, Zone};
pub use state::{
    Ball, MatchEvent, MatchPhase, MatchState, Player, PlayerId, PointerState, TrailPoint,
    PLAYER_ONE_COLOR, PLAYER_TWO_COLOR,
};
pub use tick::{TickInput, lock_in, reset_round, tick};
