//! Per-frame match update
//!
//! Placement frames are driven by the wall clock (countdown, edit cooldowns);
//! playing frames are driven by the frame counter (acceleration, automaton
//! generations).

use glam::Vec2;
use rand::Rng;

use super::collision::{Wall, check_grid, check_wall, handle_grid, handle_wall};
use super::placement::EditAction;
use super::state::{MatchEvent, MatchPhase, MatchState, PlayerId};
use crate::screen_to_cell;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start key: lock in early (placement only)
    pub start: bool,
    /// Pointer button went down this frame
    pub pointer_pressed: bool,
    /// Pointer button went up this frame
    pub pointer_released: bool,
    /// Pointer position in screen space
    pub pointer: Option<Vec2>,
    /// Idle/demo mode - AI builds both sides and starts the round
    pub idle_mode: bool,
    /// Quit request: the frame is not simulated and the loop ends
    pub quit: bool,
}

/// Advance the match by one frame. `now_ms` is wall-clock milliseconds.
pub fn tick(state: &mut MatchState, input: &TickInput, now_ms: u64) {
    if input.quit {
        return;
    }
    state.events.clear();
    state.frame += 1;

    match state.phase {
        MatchPhase::Placement => placement_frame(state, input, now_ms),
        MatchPhase::Playing => playing_frame(state),
    }

    if input.pointer_released {
        state.pointer.held = false;
    }
}

fn placement_frame(state: &mut MatchState, input: &TickInput, now_ms: u64) {
    let ready = input.idle_mode && autoplace(state, now_ms);
    if (input.start || ready) && !state.timer.is_expired() {
        lock_in(state, true);
        return;
    }

    handle_pointer(state, input, now_ms);

    if state.timer.update(now_ms) {
        lock_in(state, false);
    }
}

fn playing_frame(state: &mut MatchState) {
    state.ball.update();

    let accel_interval = state.settings.ball_accel_interval;
    if accel_interval > 0 && state.frame % accel_interval == 0 {
        state.ball.accelerate(None);
        log::debug!("Ball speed now {:.2}", state.ball.speed);
    }

    match check_wall(&state.ball, &state.settings) {
        Some(wall @ (Wall::Top | Wall::Bottom)) => {
            handle_wall(&mut state.ball, wall, &state.settings);
            state.events.push(MatchEvent::WallBounce { wall });
        }
        Some(Wall::Left) => {
            reset_round(state, PlayerId::Two);
            return;
        }
        Some(Wall::Right) => {
            reset_round(state, PlayerId::One);
            return;
        }
        None => {}
    }

    if let Some(hit) = check_grid(&state.ball, &state.grid, &state.settings) {
        let impact = handle_grid(
            &mut state.ball,
            &mut state.grid,
            hit,
            &state.settings,
            &mut state.rng,
        );
        state.events.push(MatchEvent::CellHit {
            cell_x: impact.cell_x,
            cell_y: impact.cell_y,
            destroyed: impact.destroyed,
        });
    }

    let life_interval = state.settings.life_update_interval;
    if life_interval > 0 && state.frame % life_interval == 0 {
        state.grid.step();
    }
}

/// Pointer press picks the drag mode; a held pointer edits the cell under it
fn handle_pointer(state: &mut MatchState, input: &TickInput, now_ms: u64) {
    let Some(pos) = input.pointer else {
        return;
    };
    let (x, y) = screen_to_cell(pos, state.settings.cell_size);

    if input.pointer_pressed {
        state.pointer.held = true;
        if let Some(owner) = state.player_for_column(x) {
            if state.grid.is_alive(x, y) {
                state.pointer.mode = EditAction::Remove;
            } else if y >= 0
                && y < state.grid.height() as i32
                && state.player(owner).limiter.can_place()
            {
                state.pointer.mode = EditAction::Add;
            }
        }
    }

    if !state.pointer.held {
        return;
    }
    if let Some(owner) = state.player_for_column(x) {
        let _ = state.try_edit(owner, x, y, state.pointer.mode, now_ms);
    }
}

/// Idle AI: one random placement attempt per player. Returns true once both banks are spent.
fn autoplace(state: &mut MatchState, now_ms: u64) -> bool {
    let height = state.grid.height();
    for id in [PlayerId::One, PlayerId::Two] {
        let player = state.player(id);
        let zone = player.zone();
        if !player.limiter.can_place() || zone.width() == 0 || height == 0 {
            continue;
        }
        let x = state.rng.random_range(zone.start..zone.end) as i32;
        let y = state.rng.random_range(0..height) as i32;
        let _ = state.try_edit(id, x, y, EditAction::Add, now_ms);
    }
    state.players.iter().all(|p| !p.limiter.can_place())
}

/// End placement: snapshot the grid and serve
pub fn lock_in(state: &mut MatchState, manual: bool) {
    state.snapshot = Some(state.grid.snapshot());
    let center = state.screen_center();
    state.ball.reset(center, &mut state.rng);
    state.timer.disarm();
    state.pointer.held = false;
    state.phase = MatchPhase::Playing;
    state.events.push(MatchEvent::LockedIn { manual });

    log::info!(
        "Round {} locked in ({}) with {} live cells",
        state.round + 1,
        if manual { "start key" } else { "timer" },
        state.grid.population()
    );
}

/// Award a point and return to placement with the locked-in grid
pub fn reset_round(state: &mut MatchState, scorer: PlayerId) {
    let player = state.player_mut(scorer);
    player.score += 1;
    let score = player.score;
    state.events.push(MatchEvent::Scored {
        player: scorer,
        score,
    });

    match &state.snapshot {
        Some(snapshot) => {
            state.grid.restore(snapshot);
        }
        None => {
            log::warn!("No locked-in grid to restore; starting the round empty");
            state.grid.reset();
        }
    }

    let center = state.screen_center();
    state.ball.reset(center, &mut state.rng);
    state.timer.restart();

    let restart_cells = state.settings.restart_cells;
    for player in &mut state.players {
        player.limiter.reset_edit_cooldown();
        player.limiter.top_up(restart_cells);
    }

    state.round += 1;
    state.phase = MatchPhase::Placement;
    state.events.push(MatchEvent::RoundReset { round: state.round });

    log::info!(
        "{:?} scores! {} - {}",
        scorer,
        state.players[0].score,
        state.players[1].score
    );
}
