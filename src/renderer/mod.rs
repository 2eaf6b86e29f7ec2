//! Rendering boundary
//!
//! Renderers only ever see a [`FrameView`], a read-only borrow of the parts of
//! the match worth drawing.

use glam::Vec2;

use crate::cell_center;
use crate::sim::grid::LifeGrid;
use crate::sim::state::{Ball, MatchPhase, MatchState, Player};

/// Tint for live cells in the neutral middle band
pub const NEUTRAL_CELL_COLOR: [u8; 3] = [200, 200, 200];

/// Read-only view of one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub grid: &'a LifeGrid,
    pub ball: &'a Ball,
    pub players: &'a [Player; 2],
    pub phase: MatchPhase,
    /// Seconds left in the placement countdown
    pub remaining: f32,
    pub round: u32,
    pub frame: u64,
    pub cell_size: u32,
}

/// One live cell, ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSprite {
    pub center: Vec2,
    /// Health as a fraction of max, for fading
    pub health: f32,
    pub color: [u8; 3],
}

impl<'a> From<&'a MatchState> for FrameView<'a> {
    fn from(state: &'a MatchState) -> Self {
        Self {
            grid: &state.grid,
            ball: &state.ball,
            players: &state.players,
            phase: state.phase,
            remaining: state.timer.remaining(),
            round: state.round,
            frame: state.frame,
            cell_size: state.settings.cell_size,
        }
    }
}

impl FrameView<'_> {
    pub fn scores(&self) -> (u32, u32) {
        (self.players[0].score, self.players[1].score)
    }

    /// Live cells in row-major order, tinted by the zone they sit in
    pub fn cell_sprites(&self) -> impl Iterator<Item = CellSprite> + '_ {
        let width = self.grid.width() as i32;
        let height = self.grid.height() as i32;
        (0..height)
            .flat_map(move |y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.grid.is_alive(x, y))
            .map(|(x, y)| CellSprite {
                center: cell_center(x, y, self.cell_size),
                health: self.grid.health_ratio(x, y),
                color: self
                    .players
                    .iter()
                    .find(|p| p.zone().contains(x))
                    .map_or(NEUTRAL_CELL_COLOR, |p| p.color),
            })
    }
}

/// Anything that can present a frame
pub trait Renderer {
    fn render(&mut self, view: &FrameView<'_>);
}

/// Headless renderer: logs phase flips and score changes
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_phase: Option<MatchPhase>,
    last_scores: (u32, u32),
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, view: &FrameView<'_>) {
        self.frames += 1;

        if self.last_phase != Some(view.phase) {
            match view.phase {
                MatchPhase::Placement => log::info!(
                    "Round {}: placement ({:.0}s)",
                    view.round + 1,
                    view.remaining
                ),
                MatchPhase::Playing => log::info!(
                    "Round {}: playing with {} live cells",
                    view.round + 1,
                    view.grid.population()
                ),
            }
            self.last_phase = Some(view.phase);
        }

        let scores = view.scores();
        if scores != self.last_scores {
            log::info!("Score {} - {}", scores.0, scores.1);
            self.last_scores = scores;
        }

        log::trace!(
            "frame {} ball ({:.1}, {:.1}) speed {:.2}",
            view.frame,
            view.ball.pos.x,
            view.ball.pos.y,
            view.ball.speed
        );
    }
}
