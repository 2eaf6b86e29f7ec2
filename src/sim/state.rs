//! Match state and core simulation types
//!
//! Everything the match mutates lives in [`MatchState`]; the frame loop owns
//! exactly one of these and nothing else writes to it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Wall;
use super::grid::{GridSnapshot, LifeGrid};
use super::placement::{EditAction, EditRejection, PlacementLimiter, PlacementTimer, Zone};
use crate::Settings;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Players build their side of the grid
    Placement,
    /// Ball in play, grid evolving
    Playing,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// The ball
///
/// `speed` is the intended velocity magnitude; every velocity change is
/// followed by [`Ball::normalize_velocity`] so `|vel| == speed`.
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    pub radius: f32,
    /// Frames left before another cell collision may register
    pub collision_cooldown: u32,
    base_speed: f32,
    max_speed: f32,
    acceleration: f32,
    cooldown_frames: u32,
    launch_jitter: f32,
    trail_length: usize,
    /// Trail history for rendering (newest first)
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            speed: settings.ball_base_speed,
            radius: settings.ball_radius,
            collision_cooldown: 0,
            base_speed: settings.ball_base_speed,
            max_speed: settings.ball_max_speed,
            acceleration: settings.ball_acceleration,
            cooldown_frames: settings.collision_cooldown,
            launch_jitter: settings.launch_angle_jitter,
            trail_length: settings.trail_length,
            trail: Vec::with_capacity(settings.trail_length),
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Recenter at base speed with a fresh random heading
    pub fn reset<R: Rng + ?Sized>(&mut self, pos: Vec2, rng: &mut R) {
        self.pos = pos;
        self.speed = self.base_speed;

        let angle = rng.random_range(-self.launch_jitter..=self.launch_jitter);
        let horizontal = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let vertical = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(
            horizontal * self.speed * angle.cos(),
            vertical * self.speed * angle.sin(),
        );
        self.collision_cooldown = 0;
        self.clear_trail();
    }

    /// Eight perimeter probes at 45° steps starting from 0°
    ///
    /// The order is fixed: when several probes touch live cells, the first wins.
    pub fn collision_points(&self) -> [Vec2; 8] {
        std::array::from_fn(|i| {
            let angle = (i as f32 * 45.0).to_radians();
            self.pos + Vec2::new(angle.cos(), angle.sin()) * self.radius
        })
    }

    /// Rescale velocity to `speed` (no-op for a zero vector)
    pub fn normalize_velocity(&mut self) {
        let current = self.vel.length();
        if current > 0.0 {
            self.vel = self.vel / current * self.speed;
        }
    }

    /// Raise speed by `amount` (default: configured step), capped at max speed
    pub fn accelerate(&mut self, amount: Option<f32>) {
        let amount = amount.unwrap_or(self.acceleration);
        self.speed = (self.speed + amount).min(self.max_speed);
        self.normalize_velocity();
    }

    /// Integrate one frame
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.collision_cooldown = self.collision_cooldown.saturating_sub(1);
        self.record_trail();
    }

    pub fn can_collide(&self) -> bool {
        self.collision_cooldown == 0
    }

    pub fn set_collision_cooldown(&mut self) {
        self.collision_cooldown = self.cooldown_frames;
    }

    /// Record current position to trail
    pub fn record_trail(&mut self) {
        if self.trail_length == 0 {
            return;
        }
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.pos,
                speed: self.speed,
            },
        );
        self.trail.truncate(self.trail_length);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// Which side a player defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    /// Left zone
    One,
    /// Right zone
    Two,
}

impl PlayerId {
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

/// A player: score plus placement authority
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    /// RGB, presentation only
    pub color: [u8; 3],
    pub score: u32,
    pub limiter: PlacementLimiter,
}

pub const PLAYER_ONE_COLOR: [u8; 3] = [0, 255, 255];
pub const PLAYER_TWO_COLOR: [u8; 3] = [255, 16, 240];

impl Player {
    pub fn new(id: PlayerId, color: [u8; 3], zone: Zone, settings: &Settings) -> Self {
        Self {
            id,
            color,
            score: 0,
            limiter: PlacementLimiter::new(zone, settings.starting_cells, settings.max_cells),
        }
    }

    pub fn bank(&self) -> u32 {
        self.limiter.bank()
    }

    pub fn zone(&self) -> Zone {
        self.limiter.zone()
    }
}

/// Feedback for presentation layers, rebuilt every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchEvent {
    /// A player edited the grid
    Edited {
        player: PlayerId,
        action: EditAction,
        x: i32,
        y: i32,
    },
    /// Placement ended and the grid was snapshotted
    LockedIn { manual: bool },
    /// Ball bounced off the top or bottom wall
    WallBounce { wall: Wall },
    /// Ball struck a live cell
    CellHit {
        cell_x: i32,
        cell_y: i32,
        destroyed: bool,
    },
    /// A player scored
    Scored { player: PlayerId, score: u32 },
    /// Grid restored and a new placement phase begun
    RoundReset { round: u32 },
}

/// Pointer drag state during placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub held: bool,
    /// Decided on press from the pressed cell; kept across presses elsewhere
    pub mode: EditAction,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub settings: Settings,
    /// Seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Frame counter (every tick, any phase)
    pub frame: u64,
    /// Rounds completed
    pub round: u32,
    pub phase: MatchPhase,
    pub grid: LifeGrid,
    /// Grid as it stood at the last lock-in
    pub snapshot: Option<GridSnapshot>,
    pub ball: Ball,
    pub players: [Player; 2],
    pub timer: PlacementTimer,
    pub pointer: PointerState,
    /// Events produced by the latest tick
    pub events: Vec<MatchEvent>,
}

impl MatchState {
    /// Create a match in the placement phase
    pub fn new(settings: Settings, seed: u64) -> Self {
        let grid = LifeGrid::new(
            settings.grid_width(),
            settings.grid_height(),
            settings.cell_max_health,
        );
        let (l_start, l_end) = settings.left_zone();
        let (r_start, r_end) = settings.right_zone();
        let players = [
            Player::new(PlayerId::One, PLAYER_ONE_COLOR, Zone::new(l_start, l_end), &settings),
            Player::new(PlayerId::Two, PLAYER_TWO_COLOR, Zone::new(r_start, r_end), &settings),
        ];
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ball = Ball::new(&settings);
        ball.reset(screen_center(&settings), &mut rng);

        Self {
            timer: PlacementTimer::new(settings.placement_time_secs),
            settings,
            seed,
            rng,
            frame: 0,
            round: 0,
            phase: MatchPhase::Placement,
            grid,
            snapshot: None,
            ball,
            players,
            pointer: PointerState::default(),
            events: Vec::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// Owner of the zone containing column `x`
    pub fn player_for_column(&self, x: i32) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.limiter.is_in_zone(x))
            .map(|p| p.id)
    }

    pub fn screen_center(&self) -> Vec2 {
        screen_center(&self.settings)
    }

    /// Edit cooldown currently in force
    pub fn edit_cooldown_ms(&self) -> u64 {
        self.timer.edit_cooldown_ms(&self.settings)
    }

    /// Attempt a grid edit on behalf of `player`
    pub fn try_edit(
        &mut self,
        player: PlayerId,
        x: i32,
        y: i32,
        action: EditAction,
        now_ms: u64,
    ) -> Result<EditAction, EditRejection> {
        if self.phase != MatchPhase::Placement {
            return Err(EditRejection::NotPlacing);
        }
        let cooldown_ms = self.edit_cooldown_ms();
        let limiter = &mut self.players[player.index()].limiter;
        match limiter.try_edit(&mut self.grid, x, y, action, now_ms, cooldown_ms) {
            Ok(action) => {
                self.events.push(MatchEvent::Edited {
                    player,
                    action,
                    x,
                    y,
                });
                Ok(action)
            }
            Err(reason) => {
                log::trace!("{player:?} {action:?} at ({x}, {y}) rejected: {reason:?}");
                Err(reason)
            }
        }
    }

    /// Put a previously saved arena on the board before the first round
    ///
    /// Only allowed before any edit of the first round. Cells outside both
    /// zones are dropped, each zone keeps at most a starting bank's worth of
    /// cells (row-major), and the bank is recomputed so bank plus on-board
    /// cells equals a fresh start.
    pub fn resume_arena(&mut self, snapshot: &GridSnapshot) -> bool {
        let edited = self.players.iter().any(|p| p.limiter.last_edit_ms().is_some());
        if self.phase != MatchPhase::Placement || self.round != 0 || edited {
            log::warn!("Saved arena can only be resumed before the first edit");
            return false;
        }
        if !self.grid.restore(snapshot) {
            return false;
        }

        let zones: Vec<Zone> = self.players.iter().map(Player::zone).collect();
        for x in 0..self.grid.width() as i32 {
            if zones.iter().any(|z| z.contains(x)) {
                continue;
            }
            for y in 0..self.grid.height() as i32 {
                self.grid.set(x, y, 0);
            }
        }

        let budget = self.settings.starting_cells.min(self.settings.max_cells);
        let height = self.grid.height() as i32;
        for player in &mut self.players {
            let zone = player.zone();
            let mut kept = 0;
            for y in 0..height {
                for x in zone.start as i32..zone.end as i32 {
                    if !self.grid.is_alive(x, y) {
                        continue;
                    }
                    if kept < budget {
                        kept += 1;
                    } else {
                        self.grid.set(x, y, 0);
                    }
                }
            }
            player.limiter.set_bank(budget - kept);
        }
        log::info!("Resumed saved arena ({} cells)", self.grid.population());
        true
    }
}

/// Screen center for ball serves
pub fn screen_center(settings: &Settings) -> Vec2 {
    Vec2::new(
        (settings.screen_width / 2) as f32,
        (settings.screen_height / 2) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> Ball {
        Ball::new(&Settings::default())
    }

    #[test]
    fn test_reset_speed_and_heading() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut b = ball();
        b.speed = 11.0;
        b.collision_cooldown = 3;
        b.trail.push(TrailPoint {
            pos: Vec2::ONE,
            speed: 1.0,
        });

        for _ in 0..50 {
            b.reset(Vec2::new(600.0, 300.0), &mut rng);
            assert_eq!(b.pos, Vec2::new(600.0, 300.0));
            assert_eq!(b.speed, 6.0);
            assert!((b.vel.length() - 6.0).abs() < 1e-4);
            // Heading stays within the launch cone around the horizontal
            assert!(b.vel.y.abs() <= 6.0 * 0.4_f32.sin() + 1e-4);
            assert_eq!(b.collision_cooldown, 0);
            assert!(b.trail.is_empty());
        }
    }

    #[test]
    fn test_collision_points_order() {
        let mut b = ball();
        b.pos = Vec2::new(100.0, 50.0);
        let points = b.collision_points();
        let r = b.radius;
        assert!((points[0] - Vec2::new(100.0 + r, 50.0)).length() < 1e-4);
        assert!((points[2] - Vec2::new(100.0, 50.0 + r)).length() < 1e-4);
        assert!((points[4] - Vec2::new(100.0 - r, 50.0)).length() < 1e-4);
        assert!((points[6] - Vec2::new(100.0, 50.0 - r)).length() < 1e-4);
        let diag = r * std::f32::consts::FRAC_1_SQRT_2;
        assert!((points[1] - Vec2::new(100.0 + diag, 50.0 + diag)).length() < 1e-4);
    }

    #[test]
    fn test_normalize_velocity() {
        let mut b = ball();
        b.vel = Vec2::new(3.0, 4.0);
        b.speed = 10.0;
        b.normalize_velocity();
        assert!((b.vel - Vec2::new(6.0, 8.0)).length() < 1e-5);

        b.vel = Vec2::ZERO;
        b.normalize_velocity();
        assert_eq!(b.vel, Vec2::ZERO);
    }

    #[test]
    fn test_accelerate_caps_at_max() {
        let mut b = ball();
        b.vel = Vec2::new(6.0, 0.0);
        b.accelerate(None);
        assert!((b.speed - 6.15).abs() < 1e-5);
        assert!((b.vel.length() - b.speed).abs() < 1e-5);

        b.accelerate(Some(100.0));
        assert_eq!(b.speed, 12.0);
        assert!((b.vel.x - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_update_moves_and_cools_down() {
        let mut b = ball();
        b.pos = Vec2::new(10.0, 10.0);
        b.vel = Vec2::new(2.0, -1.0);
        b.set_collision_cooldown();
        assert!(!b.can_collide());
        for _ in 0..5 {
            b.update();
        }
        assert_eq!(b.pos, Vec2::new(20.0, 5.0));
        assert!(b.can_collide());
        b.update();
        assert_eq!(b.collision_cooldown, 0);
        assert_eq!(b.trail.len(), 6);
        assert_eq!(b.trail[0].pos, b.pos);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut b = ball();
        b.vel = Vec2::X;
        for _ in 0..40 {
            b.update();
        }
        assert_eq!(b.trail.len(), Settings::default().trail_length);
    }

    #[test]
    fn test_new_match_layout() {
        let state = MatchState::new(Settings::default(), 1);
        assert_eq!(state.phase, MatchPhase::Placement);
        assert_eq!(state.player(PlayerId::One).bank(), 40);
        assert_eq!(state.player(PlayerId::Two).zone(), Zone::new(80, 120));
        assert_eq!(state.player_for_column(0), Some(PlayerId::One));
        assert_eq!(state.player_for_column(60), None);
        assert_eq!(state.player_for_column(119), Some(PlayerId::Two));
        assert_eq!(state.player_for_column(120), None);
    }

    #[test]
    fn test_same_seed_same_serve() {
        let a = MatchState::new(Settings::default(), 99);
        let b = MatchState::new(Settings::default(), 99);
        assert_eq!(a.ball.vel, b.ball.vel);
    }

    #[test]
    fn test_edits_only_during_placement() {
        let mut state = MatchState::new(Settings::default(), 1);
        assert!(state.try_edit(PlayerId::One, 3, 3, EditAction::Add, 0).is_ok());
        assert_eq!(state.events.len(), 1);

        state.phase = MatchPhase::Playing;
        assert_eq!(
            state.try_edit(PlayerId::One, 4, 4, EditAction::Add, 10_000),
            Err(EditRejection::NotPlacing)
        );
        assert!(!state.grid.is_alive(4, 4));
    }

    #[test]
    fn test_resume_arena_charges_banks() {
        let settings = Settings::default();
        let mut source = LifeGrid::new(settings.grid_width(), settings.grid_height(), 3);
        source.place(1, 1);
        source.place(2, 1);
        source.place(100, 5);
        // Outside both zones: dropped on resume
        source.place(60, 30);

        let mut state = MatchState::new(settings, 5);
        assert!(state.resume_arena(&source.snapshot()));
        assert_eq!(state.player(PlayerId::One).bank(), 38);
        assert_eq!(state.player(PlayerId::Two).bank(), 39);
        assert!(!state.grid.is_alive(60, 30));
        assert_eq!(state.grid.population(), 3);
    }

    #[test]
    fn test_resume_arena_trims_oversized_zone() {
        let settings = Settings::default();
        let mut source = LifeGrid::new(settings.grid_width(), settings.grid_height(), 3);
        // 60 cells in player one's zone, as after a topped-up second round
        for y in 0..6 {
            for x in 0..10 {
                source.place(x, y);
            }
        }

        let mut state = MatchState::new(settings, 5);
        assert!(state.resume_arena(&source.snapshot()));
        let p1 = state.player(PlayerId::One);
        let on_board = state.grid.live_cells_in_columns(0, 40) as u32;
        assert_eq!(on_board, 40);
        assert_eq!(p1.bank() + on_board, 40);
        // Row-major: the first four rows survive, the rest are trimmed
        assert!(state.grid.is_alive(9, 3));
        assert!(!state.grid.is_alive(0, 4));
    }

    #[test]
    fn test_resume_arena_refused_after_edits() {
        let settings = Settings::default();
        let mut source = LifeGrid::new(settings.grid_width(), settings.grid_height(), 3);
        source.place(2, 2);

        let mut state = MatchState::new(settings.clone(), 5);
        state.try_edit(PlayerId::One, 1, 1, EditAction::Add, 0).unwrap();
        assert!(!state.resume_arena(&source.snapshot()));
        assert!(state.grid.is_alive(1, 1));
        assert!(!state.grid.is_alive(2, 2));
        let on_board = state.grid.live_cells_in_columns(0, 40) as u32;
        assert_eq!(state.player(PlayerId::One).bank() + on_board, 40);

        let mut later = MatchState::new(settings, 5);
        later.round = 1;
        assert!(!later.resume_arena(&source.snapshot()));
        assert_eq!(later.grid.population(), 0);
    }
}
