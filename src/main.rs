//! LifePong entry point
//!
//! Headless native runner: the idle AI builds both sides, the match plays out
//! and the log renderer reports phase flips and scores. Set `RUST_LOG=info`
//! (or `debug` for every bounce) to follow along.
//!
//! Usage: `life-pong [rounds] [seed]`

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use life_pong::Settings;
use life_pong::persistence::{FileStore, GridStore, load_or_empty};
use life_pong::platform::{Clock, SystemClock};
use life_pong::renderer::{FrameView, LogRenderer, Renderer};
use life_pong::sim::{MatchEvent, MatchState, TickInput, tick};

/// Rounds to play when none are given on the command line
const DEFAULT_ROUNDS: u32 = 3;

/// Game instance holding all state
struct Game {
    state: MatchState,
    renderer: LogRenderer,
    clock: SystemClock,
    store: FileStore,
    input: TickInput,
    /// Quit once this many rounds have been played
    rounds: u32,
}

impl Game {
    fn new(settings: Settings, seed: u64, rounds: u32) -> Self {
        let store = FileStore::default();
        let mut state = MatchState::new(settings, seed);

        if state.settings.resume_saved_arena {
            let s = &state.settings;
            let saved = load_or_empty(&store, s.grid_width(), s.grid_height(), s.cell_max_health);
            if saved.population() > 0 && !state.resume_arena(&saved.snapshot()) {
                log::warn!("Saved arena was not resumed, starting empty");
            }
        }

        Self {
            state,
            renderer: LogRenderer::new(),
            clock: SystemClock::new(),
            store,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            rounds,
        }
    }

    /// Run one frame
    fn update(&mut self) {
        if self.state.round >= self.rounds {
            self.input.quit = true;
        }
        tick(&mut self.state, &self.input, self.clock.now_ms());

        // Auto-save the arena each time a round locks in
        let locked_in = self
            .state
            .events
            .iter()
            .any(|e| matches!(e, MatchEvent::LockedIn { .. }));
        if locked_in
            && let Some(snapshot) = &self.state.snapshot
            && let Err(e) = self.store.save(snapshot)
        {
            log::warn!("Could not save arena: {e}");
        }
    }

    fn render(&mut self) {
        self.renderer.render(&FrameView::from(&self.state));
    }
}

fn main() {
    env_logger::init();
    log::info!("LifePong (native) starting...");

    let mut args = std::env::args().skip(1);
    let rounds = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(DEFAULT_ROUNDS);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let settings = Settings::load();
    let frame_time = Duration::from_secs_f64(1.0 / settings.fps.max(1) as f64);
    let mut game = Game::new(settings, seed, rounds);
    log::info!("Game initialized with seed: {}", seed);

    while !game.input.quit {
        let started = game.clock.now_ms();
        game.update();
        game.render();

        let spent = Duration::from_millis(game.clock.now_ms().saturating_sub(started));
        if let Some(rest) = frame_time.checked_sub(spent) {
            thread::sleep(rest);
        }
    }

    let (left, right) = (game.state.players[0].score, game.state.players[1].score);
    log::info!(
        "Match over after {} rounds ({} frames): {} - {}",
        game.state.round,
        game.renderer.frames(),
        left,
        right
    );
    println!("Final score: {left} - {right}");
}
