//! Property-based tests for match mechanics.
//!
//! These tests verify the placement economy, edit rate limiting, ball speed
//! and automaton health rules hold for arbitrary inputs.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use life_pong::Settings;
use life_pong::sim::{
    EditAction, LifeGrid, MatchPhase, MatchState, PlayerId, TickInput, lock_in, tick,
};

fn edit_strategy() -> impl Strategy<Value = (PlayerId, i32, i32, EditAction, u64)> {
    (
        prop_oneof![Just(PlayerId::One), Just(PlayerId::Two)],
        -5i32..125,
        -2i32..62,
        prop_oneof![Just(EditAction::Add), Just(EditAction::Remove)],
        0u64..200,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Bank plus on-board cells in a zone never changes while placing.
    #[test]
    fn prop_bank_conservation(edits in prop::collection::vec(edit_strategy(), 0..300)) {
        let mut state = MatchState::new(Settings::default(), 1);
        let starting = state.settings.starting_cells;
        let max = state.settings.max_cells;
        let mut now = 0;

        for (player, x, y, action, gap) in edits {
            now += gap;
            let _ = state.try_edit(player, x, y, action, now);

            for p in &state.players {
                let zone = p.zone();
                let on_board = state.grid.live_cells_in_columns(zone.start, zone.end) as u32;
                prop_assert_eq!(p.bank() + on_board, starting);
                prop_assert!(p.bank() <= max);
            }
            // The neutral band is never written by an edit
            prop_assert_eq!(state.grid.live_cells_in_columns(40, 80), 0);
        }
    }

    /// Resuming any saved arena leaves bank plus on-board cells at the starting bank.
    #[test]
    fn prop_resume_conserves_banks(
        cells in prop::collection::vec((0i32..120, 0i32..60), 0..400)
    ) {
        let settings = Settings::default();
        let mut saved = LifeGrid::new(settings.grid_width(), settings.grid_height(), 3);
        for (x, y) in cells {
            saved.place(x, y);
        }
        let mut state = MatchState::new(settings, 3);
        prop_assert!(state.resume_arena(&saved.snapshot()));

        for p in &state.players {
            let zone = p.zone();
            let on_board = state.grid.live_cells_in_columns(zone.start, zone.end) as u32;
            prop_assert_eq!(p.bank() + on_board, 40);
        }
        prop_assert_eq!(state.grid.live_cells_in_columns(40, 80), 0);
    }

    /// Two accepted edits by one player are never closer than the cooldown.
    #[test]
    fn prop_edits_rate_limited(
        attempts in prop::collection::vec((0u64..80, 0i32..40, 0i32..60, any::<bool>()), 1..200)
    ) {
        let mut state = MatchState::new(Settings::default(), 2);
        let cooldown = state.edit_cooldown_ms();
        let mut now = 0;
        let mut last_ok: Option<u64> = None;

        for (gap, x, y, add) in attempts {
            now += gap;
            let action = if add { EditAction::Add } else { EditAction::Remove };
            if state.try_edit(PlayerId::One, x, y, action, now).is_ok() {
                if let Some(last) = last_ok {
                    prop_assert!(now - last >= cooldown);
                }
                last_ok = Some(now);
            }
        }
    }

    /// Velocity magnitude tracks speed, and speed stays capped, through any bounce sequence.
    #[test]
    fn prop_speed_invariant(
        seed in any::<u64>(),
        cells in prop::collection::vec((0i32..120, 0i32..60), 0..600),
        frames in 1usize..600
    ) {
        let mut state = MatchState::new(Settings::default(), seed);
        for (x, y) in cells {
            state.grid.place(x, y);
        }
        lock_in(&mut state, true);

        for _ in 0..frames {
            tick(&mut state, &TickInput::default(), 0);
            if state.phase != MatchPhase::Playing {
                break;
            }
            let ball = &state.ball;
            prop_assert!((ball.vel.length() - ball.speed).abs() < 1e-3);
            prop_assert!(ball.speed <= ball.max_speed() + 1e-6);
            prop_assert!(ball.pos.is_finite());
        }
    }

    /// Survivors keep their health, births start at max health.
    #[test]
    fn prop_step_health_rules(
        cells in prop::collection::vec((0i32..16, 0i32..12, 1u8..=3), 0..120)
    ) {
        let mut grid = LifeGrid::new(16, 12, 3);
        for (x, y, health) in cells {
            grid.set(x, y, health);
        }
        let before = grid.clone();
        grid.step();

        for y in 0..12 {
            for x in 0..16 {
                let (was, now) = (before.get(x, y), grid.get(x, y));
                prop_assert_eq!(now, before.next_health(x, y));
                if was > 0 && now > 0 {
                    prop_assert_eq!(now, was);
                } else if was == 0 && now > 0 {
                    prop_assert_eq!(now, 3);
                }
            }
        }
    }
}
