//! Placement phase rules
//!
//! Each player builds inside an exclusive column zone, spending cells from a
//! bank, throttled by a personal edit cooldown whose length depends on how
//! far into the placement window the match is.

use super::grid::LifeGrid;
use crate::Settings;

/// Half-open column range `[start, end)` owned by one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub start: u32,
    pub end: u32,
}

impl Zone {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, x: i32) -> bool {
        x >= 0 && (self.start..self.end).contains(&(x as u32))
    }

    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// A single grid edit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditAction {
    /// Spend one bank unit to place a full-health cell on an empty square
    #[default]
    Add,
    /// Clear a live cell and return one unit to the bank
    Remove,
}

/// Why an edit attempt was dropped. Rejections never change any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRejection {
    /// The match is not in the placement phase
    NotPlacing,
    /// Column is outside the acting player's zone
    OutOfZone,
    /// Row (or column) is outside the grid
    OutOfBounds,
    /// Add onto a live cell
    Occupied,
    /// Remove from an empty square
    Empty,
    /// Add with nothing left in the bank
    BankEmpty,
    /// Remove while the bank is already at its cap
    BankFull,
    /// Too soon after the previous accepted edit
    OnCooldown,
}

/// Per-player edit authority: zone, bank and cooldown clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementLimiter {
    zone: Zone,
    bank: u32,
    max_bank: u32,
    /// Wall-clock ms of the last accepted edit (None = never)
    last_edit_ms: Option<u64>,
}

impl PlacementLimiter {
    pub fn new(zone: Zone, bank: u32, max_bank: u32) -> Self {
        Self {
            zone,
            bank: bank.min(max_bank),
            max_bank,
            last_edit_ms: None,
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn bank(&self) -> u32 {
        self.bank
    }

    pub fn max_bank(&self) -> u32 {
        self.max_bank
    }

    pub fn last_edit_ms(&self) -> Option<u64> {
        self.last_edit_ms
    }

    pub fn can_place(&self) -> bool {
        self.bank > 0
    }

    pub fn is_in_zone(&self, x: i32) -> bool {
        self.zone.contains(x)
    }

    /// True while fewer than `cooldown_ms` have passed since the last accepted edit
    pub fn is_on_cooldown(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_edit_ms {
            Some(last) => now_ms.saturating_sub(last) < cooldown_ms,
            None => false,
        }
    }

    /// Forget the last edit so a new placement phase starts off cooldown
    pub fn reset_edit_cooldown(&mut self) {
        self.last_edit_ms = None;
    }

    /// Add cells to the bank, capped at the maximum
    pub fn top_up(&mut self, amount: u32) {
        self.bank = self.bank.saturating_add(amount).min(self.max_bank);
    }

    /// Overwrite the bank, capped at the maximum
    pub fn set_bank(&mut self, amount: u32) {
        self.bank = amount.min(self.max_bank);
    }

    /// Attempt one edit. On success the grid and bank change together and the
    /// cooldown clock restarts; on rejection nothing changes.
    pub fn try_edit(
        &mut self,
        grid: &mut LifeGrid,
        x: i32,
        y: i32,
        action: EditAction,
        now_ms: u64,
        cooldown_ms: u64,
    ) -> Result<EditAction, EditRejection> {
        if !self.is_in_zone(x) {
            return Err(EditRejection::OutOfZone);
        }
        if y < 0 || y >= grid.height() as i32 || x >= grid.width() as i32 {
            return Err(EditRejection::OutOfBounds);
        }

        let occupied = grid.is_alive(x, y);
        match action {
            EditAction::Add if occupied => return Err(EditRejection::Occupied),
            EditAction::Add if !self.can_place() => return Err(EditRejection::BankEmpty),
            EditAction::Remove if !occupied => return Err(EditRejection::Empty),
            EditAction::Remove if self.bank >= self.max_bank => {
                return Err(EditRejection::BankFull);
            }
            _ => {}
        }

        if self.is_on_cooldown(now_ms, cooldown_ms) {
            return Err(EditRejection::OnCooldown);
        }

        match action {
            EditAction::Add => {
                grid.place(x, y);
                self.bank -= 1;
            }
            EditAction::Remove => {
                grid.set(x, y, 0);
                self.bank += 1;
            }
        }
        self.last_edit_ms = Some(now_ms);
        Ok(action)
    }
}

/// Wall-clock countdown for the placement window
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementTimer {
    start_ms: Option<u64>,
    remaining: f32,
    window_secs: f32,
}

impl PlacementTimer {
    pub fn new(window_secs: f32) -> Self {
        Self {
            start_ms: None,
            remaining: window_secs,
            window_secs,
        }
    }

    /// Seconds left in the window
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn window_secs(&self) -> f32 {
        self.window_secs
    }

    pub fn is_armed(&self) -> bool {
        self.start_ms.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advance from the wall clock, arming on the first call. Returns true once expired.
    pub fn update(&mut self, now_ms: u64) -> bool {
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start) as f32 / 1000.0;
        self.remaining = (self.window_secs - elapsed).max(0.0);
        self.is_expired()
    }

    /// Drop the start reference so the countdown re-arms on the next update
    pub fn disarm(&mut self) {
        self.start_ms = None;
    }

    /// Full window again, re-armed on the next update
    pub fn restart(&mut self) {
        self.start_ms = None;
        self.remaining = self.window_secs;
    }

    /// Active edit cooldown: rapid during the opening stretch, precision afterwards
    pub fn edit_cooldown_ms(&self, settings: &Settings) -> u64 {
        if self.remaining > self.window_secs - settings.rapid_build_secs {
            settings.rapid_cooldown_ms
        } else {
            settings.precision_cooldown_ms
        }
    }
}
