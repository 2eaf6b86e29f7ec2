//! Conway's Game of Life grid with per-cell health
//!
//! Cells store health: 0 = dead, 1..=max_health = alive with that many hit
//! points. Neighbor lookups wrap on both axes; every other coordinate access
//! is bounds-checked and treats the outside as dead.

/// Frozen copy of a grid, taken when placement locks in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl GridSnapshot {
    /// Build a snapshot from raw row-major cells
    ///
    /// Returns `None` if `cells` does not hold exactly `width * height` values.
    pub fn from_cells(width: u32, height: u32, cells: Vec<u8>) -> Option<Self> {
        if cells.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell health
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

/// The living battlefield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeGrid {
    width: u32,
    height: u32,
    max_health: u8,
    cells: Vec<u8>,
}

impl LifeGrid {
    /// Create an empty grid
    pub fn new(width: u32, height: u32, max_health: u8) -> Self {
        Self {
            width,
            height,
            max_health,
            cells: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_health(&self) -> u8 {
        self.max_health
    }

    /// Row-major cell health (read-only, for renderers)
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Clear every cell
    pub fn reset(&mut self) {
        self.cells.fill(0);
    }

    /// Cell health, 0 when dead or out of bounds
    pub fn get(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(0, |i| self.cells[i])
    }

    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        self.get(x, y) > 0
    }

    /// Health as a fraction of max health
    pub fn health_ratio(&self, x: i32, y: i32) -> f32 {
        let health = self.get(x, y);
        if health == 0 || self.max_health == 0 {
            return 0.0;
        }
        health as f32 / self.max_health as f32
    }

    /// Write a health value (clamped to max health). Returns false when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value.min(self.max_health);
                true
            }
            None => false,
        }
    }

    /// Place a fresh cell at full health. Returns false when out of bounds.
    pub fn place(&mut self, x: i32, y: i32) -> bool {
        self.set(x, y, self.max_health)
    }

    /// Damage a cell. Returns `(was_hit, was_destroyed)`.
    pub fn damage(&mut self, x: i32, y: i32, amount: u8) -> (bool, bool) {
        let Some(i) = self.index(x, y) else {
            return (false, false);
        };
        let health = self.cells[i];
        if health == 0 {
            return (false, false);
        }
        let remaining = health.saturating_sub(amount);
        self.cells[i] = remaining;
        (true, remaining == 0)
    }

    /// Live neighbors of a cell, wrapping on both axes
    pub fn count_neighbors(&self, x: i32, y: i32) -> u8 {
        let w = self.width as i32;
        let h = self.height as i32;
        if w == 0 || h == 0 {
            return 0;
        }
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x + dx).rem_euclid(w);
                let ny = (y + dy).rem_euclid(h);
                if self.cells[ny as usize * self.width as usize + nx as usize] > 0 {
                    count += 1;
                }
            }
        }
        count
    }

    /// Health a cell will have after the next generation
    ///
    /// Survivors keep their health, births start at max health.
    pub fn next_health(&self, x: i32, y: i32) -> u8 {
        let current = self.get(x, y);
        match (current, self.count_neighbors(x, y)) {
            (0, 3) => self.max_health,
            (0, _) => 0,
            (_, 2 | 3) => current,
            _ => 0,
        }
    }

    /// Advance one generation. Reads only the current buffer.
    pub fn step(&mut self) {
        let mut next = vec![0; self.cells.len()];
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                next[y as usize * self.width as usize + x as usize] = self.next_health(x, y);
            }
        }
        self.cells = next;
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Live cells in the column range `[start, end)`
    pub fn live_cells_in_columns(&self, start: u32, end: u32) -> usize {
        let end = end.min(self.width);
        if start >= end {
            return 0;
        }
        self.cells
            .chunks(self.width as usize)
            .map(|row| {
                row[start as usize..end as usize]
                    .iter()
                    .filter(|&&c| c > 0)
                    .count()
            })
            .sum()
    }

    /// Copy the current cells into an immutable snapshot
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.width,
            height: self.height,
            cells: self.cells.clone(),
        }
    }

    /// Replace the grid with a snapshot's cells
    ///
    /// A snapshot of different dimensions leaves the grid cleared and returns false.
    pub fn restore(&mut self, snapshot: &GridSnapshot) -> bool {
        self.reset();
        if snapshot.width != self.width || snapshot.height != self.height {
            log::warn!(
                "Snapshot is {}x{}, grid is {}x{}; starting empty",
                snapshot.width,
                snapshot.height,
                self.width,
                self.height
            );
            return false;
        }
        for (cell, &saved) in self.cells.iter_mut().zip(&snapshot.cells) {
            *cell = saved.min(self.max_health);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(width: u32, height: u32, live: &[(i32, i32)]) -> LifeGrid {
        let mut grid = LifeGrid::new(width, height, 3);
        for &(x, y) in live {
            grid.place(x, y);
        }
        grid
    }

    fn live_cells(grid: &LifeGrid) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                if grid.is_alive(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_out_of_bounds_is_dead_and_inert() {
        let mut grid = LifeGrid::new(4, 4, 3);
        assert_eq!(grid.get(-1, 0), 0);
        assert_eq!(grid.get(4, 0), 0);
        assert!(!grid.is_alive(0, 99));
        assert!(!grid.set(-1, -1, 2));
        assert!(!grid.place(4, 4));
        assert_eq!(grid.damage(10, 10, 1), (false, false));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_set_clamps_to_max_health() {
        let mut grid = LifeGrid::new(2, 2, 3);
        assert!(grid.set(1, 1, 200));
        assert_eq!(grid.get(1, 1), 3);
        assert!((grid.health_ratio(1, 1) - 1.0).abs() < f32::EPSILON);
        grid.set(1, 1, 1);
        assert!((grid.health_ratio(1, 1) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(grid.health_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_damage_semantics() {
        let mut grid = LifeGrid::new(3, 3, 3);
        assert_eq!(grid.damage(1, 1, 1), (false, false));
        assert_eq!(grid.get(1, 1), 0);

        grid.place(1, 1);
        assert_eq!(grid.damage(1, 1, 1), (true, false));
        assert_eq!(grid.get(1, 1), 2);
        assert_eq!(grid.damage(1, 1, 5), (true, true));
        assert_eq!(grid.get(1, 1), 0);

        grid.place(0, 0);
        assert_eq!(grid.damage(0, 0, 3), (true, true));
    }

    #[test]
    fn test_neighbors_wrap() {
        let grid = grid_with(5, 5, &[(4, 4), (0, 4), (4, 0)]);
        assert_eq!(grid.count_neighbors(0, 0), 3);
        // Health magnitude does not weight the count
        let mut weak = grid.clone();
        weak.set(4, 4, 1);
        assert_eq!(weak.count_neighbors(0, 0), 3);
    }

    #[test]
    fn test_isolated_cell_dies() {
        let mut grid = grid_with(3, 3, &[(1, 1)]);
        grid.step();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_blinker_period_two() {
        let horizontal = [(1, 2), (2, 2), (3, 2)];
        let mut grid = grid_with(5, 5, &horizontal);
        grid.step();
        assert_eq!(live_cells(&grid), vec![(2, 1), (2, 2), (2, 3)]);
        grid.step();
        assert_eq!(live_cells(&grid), horizontal.to_vec());
    }

    #[test]
    fn test_blinker_across_wrap_seam() {
        let mut grid = grid_with(5, 5, &[(4, 0), (0, 0), (1, 0)]);
        grid.step();
        assert_eq!(live_cells(&grid), vec![(0, 0), (0, 1), (0, 4)]);
        grid.step();
        assert_eq!(live_cells(&grid), vec![(0, 0), (1, 0), (4, 0)]);
    }

    #[test]
    fn test_three_by_three_torus_line_fills_then_dies() {
        // Every cell on a 3x3 torus neighbors all eight others
        let mut grid = grid_with(3, 3, &[(0, 1), (1, 1), (2, 1)]);
        grid.step();
        assert_eq!(grid.population(), 9);
        grid.step();
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_survivors_keep_health_births_are_full() {
        let mut grid = grid_with(6, 6, &[(1, 1), (2, 1), (1, 2), (2, 2)]);
        grid.set(1, 1, 1);
        grid.set(2, 2, 2);
        grid.step();
        assert_eq!(grid.get(1, 1), 1);
        assert_eq!(grid.get(2, 2), 2);
        assert_eq!(grid.get(2, 1), 3);

        let mut line = grid_with(6, 6, &[(0, 1), (1, 1), (2, 1)]);
        line.set(0, 1, 1);
        line.step();
        assert_eq!(line.get(1, 0), 3);
        assert_eq!(line.get(1, 2), 3);
    }

    #[test]
    fn test_step_is_deterministic_and_order_independent() {
        let seed = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2), (5, 5), (6, 5), (7, 5), (9, 9)];
        let mut grid = grid_with(10, 10, &seed);
        grid.set(2, 1, 1);

        let mut a = grid.clone();
        let mut b = grid.clone();
        a.step();
        b.step();
        assert_eq!(a, b);

        // Assemble the next generation in several visiting orders
        let coords: Vec<(i32, i32)> = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .collect();
        let mut orders = vec![coords.clone()];
        orders.push(coords.iter().rev().copied().collect());
        let mut columns = coords.clone();
        columns.sort_by_key(|&(x, y)| (x, y));
        orders.push(columns);
        let mut strided = coords.clone();
        strided.sort_by_key(|&(x, y)| ((x * 7 + y * 3) % 11, x, y));
        orders.push(strided);

        for order in orders {
            let mut manual = LifeGrid::new(10, 10, 3);
            for &(x, y) in &order {
                manual.set(x, y, grid.next_health(x, y));
            }
            assert_eq!(manual, a);
        }
    }

    #[test]
    fn test_live_cells_in_columns() {
        let grid = grid_with(6, 2, &[(0, 0), (1, 1), (4, 0), (5, 1)]);
        assert_eq!(grid.live_cells_in_columns(0, 2), 2);
        assert_eq!(grid.live_cells_in_columns(4, 6), 2);
        assert_eq!(grid.live_cells_in_columns(2, 4), 0);
        assert_eq!(grid.live_cells_in_columns(4, 99), 2);
    }

    #[test]
    fn test_snapshot_restore_discards_later_changes() {
        let mut grid = grid_with(4, 4, &[(0, 0), (1, 1)]);
        let snapshot = grid.snapshot();
        grid.damage(0, 0, 2);
        grid.place(3, 3);
        grid.step();

        assert!(grid.restore(&snapshot));
        assert_eq!(grid.snapshot(), snapshot);
        assert_eq!(grid.get(0, 0), 3);
    }

    #[test]
    fn test_restore_rejects_mismatched_snapshot() {
        let mut grid = grid_with(4, 4, &[(0, 0)]);
        let other = LifeGrid::new(5, 5, 3).snapshot();
        assert!(!grid.restore(&other));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_snapshot_from_cells_checks_length() {
        assert!(GridSnapshot::from_cells(2, 2, vec![0; 4]).is_some());
        assert!(GridSnapshot::from_cells(2, 2, vec![0; 3]).is_none());
    }
}
