//! Collision detection and response
//!
//! The ball is probed at eight fixed perimeter points against the life grid.
//! Cell hits reflect along the dominant axis, push the ball clear of the cell,
//! deal speed-scaled damage and add a little jitter so rallies never lock
//! into a repeating path.

use glam::Vec2;
use rand::Rng;

use super::grid::LifeGrid;
use super::state::Ball;
use crate::{Settings, cell_center, consts, screen_to_cell};

/// Screen edge touched by the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Bottom,
    /// Player one's goal line
    Left,
    /// Player two's goal line
    Right,
}

/// A ball/cell contact found by [`check_grid`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCollision {
    /// Axis-aligned collision normal, pointing from the cell toward the ball
    pub normal_x: i32,
    pub normal_y: i32,
    pub cell_x: i32,
    pub cell_y: i32,
}

/// Outcome of [`handle_grid`], for feedback effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellImpact {
    pub destroyed: bool,
    pub cell_x: i32,
    pub cell_y: i32,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Damage dealt by a hit at `speed`
///
/// Base damage, +1 above 70% of max speed, another +1 above 90%.
pub fn calculate_damage(speed: f32, max_speed: f32, settings: &Settings) -> u8 {
    let mut damage = settings.ball_damage_base;
    if settings.ball_damage_speed_bonus && max_speed > 0.0 {
        let ratio = speed / max_speed;
        if ratio > consts::DAMAGE_TIER_1 {
            damage += 1;
        }
        if ratio > consts::DAMAGE_TIER_2 {
            damage += 1;
        }
    }
    damage
}

/// Check ball against the screen edges (priority: top, bottom, left, right)
pub fn check_wall(ball: &Ball, settings: &Settings) -> Option<Wall> {
    let r = ball.radius;
    let width = settings.screen_width as f32;
    let height = settings.screen_height as f32;

    if ball.pos.y - r <= 0.0 {
        Some(Wall::Top)
    } else if ball.pos.y + r >= height {
        Some(Wall::Bottom)
    } else if ball.pos.x - r <= 0.0 {
        Some(Wall::Left)
    } else if ball.pos.x + r >= width {
        Some(Wall::Right)
    } else {
        None
    }
}

/// Bounce off the top or bottom wall. Left/right are goals and left to the match.
pub fn handle_wall(ball: &mut Ball, wall: Wall, settings: &Settings) {
    let r = ball.radius;
    match wall {
        Wall::Top => {
            ball.pos.y = r;
            ball.vel.y = ball.vel.y.abs();
        }
        Wall::Bottom => {
            ball.pos.y = settings.screen_height as f32 - r;
            ball.vel.y = -ball.vel.y.abs();
        }
        Wall::Left | Wall::Right => {}
    }
}

/// Find the first live cell touched by the ball's perimeter probes
pub fn check_grid(ball: &Ball, grid: &LifeGrid, settings: &Settings) -> Option<GridCollision> {
    if !ball.can_collide() {
        return None;
    }

    for point in ball.collision_points() {
        let (cell_x, cell_y) = screen_to_cell(point, settings.cell_size);
        if !grid.is_alive(cell_x, cell_y) {
            continue;
        }

        let offset = ball.pos - cell_center(cell_x, cell_y, settings.cell_size);
        let (normal_x, normal_y) = if offset.x.abs() > offset.y.abs() {
            (if offset.x > 0.0 { 1 } else { -1 }, 0)
        } else {
            (0, if offset.y > 0.0 { 1 } else { -1 })
        };
        return Some(GridCollision {
            normal_x,
            normal_y,
            cell_x,
            cell_y,
        });
    }

    None
}

/// Damage the hit cell and bounce the ball off it
pub fn handle_grid<R: Rng + ?Sized>(
    ball: &mut Ball,
    grid: &mut LifeGrid,
    collision: GridCollision,
    settings: &Settings,
    rng: &mut R,
) -> CellImpact {
    let GridCollision {
        normal_x,
        normal_y,
        cell_x,
        cell_y,
    } = collision;
    let cs = settings.cell_size as f32;
    let r = ball.radius;

    let damage = calculate_damage(ball.speed, ball.max_speed(), settings);
    let (_, destroyed) = grid.damage(cell_x, cell_y, damage);

    // Reflect and push just outside the cell on the resolved side
    if normal_x != 0 {
        ball.vel = reflect_velocity(ball.vel, Vec2::X);
        ball.pos.x = if normal_x > 0 {
            (cell_x + 1) as f32 * cs + r + 1.0
        } else {
            cell_x as f32 * cs - r - 1.0
        };
    }
    if normal_y != 0 {
        ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        ball.pos.y = if normal_y > 0 {
            (cell_y + 1) as f32 * cs + r + 1.0
        } else {
            cell_y as f32 * cs - r - 1.0
        };
    }

    if settings.min_bounce_angle_enabled {
        ensure_minimum_angle(ball, settings, rng);
    }

    if settings.bounce_jitter > 0.0 {
        let j = settings.bounce_jitter;
        ball.vel.x += rng.random_range(-j..=j);
        ball.vel.y += rng.random_range(-j..=j);
    }
    ball.normalize_velocity();
    ball.set_collision_cooldown();

    log::debug!(
        "Ball hit cell ({cell_x}, {cell_y}) for {damage}{}",
        if destroyed { ", destroyed" } else { "" }
    );

    CellImpact {
        destroyed,
        cell_x,
        cell_y,
    }
}

/// Nudge near-vertical or near-horizontal trajectories away from the axis
///
/// Velocity is left unnormalized; the caller renormalizes.
fn ensure_minimum_angle<R: Rng + ?Sized>(ball: &mut Ball, settings: &Settings, rng: &mut R) {
    use std::f32::consts::FRAC_PI_2;

    let min_angle = settings.min_bounce_angle;
    let push = ball.speed * settings.min_bounce_adjustment;
    let angle = ball.vel.y.abs().atan2(ball.vel.x.abs());

    if angle > FRAC_PI_2 - min_angle {
        ball.vel.x += away_from_zero(ball.vel.x, rng) * push;
    } else if angle < min_angle {
        ball.vel.y += away_from_zero(ball.vel.y, rng) * min_angle.sin() * push;
    }
}

/// Sign of `component`, random for zero
fn away_from_zero<R: Rng + ?Sized>(component: f32, rng: &mut R) -> f32 {
    if component > 0.0 {
        1.0
    } else if component < 0.0 {
        -1.0
    } else if rng.random_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}
