//! Level generation
//!
//! Obstacle layouts come from the per-level seeded sequence, so level N
//! always looks the same. Enemy placement draws from the session RNG.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::rng::SeededSequence;
use super::state::{Actor, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::settings::Difficulty;

/// Area around the player spawn that stays free of tiles
pub const PLAYER_SAFE_ZONE: Rect = Rect::new(ARENA_WIDTH / 2.0 - 86.0, ARENA_HEIGHT - 150.0, 172.0, 130.0);
/// Top band kept open for enemies
pub const ENEMY_BAND: Rect = Rect::new(0.0, 0.0, ARENA_WIDTH, 84.0);
/// Enemies may not spawn inside this box around the player
pub const SPAWN_SAFETY_BOX: Rect = Rect::new(ARENA_WIDTH / 2.0 - 52.0, ARENA_HEIGHT - 112.0, 104.0, 96.0);
/// Tiles must keep this distance from the arena edge
const BORDER: f32 = 32.0;
/// Grid rows left open in the center wall
const WALL_GAP_ROWS: [u32; 2] = [7, 8];

/// A freshly generated level
#[derive(Debug, Clone)]
pub struct LevelWorld {
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Actor>,
    /// Enemies the level asked for; `enemies` may come up short
    pub requested_enemies: usize,
}

fn grid_cols() -> u32 {
    (ARENA_WIDTH / TILE) as u32
}

fn grid_rows() -> u32 {
    (ARENA_HEIGHT / TILE) as u32
}

/// Place a tile unless it breaks a layout rule. Rejections are silent.
fn try_place(obstacles: &mut Vec<Obstacle>, kind: ObstacleKind, gx: u32, gy: u32) {
    let rect = Rect::new(gx as f32 * TILE, gy as f32 * TILE, TILE, TILE);
    if rect.overlaps(&PLAYER_SAFE_ZONE) || rect.overlaps(&ENEMY_BAND) {
        return;
    }
    if rect.x < BORDER || rect.right() > ARENA_WIDTH - BORDER {
        return;
    }
    if rect.y < BORDER || rect.bottom() > ARENA_HEIGHT - BORDER {
        return;
    }
    if obstacles.iter().any(|o| o.rect.overlaps(&rect)) {
        return;
    }
    let id = obstacles.len() as u32 + 1;
    obstacles.push(Obstacle::new(id, kind, rect));
}

/// Chance that a scattered tile is steel on `level`
pub fn steel_chance(level: u32) -> f64 {
    0.16 + f64::from(level) * 0.03
}

/// Obstacle layout for `level`; identical on every call
pub fn build_obstacles(level: u32) -> Vec<Obstacle> {
    let mut seq = SeededSequence::for_level(level);
    let mut obstacles = Vec::new();

    // Center wall with a gap near the player's row
    let center_col = grid_cols() / 2;
    for gy in 3..grid_rows() - 2 {
        if !WALL_GAP_ROWS.contains(&gy) {
            try_place(&mut obstacles, ObstacleKind::Steel, center_col, gy);
        }
    }

    let scattered = 14 + level * 3;
    for _ in 0..scattered {
        let gx = 1 + seq.next_below(grid_cols() - 2);
        let gy = 3 + seq.next_below(grid_rows() - 5);
        let kind = if seq.next_f64() < steel_chance(level) {
            ObstacleKind::Steel
        } else {
            ObstacleKind::Brick
        };
        try_place(&mut obstacles, kind, gx, gy);
    }

    obstacles
}

/// Scatter up to `count` enemies across the upper half of the arena.
///
/// Gives up after `ENEMY_SPAWN_ATTEMPTS` candidates and returns whatever
/// was placed.
pub fn spawn_enemies<R: Rng>(
    count: usize,
    speed: f32,
    obstacles: &[Obstacle],
    rng: &mut R,
    clock_ms: f64,
) -> Vec<Actor> {
    let mut enemies: Vec<Actor> = Vec::with_capacity(count);
    let mut attempts = 0;
    while enemies.len() < count && attempts < ENEMY_SPAWN_ATTEMPTS {
        attempts += 1;
        let x = 40.0 + rng.random::<f32>() * (ARENA_WIDTH - 80.0);
        let y = 30.0 + rng.random::<f32>() * (ARENA_HEIGHT / 2.0 - 60.0);
        let next_turn = clock_ms + 280.0 + rng.random::<f64>() * 700.0;
        let candidate = Actor::enemy(enemies.len() as u32 + 1, Vec2::new(x, y), speed, next_turn);

        let rect = candidate.rect();
        if rect.overlaps(&SPAWN_SAFETY_BOX) {
            continue;
        }
        if obstacles.iter().any(|o| o.rect.overlaps(&rect)) {
            continue;
        }
        if enemies.iter().any(|e| e.rect().overlaps(&rect)) {
            continue;
        }
        enemies.push(candidate);
    }
    enemies
}

/// Full world for `level` at the given difficulty
pub fn build_world<R: Rng>(
    level: u32,
    difficulty: Difficulty,
    rng: &mut R,
    clock_ms: f64,
) -> LevelWorld {
    let obstacles = build_obstacles(level);
    let requested = difficulty.enemy_count(level);
    let enemies = spawn_enemies(
        requested,
        difficulty.enemy_speed(level),
        &obstacles,
        rng,
        clock_ms,
    );
    LevelWorld {
        obstacles,
        enemies,
        requested_enemies: requested,
    }
}
