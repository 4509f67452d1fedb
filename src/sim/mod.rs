//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit tick clock only (no wall-clock reads)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod rect;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{projectile_rect, projectiles_touch};
pub use level::{LevelWorld, build_obstacles, build_world, spawn_enemies};
pub use rect::{Rect, clamp, overlaps};
pub use rng::SeededSequence;
pub use state::{
    Actor, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Owner, Projectile, RoundStats,
};
pub use tick::{TickInput, tick};
