//! Tank Battle - A top-down tank arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, level state machine)
//! - `scoring`: Round rating model
//! - `session`: Menu/round controller wiring the simulation to persistence
//! - `highscores` / `api`: Leaderboard storage (local, with optional remote sync)
//! - `renderer`: Read-only frame snapshots and the canvas sink
//! - `platform`: Browser input and storage helpers
//! - `settings`: Difficulty presets and persisted preferences

pub mod api;
pub mod highscores;
pub mod namegen;
pub mod platform;
pub mod renderer;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{Leaderboard, LeaderboardStore, MemoryStore, ResultRecord, StoreError};
pub use scoring::rating;
pub use session::Session;
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Obstacle grid tile size
    pub const TILE: f32 = 32.0;

    /// Round structure
    pub const TOTAL_LEVELS: u32 = 5;
    pub const PLAYER_LIVES: u32 = 3;

    /// Timers (milliseconds on the simulation clock)
    pub const RESPAWN_INVULNERABLE_MS: f64 = 1300.0;
    pub const LEVEL_TRANSITION_MS: f64 = 1200.0;
    pub const BLINK_PERIOD_MS: f64 = 120.0;

    /// Largest step a single tick may integrate (seconds)
    pub const MAX_TICK_DT: f32 = 0.05;

    /// Tanks
    pub const TANK_SIZE: f32 = 36.0;
    /// Player spawn, top-left corner of the tank rectangle
    pub const PLAYER_SPAWN_X: f32 = ARENA_WIDTH / 2.0 - TANK_SIZE / 2.0;
    pub const PLAYER_SPAWN_Y: f32 = ARENA_HEIGHT - 78.0;

    /// Projectiles
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const PROJECTILE_SPEED: f32 = 460.0;
    /// Distance from tank center to the muzzle along the facing vector
    pub const MUZZLE_OFFSET: f32 = 23.0;

    /// Enemy AI
    pub const ENEMY_PURSUIT_CHANCE: f32 = 0.58;
    pub const ENEMY_SPAWN_ATTEMPTS: u32 = 4000;

    /// Leaderboard rows shown in the menu
    pub const LEADERBOARD_LIMIT: usize = 8;
    /// Longest accepted player name (characters)
    pub const MAX_NAME_LEN: usize = 16;
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
}
