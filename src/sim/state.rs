//! Game state and core simulation types
//!
//! World entities live in plain vectors ordered by ID. Every tick mutates
//! them in place; removals go through `retain` after a pass has marked what
//! died, never by splicing while a pass is still iterating.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::level::build_world;
use super::rect::{Rect, clamp};
use crate::consts::*;
use crate::settings::Difficulty;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Name/difficulty selection, no world
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Between-level pause before the next world is built
    LevelTransition,
    /// Final level cleared
    Victory,
    /// Out of lives
    Defeat,
}

impl GamePhase {
    /// Round has ended and must not be simulated further
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// Which side fired a projectile (also tags actors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// Something that happened during a tick, drained by the session each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    ShotFired { owner: Owner },
    EnemyDestroyed { id: u32 },
    PlayerHit { lives_left: u32 },
    LevelCleared { level: u32 },
    RoundOver { victory: bool },
}

/// A tank. The player and enemies share movement rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: u32,
    pub team: Owner,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Unit facing vector (or zero)
    pub facing: Vec2,
    /// Units per second
    pub speed: f32,
    /// Clock time of the last shot (ms)
    pub last_fire_ms: f64,
    /// Clock time of the next AI direction decision (enemies only)
    pub next_turn_ms: f64,
}

impl Actor {
    pub fn player(speed: f32) -> Self {
        Self {
            id: 0,
            team: Owner::Player,
            pos: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            size: Vec2::splat(TANK_SIZE),
            facing: Vec2::new(0.0, -1.0),
            speed,
            last_fire_ms: f64::NEG_INFINITY,
            next_turn_ms: 0.0,
        }
    }

    pub fn enemy(id: u32, pos: Vec2, speed: f32, next_turn_ms: f64) -> Self {
        Self {
            id,
            team: Owner::Enemy,
            pos,
            size: Vec2::splat(TANK_SIZE),
            facing: Vec2::new(0.0, 1.0),
            speed,
            last_fire_ms: f64::NEG_INFINITY,
            next_turn_ms,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Projectile spawn point
    pub fn muzzle(&self) -> Vec2 {
        self.center() + self.facing * MUZZLE_OFFSET
    }

    /// Put the player back at the spawn point facing up
    pub fn respawn(&mut self) {
        self.pos = Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
        self.facing = Vec2::new(0.0, -1.0);
    }

    /// Face toward another actor's top-left corner; zero if they coincide
    pub fn aim_toward(&mut self, target: Vec2) {
        self.facing = (target - self.pos).normalize_or_zero();
    }

    /// Move along `dir` for `dt` seconds.
    ///
    /// A zero or non-finite direction is no movement. The result is clamped
    /// to the arena and rolled back whole if it ends inside an obstacle.
    pub fn step(&mut self, dir: Vec2, dt: f32, obstacles: &[Obstacle]) {
        let Some(dir) = dir.try_normalize() else {
            return;
        };
        self.facing = dir;

        let old = self.pos;
        self.pos += dir * self.speed * dt;
        self.pos.x = clamp(self.pos.x, 0.0, ARENA_WIDTH - self.size.x);
        self.pos.y = clamp(self.pos.y, 0.0, ARENA_HEIGHT - self.size.y);

        let rect = self.rect();
        if obstacles.iter().any(|o| o.rect.overlaps(&rect)) {
            self.pos = old;
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Breaks after two hits
    Brick,
    /// Indestructible, lasts the whole level
    Steel,
}

/// A terrain tile
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Remaining hits (bricks only)
    pub hp: u8,
}

/// Hits a brick takes before breaking
pub const BRICK_HP: u8 = 2;

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, rect: Rect) -> Self {
        let hp = match kind {
            ObstacleKind::Brick => BRICK_HP,
            ObstacleKind::Steel => 0,
        };
        Self { id, kind, rect, hp }
    }

    pub fn destructible(&self) -> bool {
        self.kind == ObstacleKind::Brick
    }

    /// Register a projectile hit
    pub fn hit(&mut self) {
        if self.destructible() {
            self.hp = self.hp.saturating_sub(1);
        }
    }

    pub fn destroyed(&self) -> bool {
        self.destructible() && self.hp == 0
    }
}

/// A shell in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    /// Center point
    pub pos: Vec2,
    pub radius: f32,
    /// Unit direction of travel
    pub dir: Vec2,
    pub speed: f32,
}

impl Projectile {
    pub fn out_of_arena(&self) -> bool {
        self.pos.x < 0.0 || self.pos.x > ARENA_WIDTH || self.pos.y < 0.0 || self.pos.y > ARENA_HEIGHT
    }
}

/// Per-round counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundStats {
    pub kills: u32,
    pub deaths: u32,
    pub shots: u32,
    /// Clock time the round started (ms)
    pub start_ms: f64,
    /// Result already handed to the leaderboard store
    pub saved: bool,
    pub final_rating: f64,
    pub final_elapsed_sec: f64,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for AI and enemy placement
    pub seed: u64,
    pub rng: Pcg32,
    /// Monotonic simulation clock (ms), advanced only by `tick`
    pub clock_ms: f64,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    pub round: RoundStats,
    pub invulnerable_until_ms: f64,
    pub transition_until_ms: f64,
    pub player: Actor,
    pub enemies: Vec<Actor>,
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle state sitting in the menu
    pub fn new(seed: u64) -> Self {
        let difficulty = Difficulty::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: 0.0,
            phase: GamePhase::Menu,
            difficulty,
            level: 1,
            lives: PLAYER_LIVES,
            round: RoundStats::default(),
            invulnerable_until_ms: 0.0,
            transition_until_ms: 0.0,
            player: Actor::player(difficulty.player_speed()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new projectile ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a fresh round at level 1
    pub fn start_round(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.level = 1;
        self.lives = PLAYER_LIVES;
        self.round = RoundStats {
            start_ms: self.clock_ms,
            ..RoundStats::default()
        };
        self.start_level(1);
        self.phase = GamePhase::Playing;
        log::info!(
            "Round started ({}, seed {})",
            difficulty.label(),
            self.seed
        );
    }

    /// Build the world for `level` and reset the player
    pub fn start_level(&mut self, level: u32) {
        self.level = level;
        self.player = Actor::player(self.difficulty.player_speed());
        let world = build_world(level, self.difficulty, &mut self.rng, self.clock_ms);
        if world.enemies.len() < world.requested_enemies {
            log::warn!(
                "Level {}: placed {} of {} enemies",
                level,
                world.enemies.len(),
                world.requested_enemies
            );
        }
        self.obstacles = world.obstacles;
        self.enemies = world.enemies;
        self.projectiles.clear();
        self.invulnerable_until_ms = self.clock_ms + RESPAWN_INVULNERABLE_MS;
        self.events.push(GameEvent::LevelStarted { level });
        log::info!(
            "Level {} started: {} obstacles, {} enemies",
            level,
            self.obstacles.len(),
            self.enemies.len()
        );
    }

    /// Drop the world and go back to the menu
    pub fn reset_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.level = 1;
        self.lives = PLAYER_LIVES;
        self.enemies.clear();
        self.projectiles.clear();
        self.obstacles.clear();
        self.invulnerable_until_ms = 0.0;
        self.player = Actor::player(self.difficulty.player_speed());
    }

    pub fn is_invulnerable(&self) -> bool {
        self.clock_ms < self.invulnerable_until_ms
    }

    /// Blink phase for drawing the player during invulnerability
    pub fn player_visible(&self) -> bool {
        !self.is_invulnerable() || (self.clock_ms / BLINK_PERIOD_MS).floor() as u64 % 2 == 0
    }

    /// Seconds since the round started, never below one
    pub fn round_elapsed_sec(&self) -> f64 {
        ((self.clock_ms - self.round.start_ms) / 1000.0).max(1.0)
    }

    pub fn live_projectiles(&self, owner: Owner) -> usize {
        self.projectiles.iter().filter(|p| p.owner == owner).count()
    }
}
