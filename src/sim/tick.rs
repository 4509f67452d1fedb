//! Per-tick simulation
//!
//! Core game loop that advances the world by one variable time step.
//! Every timing decision reads `GameState::clock_ms`, which only this module
//! advances, so a seed plus an input stream replays exactly.

use glam::Vec2;
use rand::Rng;

use super::collision::{projectile_rect, projectiles_touch};
use super::state::{GameEvent, GamePhase, GameState, Owner, Projectile};
use crate::consts::*;
use crate::scoring::rating;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held movement keys
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire pressed since the previous tick (edge, not held)
    pub fire: bool,
}

impl TickInput {
    /// Raw movement intent; opposing keys cancel out
    pub fn move_dir(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

const CARDINALS: [Vec2; 4] = [
    Vec2::new(0.0, -1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(1.0, 0.0),
];

/// Advance the game state by `dt` seconds (capped at `MAX_TICK_DT`)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_TICK_DT)
    } else {
        0.0
    };
    state.clock_ms += f64::from(dt) * 1000.0;

    match state.phase {
        GamePhase::Menu | GamePhase::Victory | GamePhase::Defeat => {}
        GamePhase::LevelTransition => {
            if state.clock_ms >= state.transition_until_ms {
                let next = state.level + 1;
                state.start_level(next);
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Playing => update_playing(state, input, dt),
    }
}

fn update_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    let now = state.clock_ms;

    // Player movement
    state.player.step(input.move_dir(), dt, &state.obstacles);

    // Player firing
    if input.fire {
        let difficulty = state.difficulty;
        let live = state.live_projectiles(Owner::Player);
        let ready = now - state.player.last_fire_ms >= difficulty.player_fire_cooldown_ms();
        if live < difficulty.max_player_projectiles() && ready {
            state.player.last_fire_ms = now;
            let (origin, dir) = (state.player.muzzle(), state.player.facing);
            spawn_projectile(state, Owner::Player, origin, dir);
            state.round.shots += 1;
        }
    }

    update_enemies(state, dt, now);

    for p in &mut state.projectiles {
        p.pos += p.dir * p.speed * dt;
    }
    state.projectiles.retain(|p| !p.out_of_arena());

    if resolve_hits(state) {
        return;
    }

    if state.enemies.is_empty() {
        state.events.push(GameEvent::LevelCleared { level: state.level });
        if state.level >= TOTAL_LEVELS {
            finish_round(state, true);
        } else {
            state.phase = GamePhase::LevelTransition;
            state.transition_until_ms = now + LEVEL_TRANSITION_MS;
            log::info!("Level {} clear", state.level);
        }
    }
}

/// Enemy AI: periodic direction decisions, movement, opportunistic fire
fn update_enemies(state: &mut GameState, dt: f32, now: f64) {
    let fire_cooldown = state.difficulty.enemy_fire_cooldown_ms(state.level);
    let fire_chance = state.difficulty.enemy_fire_chance(state.level);
    let target = state.player.pos;
    let mut shots: Vec<(Vec2, Vec2)> = Vec::new();

    for enemy in &mut state.enemies {
        if now >= enemy.next_turn_ms {
            if state.rng.random::<f32>() < ENEMY_PURSUIT_CHANCE {
                enemy.aim_toward(target);
            } else {
                enemy.facing = CARDINALS[state.rng.random_range(0..CARDINALS.len())];
            }
            enemy.next_turn_ms = now + 300.0 + state.rng.random::<f64>() * 900.0;
        }

        let dir = enemy.facing;
        enemy.step(dir, dt, &state.obstacles);

        if now - enemy.last_fire_ms >= fire_cooldown && state.rng.random::<f32>() < fire_chance {
            enemy.aim_toward(target);
            enemy.last_fire_ms = now;
            shots.push((enemy.muzzle(), enemy.facing));
        }
    }

    for (origin, dir) in shots {
        spawn_projectile(state, Owner::Enemy, origin, dir);
    }
}

fn spawn_projectile(state: &mut GameState, owner: Owner, origin: Vec2, dir: Vec2) {
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        owner,
        pos: origin,
        radius: PROJECTILE_RADIUS,
        dir,
        speed: PROJECTILE_SPEED,
    });
    state.events.push(GameEvent::ShotFired { owner });
}

/// Drop every item whose flag is set, keeping order
fn retain_unmarked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !marked[idx];
        idx += 1;
        keep
    });
}

/// Outcome of a hit on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerHit {
    /// Invulnerable, nothing happened
    Ignored,
    /// Lost a life and respawned
    Respawned,
    /// Last life lost, round over
    Defeated,
}

fn hit_player(state: &mut GameState) -> PlayerHit {
    if state.is_invulnerable() {
        return PlayerHit::Ignored;
    }

    state.lives = state.lives.saturating_sub(1);
    state.round.deaths += 1;
    state.events.push(GameEvent::PlayerHit {
        lives_left: state.lives,
    });
    log::debug!("Player hit, {} lives left", state.lives);

    if state.lives == 0 {
        finish_round(state, false);
        return PlayerHit::Defeated;
    }

    state.player.respawn();
    state.invulnerable_until_ms = state.clock_ms + RESPAWN_INVULNERABLE_MS;
    PlayerHit::Respawned
}

/// Enter Victory/Defeat and freeze the round summary
fn finish_round(state: &mut GameState, victory: bool) {
    state.phase = if victory {
        GamePhase::Victory
    } else {
        GamePhase::Defeat
    };
    let elapsed = state.round_elapsed_sec();
    state.round.final_elapsed_sec = elapsed;
    state.round.final_rating = rating(
        state.difficulty,
        elapsed,
        state.round.kills,
        state.round.shots,
        state.round.deaths,
        victory,
    );
    state.events.push(GameEvent::RoundOver { victory });
    log::info!(
        "Round over ({}): level {}, {} kills, rating {:.2}",
        if victory { "victory" } else { "defeat" },
        state.level,
        state.round.kills,
        state.round.final_rating
    );
}

/// Resolve all contacts for this tick.
///
/// Passes run in a fixed order, each on the survivors of the previous one:
/// projectile-obstacle, projectile-projectile, projectile-actor, then tank
/// contact. Returns true if the round ended.
fn resolve_hits(state: &mut GameState) -> bool {
    // Projectiles vs obstacles
    let mut spent = vec![false; state.projectiles.len()];
    for (i, p) in state.projectiles.iter().enumerate() {
        let rect = projectile_rect(p);
        if let Some(obstacle) = state
            .obstacles
            .iter_mut()
            .find(|o| !o.destroyed() && o.rect.overlaps(&rect))
        {
            spent[i] = true;
            obstacle.hit();
        }
    }
    retain_unmarked(&mut state.projectiles, &spent);
    state.obstacles.retain(|o| !o.destroyed());

    // Opposing projectiles cancel pairwise; each shell pairs at most once
    let n = state.projectiles.len();
    let mut spent = vec![false; n];
    for i in 0..n {
        if spent[i] {
            continue;
        }
        for j in (i + 1)..n {
            if spent[j] {
                continue;
            }
            let (a, b) = (&state.projectiles[i], &state.projectiles[j]);
            if a.owner != b.owner && projectiles_touch(a, b) {
                spent[i] = true;
                spent[j] = true;
                break;
            }
        }
    }
    retain_unmarked(&mut state.projectiles, &spent);

    // Projectiles vs tanks
    let mut spent = vec![false; state.projectiles.len()];
    let mut destroyed = vec![false; state.enemies.len()];
    for i in 0..state.projectiles.len() {
        if spent[i] {
            continue;
        }
        let rect = projectile_rect(&state.projectiles[i]);
        let owner = state.projectiles[i].owner;
        match owner {
            Owner::Enemy => {
                if !rect.overlaps(&state.player.rect()) {
                    continue;
                }
                spent[i] = true;
                match hit_player(state) {
                    PlayerHit::Ignored => {}
                    PlayerHit::Respawned => {
                        for (k, p) in state.projectiles.iter().enumerate() {
                            if p.owner == Owner::Enemy {
                                spent[k] = true;
                            }
                        }
                    }
                    PlayerHit::Defeated => {
                        retain_unmarked(&mut state.projectiles, &spent);
                        retain_unmarked(&mut state.enemies, &destroyed);
                        return true;
                    }
                }
            }
            Owner::Player => {
                let target = state
                    .enemies
                    .iter()
                    .enumerate()
                    .find(|(k, e)| !destroyed[*k] && rect.overlaps(&e.rect()))
                    .map(|(k, e)| (k, e.id));
                if let Some((k, id)) = target {
                    spent[i] = true;
                    destroyed[k] = true;
                    state.round.kills += 1;
                    state.events.push(GameEvent::EnemyDestroyed { id });
                    log::debug!("Enemy {} destroyed", id);
                }
            }
        }
    }
    retain_unmarked(&mut state.projectiles, &spent);
    retain_unmarked(&mut state.enemies, &destroyed);

    // Tank contact
    for k in 0..state.enemies.len() {
        if !state.enemies[k].rect().overlaps(&state.player.rect()) {
            continue;
        }
        match hit_player(state) {
            PlayerHit::Ignored => {}
            PlayerHit::Respawned => state.projectiles.retain(|p| p.owner == Owner::Player),
            PlayerHit::Defeated => return true,
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::level::build_obstacles;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Actor, Obstacle, ObstacleKind};
    use proptest::prelude::*;

    /// Enemy that never moves, turns or fires
    fn parked_enemy(id: u32, x: f32, y: f32) -> Actor {
        let mut enemy = Actor::enemy(id, Vec2::new(x, y), 0.0, f64::INFINITY);
        enemy.last_fire_ms = f64::INFINITY;
        enemy
    }

    /// Playing state with an empty arena, one parked enemy, and no invulnerability
    fn arena_state() -> GameState {
        let mut state = GameState::new(12345);
        state.start_round(Difficulty::Medium);
        state.obstacles.clear();
        state.enemies = vec![parked_enemy(1, 40.0, 100.0)];
        state.projectiles.clear();
        state.events.clear();
        state.invulnerable_until_ms = 0.0;
        state
    }

    fn shell(state: &mut GameState, owner: Owner, x: f32, y: f32, dir: Vec2) {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            owner,
            pos: Vec2::new(x, y),
            radius: PROJECTILE_RADIUS,
            dir,
            speed: PROJECTILE_SPEED,
        });
    }

    /// Arena with one enemy running its normal AI; the player can't be hurt
    fn live_enemy_state(difficulty: Difficulty, level: u32) -> GameState {
        let mut state = arena_state();
        state.difficulty = difficulty;
        state.level = level;
        let now = state.clock_ms;
        state.enemies = vec![Actor::enemy(
            1,
            Vec2::new(400.0, 200.0),
            difficulty.enemy_speed(level),
            now,
        )];
        state.invulnerable_until_ms = f64::INFINITY;
        state
    }

    #[test]
    fn test_menu_does_not_simulate() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_dt_is_capped() {
        let mut state = arena_state();
        let before = state.clock_ms;
        tick(&mut state, &TickInput::default(), 1.0);
        assert!((state.clock_ms - before - 50.0).abs() < 1e-3);

        let before = state.clock_ms;
        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.clock_ms, before);
    }

    #[test]
    fn test_player_moves_and_faces() {
        let mut state = arena_state();
        let start = state.player.pos;
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.05);
        assert!(state.player.pos.x < start.x);
        assert_eq!(state.player.facing, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let input = TickInput {
            up: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.move_dir(), Vec2::ZERO);
    }

    #[test]
    fn test_player_fire_respects_cooldown_and_cap() {
        let mut state = arena_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, 0.01);
        assert_eq!(state.live_projectiles(Owner::Player), 1);
        assert_eq!(state.round.shots, 1);
        let shot = &state.projectiles[0];
        assert_eq!(shot.dir, Vec2::new(0.0, -1.0));

        // Still cooling down (260 ms on Medium)
        tick(&mut state, &fire, 0.01);
        assert_eq!(state.round.shots, 1);

        // Cap: five live shells on Medium
        for _ in 0..20 {
            for _ in 0..6 {
                tick(&mut state, &TickInput::default(), 0.05);
            }
            tick(&mut state, &fire, 0.0);
            assert!(state.live_projectiles(Owner::Player) <= 5);
        }
    }

    #[test]
    fn test_opposing_projectiles_cancel() {
        let mut state = arena_state();
        shell(&mut state, Owner::Player, 200.0, 300.0, Vec2::new(1.0, 0.0));
        shell(&mut state, Owner::Enemy, 209.0, 300.0, Vec2::new(-1.0, 0.0));
        let lives = state.lives;

        tick(&mut state, &TickInput::default(), 0.01);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.round.kills, 0);
        assert_eq!(state.lives, lives);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_cancelled_shell_does_not_reach_enemy() {
        let mut state = arena_state();
        let target = state.enemies[0].center();
        // Player shell already on the enemy, enemy shell within reach of it
        shell(&mut state, Owner::Player, target.x, target.y, Vec2::ZERO);
        shell(&mut state, Owner::Enemy, target.x + 5.0, target.y, Vec2::ZERO);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.round.kills, 0);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_same_owner_projectiles_pass() {
        let mut state = arena_state();
        shell(&mut state, Owner::Player, 200.0, 300.0, Vec2::new(1.0, 0.0));
        shell(&mut state, Owner::Player, 203.0, 300.0, Vec2::new(1.0, 0.0));
        tick(&mut state, &TickInput::default(), 0.01);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_enemy_direction_decisions() {
        let mut state = live_enemy_state(Difficulty::Hard, 1);
        state.enemies[0].last_fire_ms = f64::INFINITY;
        let target = state.player.pos;
        let (mut pursuits, mut wanders) = (0, 0);

        for _ in 0..4000 {
            let before = state.enemies[0].clone();
            tick(&mut state, &TickInput::default(), 0.05);
            let enemy = &state.enemies[0];
            if enemy.next_turn_ms == before.next_turn_ms {
                continue;
            }

            let wait = enemy.next_turn_ms - state.clock_ms;
            assert!((300.0 - 1e-6..1200.0).contains(&wait), "wait {}", wait);

            if CARDINALS.contains(&enemy.facing) {
                wanders += 1;
            } else {
                let aim = (target - before.pos).normalize_or_zero();
                assert!(enemy.facing.distance(aim) < 1e-4, "{:?} vs {:?}", enemy.facing, aim);
                pursuits += 1;
            }
        }

        assert!(pursuits > 0);
        assert!(wanders > 0);
    }

    #[test]
    fn test_enemy_fire_cooldown_and_aim() {
        let level = 3;
        let mut state = live_enemy_state(Difficulty::Hard, level);
        let cooldown = Difficulty::Hard.enemy_fire_cooldown_ms(level);
        let mut last_shot = f64::NEG_INFINITY;
        let mut shots = 0;

        for _ in 0..4000 {
            state.events.clear();
            let before = state.projectiles.len();
            tick(&mut state, &TickInput::default(), 0.05);
            if !state.events.contains(&GameEvent::ShotFired { owner: Owner::Enemy }) {
                continue;
            }
            shots += 1;

            let now = state.clock_ms;
            assert!(now - last_shot >= cooldown - 1e-6, "fired {} ms after the last shot", now - last_shot);
            last_shot = now;

            // Fired straight at the player from where it stood
            let enemy = &state.enemies[0];
            let aim = (state.player.pos - enemy.pos).normalize_or_zero();
            assert!(enemy.facing.distance(aim) < 1e-4);
            if state.projectiles.len() > before {
                let shot = state.projectiles.last().unwrap();
                assert_eq!(shot.owner, Owner::Enemy);
                assert_eq!(shot.dir, enemy.facing);
            }
        }

        assert!(shots > 0);
    }

    #[test]
    fn test_enemy_blocked_by_steel_stays_put() {
        let mut state = arena_state();
        let mut enemy = Actor::enemy(1, Vec2::new(200.0, 200.0), 120.0, f64::INFINITY);
        enemy.last_fire_ms = f64::INFINITY;
        state.enemies = vec![enemy];
        // Steel tile right below, enemy faces down
        state.obstacles.push(Obstacle::new(2, ObstacleKind::Steel, Rect::new(200.0, 237.0, 32.0, 32.0)));

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.05);
        }
        assert_eq!(state.enemies[0].pos, Vec2::new(200.0, 200.0));

        // Open road: it moves
        state.obstacles.clear();
        tick(&mut state, &TickInput::default(), 0.05);
        assert!(state.enemies[0].pos.y > 200.0);
    }

    #[test]
    fn test_player_projectile_kills_enemy() {
        let mut state = arena_state();
        let target = state.enemies[0].center();
        shell(&mut state, Owner::Player, target.x, target.y + 20.0, Vec2::new(0.0, -1.0));

        tick(&mut state, &TickInput::default(), 0.01);

        assert_eq!(state.round.kills, 1);
        assert!(state.projectiles.is_empty());
        assert!(state.events.contains(&GameEvent::EnemyDestroyed { id: 1 }));
        // Last enemy gone on level 1
        assert_eq!(state.phase, GamePhase::LevelTransition);
    }

    #[test]
    fn test_obstacle_absorbs_shot_before_actor() {
        let mut state = arena_state();
        let target = state.enemies[0].rect();
        // Brick overlapping the lower edge of the enemy
        state.obstacles.push(Obstacle::new(
            1,
            ObstacleKind::Brick,
            Rect::new(target.x, target.bottom() - 4.0, 32.0, 32.0),
        ));
        shell(&mut state, Owner::Player, target.x + 10.0, target.bottom() - 1.0, Vec2::new(0.0, -1.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.round.kills, 0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.obstacles[0].hp, 1);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_brick_removed_on_second_hit_steel_persists() {
        let mut state = arena_state();
        state.obstacles.push(Obstacle::new(1, ObstacleKind::Brick, Rect::new(300.0, 300.0, 32.0, 32.0)));
        state.obstacles.push(Obstacle::new(2, ObstacleKind::Steel, Rect::new(600.0, 300.0, 32.0, 32.0)));
        for _ in 0..2 {
            shell(&mut state, Owner::Player, 316.0, 316.0, Vec2::ZERO);
            shell(&mut state, Owner::Player, 616.0, 316.0, Vec2::ZERO);
            tick(&mut state, &TickInput::default(), 0.0);
        }
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].kind, ObstacleKind::Steel);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_hit_ignored_while_invulnerable() {
        let mut state = arena_state();
        state.invulnerable_until_ms = state.clock_ms + 1000.0;
        let center = state.player.center();
        shell(&mut state, Owner::Enemy, center.x, center.y, Vec2::ZERO);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, PLAYER_LIVES);
        assert_eq!(state.round.deaths, 0);
        // The shell is still consumed
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_respawn_clears_only_enemy_projectiles() {
        let mut state = arena_state();
        state.player.pos = Vec2::new(100.0, 400.0);
        let center = state.player.center();
        shell(&mut state, Owner::Enemy, center.x, center.y, Vec2::ZERO);
        shell(&mut state, Owner::Enemy, 700.0, 200.0, Vec2::ZERO);
        shell(&mut state, Owner::Player, 800.0, 200.0, Vec2::ZERO);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, PLAYER_LIVES - 1);
        assert_eq!(state.round.deaths, 1);
        assert_eq!(state.player.pos, Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
        assert_eq!(state.player.facing, Vec2::new(0.0, -1.0));
        assert!(state.is_invulnerable());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].owner, Owner::Player);
    }

    #[test]
    fn test_enemy_contact_hits_player() {
        let mut state = arena_state();
        let p = state.player.pos;
        state.enemies.push(parked_enemy(2, p.x + 10.0, p.y));

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.lives, PLAYER_LIVES - 1);

        // Respawned into the same enemy, but invulnerable now
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.lives, PLAYER_LIVES - 1);
    }

    #[test]
    fn test_last_life_ends_in_defeat_once() {
        let mut state = arena_state();
        state.lives = 1;
        let center = state.player.center();
        shell(&mut state, Owner::Enemy, center.x, center.y, Vec2::ZERO);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::Defeat);
        assert_eq!(state.lives, 0);
        let over: Vec<_> = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundOver { .. }))
            .collect();
        assert_eq!(over, vec![&GameEvent::RoundOver { victory: false }]);
        assert!(state.round.final_elapsed_sec >= 1.0);

        // Terminal: more ticks change nothing
        state.events.clear();
        let p = state.player.pos;
        state.enemies.push(parked_enemy(9, p.x, p.y));
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.05);
        }
        assert!(state.events.is_empty());
        assert_eq!(state.round.deaths, 1);
    }

    #[test]
    fn test_level_clear_transitions_then_advances() {
        let mut state = arena_state();
        state.enemies.clear();

        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.phase, GamePhase::LevelTransition);
        assert_eq!(state.level, 1);

        for _ in 0..23 {
            tick(&mut state, &TickInput::default(), 0.05);
            assert_eq!(state.phase, GamePhase::LevelTransition);
        }
        tick(&mut state, &TickInput::default(), 0.05);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.obstacles, build_obstacles(2));
        assert!(state.is_invulnerable());
        assert!(state.events.contains(&GameEvent::LevelStarted { level: 2 }));
    }

    #[test]
    fn test_final_level_clear_is_victory() {
        let mut state = arena_state();
        state.level = TOTAL_LEVELS;
        state.enemies.clear();

        tick(&mut state, &TickInput::default(), 0.05);

        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state.events.contains(&GameEvent::RoundOver { victory: true }));
        assert!(state.round.final_rating > 0.0);
    }

    #[test]
    fn test_same_seed_same_round() {
        let inputs = [
            TickInput {
                left: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        a.start_round(Difficulty::Hard);
        b.start_round(Difficulty::Hard);
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, 1.0 / 60.0);
            tick(&mut b, input, 1.0 / 60.0);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.projectiles, b.projectiles);
        assert_eq!(a.round, b.round);
        assert_eq!(a.phase, b.phase);
    }

    fn input_strategy() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(up, down, left, right, fire)| TickInput {
                up,
                down,
                left,
                right,
                fire,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_arena(
            seed in any::<u64>(),
            inputs in prop::collection::vec((input_strategy(), 0.0f32..0.2), 1..200),
        ) {
            let mut state = GameState::new(seed);
            state.start_round(Difficulty::Easy);
            for (input, dt) in &inputs {
                tick(&mut state, input, *dt);
                prop_assert!(state.player.rect().inside(ARENA_WIDTH, ARENA_HEIGHT));
                let facing = state.player.facing.length();
                prop_assert!(facing == 0.0 || (facing - 1.0).abs() < 1e-5);
            }
        }
    }
}
