//! Rendering module
//!
//! The session hands a read-only `Snapshot` of the world to a `RenderSink`
//! once per frame. Sinks only draw; nothing flows back into the simulation.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSink;

use crate::consts::TOTAL_LEVELS;
use crate::sim::{Actor, GamePhase, GameState, Obstacle, Projectile};

/// Palette shared by sinks
pub mod colors {
    pub const BACKGROUND: &str = "#171f2b";
    pub const GRID: &str = "#243041";
    pub const PLAYER: &str = "#5ce08f";
    pub const ENEMY: &str = "#df6f62";
    pub const PROJECTILE: &str = "#ffe08a";
    pub const BRICK: &str = "#bc7a4e";
    pub const STEEL: &str = "#8e9aa9";
    pub const OUTLINE: &str = "#111";
}

/// HUD text fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    /// Status line (level, kills, lives, difficulty)
    pub status: String,
    /// Centered banner; empty when nothing to announce
    pub banner: String,
    /// Menu form should be visible
    pub show_menu: bool,
}

impl Hud {
    pub fn for_state(state: &GameState) -> Self {
        let status = if state.phase == GamePhase::Menu {
            "Menu · select name and difficulty".to_string()
        } else {
            format!(
                "Lv {}/{} · Kills {} · Lives {} · Diff {}",
                state.level,
                TOTAL_LEVELS,
                state.round.kills,
                state.lives,
                state.difficulty.label()
            )
        };

        let cap = state.difficulty.rating_cap();
        let banner = match state.phase {
            GamePhase::Menu | GamePhase::Playing => String::new(),
            GamePhase::LevelTransition => format!("LEVEL {} CLEAR", state.level),
            GamePhase::Victory => format!(
                "ALL {} LEVELS CLEAR · Rating {:.2}/{:.1}",
                TOTAL_LEVELS, state.round.final_rating, cap
            ),
            GamePhase::Defeat => format!("GAME OVER · Rating {:.2}/{:.1}", state.round.final_rating, cap),
        };

        Self {
            status,
            banner,
            show_menu: state.phase == GamePhase::Menu,
        }
    }
}

/// Read-only view of one frame
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub obstacles: &'a [Obstacle],
    pub projectiles: &'a [Projectile],
    pub enemies: &'a [Actor],
    pub player: &'a Actor,
    /// False during the "off" half of the invulnerability blink
    pub player_visible: bool,
    pub hud: Hud,
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            obstacles: &state.obstacles,
            projectiles: &state.projectiles,
            enemies: &state.enemies,
            player: &state.player,
            player_visible: state.phase != GamePhase::Menu && state.player_visible(),
            hud: Hud::for_state(state),
        }
    }
}

/// Anything that can present a frame
pub trait RenderSink {
    fn draw(&mut self, frame: &Snapshot<'_>);
}

/// Sink that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw(&mut self, _frame: &Snapshot<'_>) {}
}
