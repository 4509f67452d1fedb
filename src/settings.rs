//! Difficulty presets and player preferences
//!
//! Preferences are persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PLAYER_NAME, LEADERBOARD_LIMIT, MAX_NAME_LEN};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Storage/API key
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "1" => Some(Difficulty::Easy),
            "medium" | "med" | "2" => Some(Difficulty::Medium),
            "hard" | "3" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Player movement speed (units/s)
    pub fn player_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 230.0,
            Difficulty::Medium => 210.0,
            Difficulty::Hard => 185.0,
        }
    }

    /// Enemy speed on level 1 (units/s)
    pub fn base_enemy_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 80.0,
            Difficulty::Medium => 102.0,
            Difficulty::Hard => 128.0,
        }
    }

    /// Enemy speed, +8% per level
    pub fn enemy_speed(&self, level: u32) -> f32 {
        self.base_enemy_speed() * (1.0 + 0.08 * level.saturating_sub(1) as f32)
    }

    /// Minimum time between player shots (ms)
    pub fn player_fire_cooldown_ms(&self) -> f64 {
        match self {
            Difficulty::Easy => 200.0,
            Difficulty::Medium => 260.0,
            Difficulty::Hard => 300.0,
        }
    }

    fn base_enemy_fire_cooldown_sec(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.7,
            Difficulty::Medium => 1.4,
            Difficulty::Hard => 1.0,
        }
    }

    /// Enemy fire cooldown on `level` (ms), shrinking 12% per level down to 500
    pub fn enemy_fire_cooldown_ms(&self, level: u32) -> f64 {
        let scale = 1.0 + 0.12 * f64::from(level.saturating_sub(1));
        (self.base_enemy_fire_cooldown_sec() / scale).max(0.5) * 1000.0
    }

    fn base_enemy_fire_chance(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.007,
            Difficulty::Medium => 0.011,
            Difficulty::Hard => 0.017,
        }
    }

    /// Per-tick chance an off-cooldown enemy fires, +15% per level
    pub fn enemy_fire_chance(&self, level: u32) -> f32 {
        self.base_enemy_fire_chance() * (1.0 + 0.15 * level.saturating_sub(1) as f32)
    }

    /// Live player projectiles allowed at once
    pub fn max_player_projectiles(&self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 5,
            Difficulty::Hard => 4,
        }
    }

    pub fn base_enemy_count(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 4,
            Difficulty::Hard => 5,
        }
    }

    /// Enemies requested for `level`
    pub fn enemy_count(&self, level: u32) -> usize {
        self.base_enemy_count() + level.saturating_sub(1) as usize
    }

    /// Highest rating reachable on this difficulty
    pub fn rating_cap(&self) -> f64 {
        match self {
            Difficulty::Easy => 7.5,
            Difficulty::Medium => 9.0,
            Difficulty::Hard => 10.0,
        }
    }
}

/// Clean up a typed player name: trimmed, at most 16 characters, never empty
pub fn sanitize_player_name(raw: &str) -> String {
    let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Last name entered on the menu
    pub player_name: String,
    /// Difficulty selected on the menu
    pub difficulty: Difficulty,
    /// Remote leaderboard API; local-only when unset
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Rows shown on the menu leaderboard
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,
}

fn default_leaderboard_limit() -> usize {
    LEADERBOARD_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            difficulty: Difficulty::Medium,
            api_base_url: None,
            leaderboard_limit: LEADERBOARD_LIMIT,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tank_battle_settings";

    /// Parse stored JSON, falling back to defaults on anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::platform::storage::get(Self::STORAGE_KEY) {
            Some(json) => {
                log::info!("Loaded settings from LocalStorage");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = crate::platform::storage::set(Self::STORAGE_KEY, &json) {
                    log::warn!("Settings not saved: {}", e);
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Settings not serialized: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
