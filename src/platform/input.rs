//! Keyboard state
//!
//! Browser key events arrive between frames. `KeyTracker` keeps the set of
//! held keys plus the keys pressed since the last frame, and turns them into
//! a `TickInput` once per frame.

use std::collections::HashSet;

use crate::sim::TickInput;

const UP_KEYS: &[&str] = &["w", "arrowup"];
const DOWN_KEYS: &[&str] = &["s", "arrowdown"];
const LEFT_KEYS: &[&str] = &["a", "arrowleft"];
const RIGHT_KEYS: &[&str] = &["d", "arrowright"];
const FIRE_KEYS: &[&str] = &[" ", "space", "spacebar"];
/// Returns to the menu from any phase
pub const MENU_KEY: &str = "r";

/// Keys whose browser default (scrolling) should be suppressed
pub fn is_game_key(key: &str) -> bool {
    let key = normalize(key);
    FIRE_KEYS.contains(&key.as_str()) || key.starts_with("arrow")
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

/// Held keys and per-frame press edges
#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    held: HashSet<String>,
    pressed: HashSet<String>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown; auto-repeat of a held key is not a new press
    pub fn key_down(&mut self, key: &str) {
        let key = normalize(key);
        if !self.held.contains(&key) {
            self.pressed.insert(key.clone());
        }
        self.held.insert(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&normalize(key));
    }

    fn any_held(&self, aliases: &[&str]) -> bool {
        aliases.iter().any(|k| self.held.contains(*k))
    }

    fn any_pressed(&self, aliases: &[&str]) -> bool {
        aliases.iter().any(|k| self.pressed.contains(*k))
    }

    pub fn was_pressed(&self, key: &str) -> bool {
        self.pressed.contains(&normalize(key))
    }

    /// Input for the coming tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            up: self.any_held(UP_KEYS),
            down: self.any_held(DOWN_KEYS),
            left: self.any_held(LEFT_KEYS),
            right: self.any_held(RIGHT_KEYS),
            fire: self.any_pressed(FIRE_KEYS),
        }
    }

    /// Forget this frame's presses; call once after every tick
    pub fn clear_edges(&mut self) {
        self.pressed.clear();
    }

    /// Drop everything (e.g. window lost focus)
    pub fn reset(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_map_to_movement() {
        let mut keys = KeyTracker::new();
        keys.key_down("ArrowUp");
        keys.key_down("d");
        let input = keys.tick_input();
        assert!(input.up && input.right);
        assert!(!input.down && !input.left && !input.fire);

        keys.key_up("ARROWUP");
        assert!(!keys.tick_input().up);
    }

    #[test]
    fn test_fire_is_seen_once_per_press() {
        let mut keys = KeyTracker::new();
        keys.key_down(" ");
        assert!(keys.tick_input().fire);
        keys.clear_edges();

        // Auto-repeat while held
        keys.key_down(" ");
        assert!(!keys.tick_input().fire);

        keys.key_up(" ");
        keys.key_down(" ");
        assert!(keys.tick_input().fire);
    }

    #[test]
    fn test_press_and_release_within_frame_still_fires() {
        let mut keys = KeyTracker::new();
        keys.key_down(" ");
        keys.key_up(" ");
        assert!(keys.tick_input().fire);
    }

    #[test]
    fn test_game_keys() {
        assert!(is_game_key(" "));
        assert!(is_game_key("ArrowLeft"));
        assert!(!is_game_key("w"));
    }
}
