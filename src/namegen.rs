//! Random call-signs for the menu's "random name" action

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::consts::MAX_NAME_LEN;

const ADJECTIVES: &[&str] = &["Swift", "Iron", "Lucky", "Shadow", "Turbo", "Nova", "Pixel", "Silent"];
const NOUNS: &[&str] = &["Tiger", "Falcon", "Comet", "Panda", "Ranger", "Blazer", "Knight", "Rocket"];

/// Adjective + noun + two digits, e.g. `TurboFalcon42`
pub fn random_player_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Swift");
    let noun = NOUNS.choose(rng).copied().unwrap_or("Tiger");
    let digits: u32 = rng.random_range(10..=99);
    format!("{adjective}{noun}{digits}")
        .chars()
        .take(MAX_NAME_LEN)
        .collect()
}
