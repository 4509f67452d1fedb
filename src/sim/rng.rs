//! Seeded sequence for level layouts
//!
//! A tiny 32-bit mixer that turns an integer seed into a repeatable stream
//! of floats in `[0, 1)`. It carries no global state, so a level number
//! always maps to the same obstacle layout regardless of anything else the
//! game has drawn from its RNGs.

/// Lazy, deterministic stream of `f64` values in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededSequence {
    state: u32,
}

impl SeededSequence {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed used for the obstacle layout of `level`
    pub fn for_level(level: u32) -> Self {
        Self::new(level.wrapping_mul(7919).wrapping_add(17))
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(1 | t);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(61 | r));
        f64::from(r ^ (r >> 14)) / 4_294_967_296.0
    }

    /// Integer in `[0, span)` drawn as `floor(next * span)`
    pub fn next_below(&mut self, span: u32) -> u32 {
        (self.next_f64() * f64::from(span)).floor() as u32
    }
}

impl Iterator for SeededSequence {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}
