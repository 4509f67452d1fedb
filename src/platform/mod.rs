//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events
//! - Wall-clock time
//! - Storage (LocalStorage on web)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;
pub mod time;

pub use input::KeyTracker;
pub use time::now_ms;
