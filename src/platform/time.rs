//! Wall-clock time for record timestamps and seeds.
//!
//! The simulation never reads this; it runs on its own tick clock.

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// ISO-8601 form of a Unix ms timestamp (browser only)
#[cfg(target_arch = "wasm32")]
pub fn iso_timestamp(ms: f64) -> Option<String> {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms));
    if date.get_time().is_nan() {
        return None;
    }
    Some(String::from(date.to_iso_string()))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn iso_timestamp(_ms: f64) -> Option<String> {
    None
}
