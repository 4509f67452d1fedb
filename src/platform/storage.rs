//! LocalStorage helpers (WASM only)

use crate::highscores::StoreError;

fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .ok_or_else(|| StoreError::Storage("no window".into()))?
        .local_storage()
        .map_err(|e| StoreError::Storage(format!("{:?}", e)))?
        .ok_or_else(|| StoreError::Storage("localStorage disabled".into()))
}

/// Read a key; missing key and unavailable storage both read as `None`
pub fn get(key: &str) -> Option<String> {
    let storage = local_storage().ok()?;
    storage.get_item(key).ok().flatten()
}

/// Write a key
pub fn set(key: &str, value: &str) -> Result<(), StoreError> {
    local_storage()?
        .set_item(key, value)
        .map_err(|e| StoreError::Storage(format!("{:?}", e)))
}
