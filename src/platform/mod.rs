//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (ms since the Unix epoch)
//! - Default storage backend (LocalStorage on web, JSON files on native)

use crate::persistence::KeyValueStore;

/// Environment variable naming the native storage directory
pub const DATA_DIR_ENV: &str = "RUNCOOK_DATA_DIR";

/// Fallback storage directory when `RUNCOOK_DATA_DIR` is unset
pub const DEFAULT_DATA_DIR: &str = "runcook-data";

/// Current time in milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current time in milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Storage directory for native builds
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> std::path::PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_DATA_DIR))
}

/// Default key/value store for this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    let dir = data_dir();
    log::info!("Using file storage at {}", dir.display());
    Box::new(crate::persistence::FileStore::new(dir))
}

/// Default key/value store for this platform
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    log::info!("Using LocalStorage");
    Box::new(crate::persistence::LocalStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(now_ms() > 1_577_836_800_000.0);
    }
}
