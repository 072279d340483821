//! Browser LocalStorage backend (wasm32 only)

use super::{KeyValueStore, StoreError};

/// Prefix applied to every LocalStorage key
const KEY_PREFIX: &str = "runcook_";

#[derive(Debug, Clone, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".to_string()))
    }

    fn js_error(err: wasm_bindgen::JsValue) -> StoreError {
        StoreError::Unavailable(format!("{err:?}"))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(Self::js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&format!("{KEY_PREFIX}{key}"), value)
            .map_err(Self::js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(Self::js_error)
    }
}
