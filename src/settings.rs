//! App settings and preferences
//!
//! Persisted separately from run history under their own storage key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the OS setting
    System,
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "system" | "auto" => Some(Theme::System),
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Let the skill predictor tune difficulty
    pub ai_adjusts_difficulty: bool,
    /// Play sound effects
    pub sound_effects: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            ai_adjusts_difficulty: true,
            sound_effects: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

/// Settings bound to a store; every change is written through
pub struct Preferences<S> {
    settings: Settings,
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn load(store: S) -> Self {
        let settings = Settings::load(&store);
        Self { settings, store }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.update(|s| s.theme = theme);
    }

    pub fn set_ai_adjusts_difficulty(&mut self, enabled: bool) {
        self.update(|s| s.ai_adjusts_difficulty = enabled);
    }

    pub fn set_sound_effects(&mut self, enabled: bool) {
        self.update(|s| s.sound_effects = enabled);
    }

    pub fn reset_to_defaults(&mut self) {
        self.update(|s| *s = Settings::default());
    }

    /// Apply a change and save; a failed save keeps the in-memory change
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        if let Err(e) = self.settings.save(&mut self.store) {
            log::error!("Failed to save settings: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.theme, Theme::Dark);
        assert!(s.ai_adjusts_difficulty);
        assert!(s.sound_effects);
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!(Theme::from_str("LIGHT"), Some(Theme::Light));
        assert_eq!(Theme::from_str("system"), Some(Theme::System));
        assert_eq!(Theme::from_str("sepia"), None);
        for theme in Theme::ALL {
            assert_eq!(Theme::from_str(theme.as_str()), Some(theme));
        }
    }

    #[test]
    fn test_changes_are_written_through() {
        let mut prefs = Preferences::load(MemoryStore::new());
        prefs.set_theme(Theme::Light);
        prefs.set_sound_effects(false);

        let reloaded = Settings::load(&prefs.store);
        assert_eq!(reloaded.theme, Theme::Light);
        assert!(!reloaded.sound_effects);
        assert!(reloaded.ai_adjusts_difficulty);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut prefs = Preferences::load(MemoryStore::new());
        prefs.set_theme(Theme::System);
        prefs.set_ai_adjusts_difficulty(false);
        prefs.reset_to_defaults();
        assert_eq!(prefs.get(), &Settings::default());
        assert_eq!(Settings::load(&prefs.store), Settings::default());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let mut store = MemoryStore::new();
        store.set("settings", r#"{"theme":"light"}"#).unwrap();
        let s = Settings::load(&store);
        assert_eq!(s.theme, Theme::Light);
        assert!(s.sound_effects);
    }

    #[test]
    fn test_failed_save_keeps_change() {
        let mut prefs = Preferences::load(MemoryStore::read_only());
        prefs.set_theme(Theme::Light);
        assert_eq!(prefs.get().theme, Theme::Light);
    }
}
