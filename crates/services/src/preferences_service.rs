use std::sync::Arc;

use quiz_core::model::DisplayPreferences;
use quiz_storage::repository::KeyValueStore;

use crate::error::PreferencesError;

const DARK_THEME_KEY: &str = "dark_theme";

#[derive(Clone)]
pub struct DisplayPreferencesService {
    store: Arc<dyn KeyValueStore>,
}

impl DisplayPreferencesService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load persisted preferences (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` on storage failures.
    pub async fn load(&self) -> Result<DisplayPreferences, PreferencesError> {
        let defaults = DisplayPreferences::default();
        let dark_theme = self
            .store
            .get_bool(DARK_THEME_KEY)
            .await?
            .unwrap_or(defaults.dark_theme);
        Ok(DisplayPreferences { dark_theme })
    }

    /// Persist preferences.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if persistence fails.
    pub async fn save(&self, prefs: DisplayPreferences) -> Result<(), PreferencesError> {
        self.store.put_bool(DARK_THEME_KEY, prefs.dark_theme).await?;
        Ok(())
    }

    /// Flip the theme and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` on storage failures.
    pub async fn toggle_theme(&self) -> Result<DisplayPreferences, PreferencesError> {
        let prefs = self.load().await?.toggled();
        self.save(prefs).await?;
        Ok(prefs)
    }
}
