//! App settings - language, display currency and selected restaurant

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::persist::{load_state, save_state, PersistError, SnapshotStore, StorageKey};

static LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").expect("Invalid LANGUAGE_RE regex")
});
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{3}$").expect("Invalid CURRENCY_RE regex")
});

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid {field} '{value}': expected {expected}")]
    Invalid {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Failed to persist settings: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub language: String,
    pub currency: String,
    pub restaurant_id: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            currency: "USD".to_string(),
            restaurant_id: None,
        }
    }
}

impl AppSettings {
    /// Language tag such as `en` or `vi-VN`
    pub fn set_language(&mut self, language: &str) -> Result<(), SettingsError> {
        if !LANGUAGE_RE.is_match(language) {
            return Err(SettingsError::Invalid {
                field: "language",
                value: language.to_string(),
                expected: "a language tag like 'en' or 'en-US'",
            });
        }
        self.language = language.to_string();
        Ok(())
    }

    /// ISO 4217 code; lowercase input is accepted and normalized
    pub fn set_currency(&mut self, currency: &str) -> Result<(), SettingsError> {
        let code = currency.to_ascii_uppercase();
        if !CURRENCY_RE.is_match(&code) {
            return Err(SettingsError::Invalid {
                field: "currency",
                value: currency.to_string(),
                expected: "a three-letter currency code like 'USD'",
            });
        }
        self.currency = code;
        Ok(())
    }

    pub fn set_restaurant_id(&mut self, restaurant_id: Option<String>) {
        self.restaurant_id = restaurant_id.filter(|id| !id.trim().is_empty());
    }
}

/// Stored settings, or the defaults when none are stored
pub fn load_settings<S: SnapshotStore + ?Sized>(store: &S) -> Result<AppSettings, SettingsError> {
    let settings: AppSettings = load_state(store, &StorageKey::app())?.unwrap_or_default();
    debug!(?settings, "loaded app settings");
    Ok(settings)
}

pub fn save_settings<S: SnapshotStore + ?Sized>(
    store: &mut S,
    settings: &AppSettings,
) -> Result<(), SettingsError> {
    save_state(store, &StorageKey::app(), settings)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.language, "en");
        assert_eq!(settings.currency, "USD");
        assert!(settings.restaurant_id.is_none());
    }

    #[test]
    fn test_set_language() {
        let mut settings = AppSettings::default();
        settings.set_language("vi-VN").unwrap();
        assert_eq!(settings.language, "vi-VN");
        assert!(settings.set_language("english").is_err());
        assert_eq!(settings.language, "vi-VN");
    }

    #[test]
    fn test_set_currency_normalizes_case() {
        let mut settings = AppSettings::default();
        settings.set_currency("vnd").unwrap();
        assert_eq!(settings.currency, "VND");

        let err = settings.set_currency("US$").unwrap_err();
        assert!(err.to_string().contains("currency"));
    }

    #[test]
    fn test_blank_restaurant_is_none() {
        let mut settings = AppSettings::default();
        settings.set_restaurant_id(Some("r-42".to_string()));
        assert_eq!(settings.restaurant_id.as_deref(), Some("r-42"));
        settings.set_restaurant_id(Some("  ".to_string()));
        assert!(settings.restaurant_id.is_none());
    }

    #[test]
    fn test_load_missing_gives_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_settings(&store).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = AppSettings::default();
        settings.set_currency("EUR").unwrap();
        settings.set_restaurant_id(Some("r-1".to_string()));
        save_settings(&mut store, &settings).unwrap();

        assert_eq!(load_settings(&store).unwrap(), settings);
    }

    #[test]
    fn test_load_browser_record() {
        let mut store = MemoryStore::new();
        let payload = r#"{"state":{"language":"fr","currency":"EUR","restaurantId":null},"version":0}"#;
        store.save(&StorageKey::app(), payload).unwrap();

        let settings = load_settings(&store).unwrap();
        assert_eq!(settings.language, "fr");
        assert_eq!(settings.currency, "EUR");
    }
}
