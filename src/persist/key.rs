//! Storage keys

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::persist::error::PersistError;

/// Key the cart snapshot is stored under
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Key the app settings are stored under
pub const APP_STORAGE_KEY: &str = "app-storage";

const MAX_KEY_LEN: usize = 64;

static KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("Invalid KEY_RE regex")
});

/// A storage key, safe to use as a file stem
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Result<Self, PersistError> {
        let key = key.into();
        if key.len() > MAX_KEY_LEN {
            return Err(PersistError::InvalidKey {
                key,
                reason: "longer than 64 characters",
            });
        }
        if !KEY_RE.is_match(&key) {
            return Err(PersistError::InvalidKey {
                key,
                reason: "must be lowercase alphanumerics, '.', '_' or '-' and not start with punctuation",
            });
        }
        Ok(Self(key))
    }

    pub fn cart() -> Self {
        Self(CART_STORAGE_KEY.to_string())
    }

    pub fn app() -> Self {
        Self(APP_STORAGE_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StorageKey {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
