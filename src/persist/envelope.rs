//! Persisted state envelope
//!
//! Every stored value is wrapped as `{ "state": ..., "version": N }`, the
//! layout browser-side stores already write. Version 0 is the unversioned
//! legacy layout and has the same shape as version 1.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::persist::error::PersistError;

/// Current snapshot schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Versioned wrapper around a persisted value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState<T> {
    pub state: T,

    #[serde(default)]
    pub version: u32,

    /// When the value was written; absent in legacy records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct VersionHeader {
    #[serde(default)]
    version: u32,
}

impl<T> PersistedState<T> {
    /// Wrap `state` at the current schema version
    pub fn new(state: T) -> Self {
        Self {
            state,
            version: SCHEMA_VERSION,
            saved_at: Some(Utc::now()),
        }
    }
}

impl<T: Serialize> PersistedState<T> {
    pub fn encode(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: DeserializeOwned> PersistedState<T> {
    /// Decode a stored payload, refusing versions this build does not know
    pub fn decode(payload: &str) -> Result<Self, PersistError> {
        let header: VersionHeader = serde_json::from_str(payload)?;
        if header.version > SCHEMA_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: header.version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CartSnapshot;
    use rust_decimal::Decimal;

    #[test]
    fn test_encode_carries_version() {
        let payload = PersistedState::new(CartSnapshot::default()).encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert!(value["state"]["items"].as_array().unwrap().is_empty());
        assert!(value.get("saved_at").is_some());
    }

    #[test]
    fn test_decode_legacy_record() {
        // written by the browser store: numeric money, no saved_at, version 0
        let payload = r#"{"state":{"items":[{"id":"a","price":10,"quantity":2,"name":"Pho"}],"total":20},"version":0}"#;
        let decoded = PersistedState::<CartSnapshot>::decode(payload).unwrap();
        assert_eq!(decoded.version, 0);
        assert!(decoded.saved_at.is_none());
        assert_eq!(decoded.state.total, Decimal::from(20));
        assert_eq!(decoded.state.items[0].quantity, 2);
        assert_eq!(decoded.state.items[0].attributes["name"], "Pho");
    }

    #[test]
    fn test_decode_missing_version_is_legacy() {
        let payload = r#"{"state":{"items":[],"total":0}}"#;
        let decoded = PersistedState::<CartSnapshot>::decode(payload).unwrap();
        assert_eq!(decoded.version, 0);
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let payload = r#"{"state":{"something":"else"},"version":2}"#;
        let err = PersistedState::<CartSnapshot>::decode(payload).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion {
                found: 2,
                supported: 1
            }
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = PersistedState::<CartSnapshot>::decode("not json").unwrap_err();
        assert!(matches!(err, PersistError::Json(_)));
    }
}
