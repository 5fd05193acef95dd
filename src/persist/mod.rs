//! Persist module - Snapshot persistence behind a string-keyed store
//!
//! Provides:
//! - The storage port (`SnapshotStore`) with in-memory and file-backed stores
//! - Validated storage keys
//! - The versioned `{ state, version }` envelope

pub mod envelope;
pub mod error;
pub mod key;
pub mod store;

pub use envelope::{PersistedState, SCHEMA_VERSION};
pub use error::PersistError;
pub use key::{StorageKey, APP_STORAGE_KEY, CART_STORAGE_KEY};
pub use store::{FileStore, MemoryStore, SnapshotStore};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode `state` and write it under `key`
pub fn save_state<S, T>(store: &mut S, key: &StorageKey, state: &T) -> Result<(), PersistError>
where
    S: SnapshotStore + ?Sized,
    T: Serialize,
{
    let payload = PersistedState::new(state).encode()?;
    store.save(key, &payload)
}

/// Read and decode the state under `key`, if any
pub fn load_state<S, T>(store: &S, key: &StorageKey) -> Result<Option<T>, PersistError>
where
    S: SnapshotStore + ?Sized,
    T: DeserializeOwned,
{
    match store.load(key)? {
        Some(payload) => Ok(Some(PersistedState::<T>::decode(&payload)?.state)),
        None => Ok(None),
    }
}
