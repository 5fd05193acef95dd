//! Cart session - owns a ledger, notifies subscribers and persists snapshots
//!
//! The session is the single writer for its ledger. Every transition that
//! changes state is published to subscribers in subscription order, then the
//! snapshot is saved under the cart storage key.

use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::model::{CartSnapshot, CatalogItem};
use crate::ledger::{CartLedger, Change, LedgerError};
use crate::persist::{load_state, save_state, PersistError, SnapshotStore, StorageKey};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Cart storage error: {0}")]
    Persist(#[from] PersistError),
}

/// Handle returned by [`CartSession::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Change, &CartLedger)>;

pub struct CartSession<S: SnapshotStore> {
    ledger: CartLedger,
    store: S,
    key: StorageKey,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: SnapshotStore> fmt::Debug for CartSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSession")
            .field("ledger", &self.ledger)
            .field("key", &self.key)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: SnapshotStore> CartSession<S> {
    /// Open the cart stored under the default cart key
    pub fn open(store: S) -> Result<Self, SessionError> {
        Self::open_with_key(store, StorageKey::cart())
    }

    /// Open the cart stored under `key`; an empty ledger if nothing is stored
    pub fn open_with_key(store: S, key: StorageKey) -> Result<Self, SessionError> {
        let ledger = match load_state::<S, CartSnapshot>(&store, &key)? {
            Some(snapshot) => {
                let ledger = CartLedger::restore(snapshot)?;
                info!(key = %key, items = ledger.len(), total = %ledger.total(), "restored cart");
                ledger
            }
            None => {
                debug!(key = %key, "no stored cart; starting empty");
                CartLedger::new()
            }
        };

        Ok(Self {
            ledger,
            store,
            key,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn item_count(&self) -> u64 {
        self.ledger.item_count()
    }

    /// Register a listener called after every state change
    pub fn subscribe(&mut self, listener: impl Fn(&Change, &CartLedger) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether `id` was subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn add_item(&mut self, item: CatalogItem) -> Result<Change, SessionError> {
        let change = self.ledger.add_item(item)?;
        self.commit(change)
    }

    pub fn remove_item(&mut self, id: &str) -> Result<Change, SessionError> {
        let change = self.ledger.remove_item(id);
        self.commit(change)
    }

    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<Change, SessionError> {
        let change = self.ledger.update_quantity(id, quantity)?;
        self.commit(change)
    }

    pub fn clear_cart(&mut self) -> Result<Change, SessionError> {
        let change = self.ledger.clear_cart();
        self.commit(change)
    }

    /// Clear the ledger and drop its stored snapshot
    pub fn discard(&mut self) -> Result<Change, SessionError> {
        let change = self.ledger.clear_cart();
        self.notify(&change);
        let existed = self.store.remove(&self.key)?;
        info!(key = %self.key, existed, "discarded stored cart");
        Ok(change)
    }

    /// Write the current snapshot regardless of pending changes
    pub fn persist(&mut self) -> Result<(), SessionError> {
        save_state(&mut self.store, &self.key, &self.ledger.snapshot())?;
        Ok(())
    }

    fn notify(&self, change: &Change) {
        for (_, listener) in &self.listeners {
            listener(change, &self.ledger);
        }
    }

    fn commit(&mut self, change: Change) -> Result<Change, SessionError> {
        if change.is_unchanged() {
            debug!("cart unchanged; skipping notify and save");
            return Ok(change);
        }
        self.notify(&change);
        self.persist()?;
        Ok(change)
    }
}
