//! cartledger - a cart line-item ledger with persisted snapshots
//!
//! cartledger provides:
//! - The cart ledger (add, remove, set quantity, clear) with an exact running total
//! - A session that owns the ledger, publishes changes and saves snapshots
//! - A string-keyed persistence port with memory and file backends
//! - Persisted app settings (language, currency, restaurant)

pub mod config;
pub mod core;
pub mod ledger;
pub mod persist;
pub mod session;
pub mod settings;

pub use crate::core::model::{CartSnapshot, CatalogItem, ItemId, LineItem};
pub use crate::ledger::{CartLedger, Change, LedgerError};
pub use crate::session::{CartSession, SessionError, SubscriptionId};
