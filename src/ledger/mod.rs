//! Ledger module - The cart line-item ledger
//!
//! Provides:
//! - Add/remove/set-quantity/clear transitions with a delta-maintained total
//! - Snapshot and restore against the plain persisted record

pub mod cart;
pub mod error;

pub use cart::{recompute_total, CartLedger, Change};
pub use error::LedgerError;
