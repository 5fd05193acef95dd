//! Ledger errors
//!
//! Every variant is a caller-contract violation. The ledger is left untouched
//! whenever one is returned.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::model::ItemId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Price for item '{id}' must not be negative (got {price})")]
    NegativePrice { id: ItemId, price: Decimal },

    #[error("Quantity for item '{id}' must not be negative (got {quantity})")]
    NegativeQuantity { id: ItemId, quantity: i64 },

    #[error("Quantity for item '{id}' is out of range (got {quantity}, max {max})", max = u32::MAX)]
    QuantityOutOfRange { id: ItemId, quantity: i64 },

    #[error("Cart total overflowed while updating item '{id}'")]
    Overflow { id: ItemId },

    #[error("Cart total cannot hold item '{id}' exactly; its price needs more precision than the total has left")]
    InexactTotal { id: ItemId },

    #[error("Invalid cart snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}
