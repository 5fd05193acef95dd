//! Cart ledger - ordered line items with a running total
//!
//! The total is adjusted by delta on every transition and always equals
//! `sum(price * quantity)` over the current items. Items never sit in the
//! ledger with quantity 0. A transition whose new total could not be held
//! without rounding is refused.

use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::core::model::{CartSnapshot, CatalogItem, ItemId, LineItem};
use crate::core::money::{exact_add, exact_mul, exact_sub};
use crate::ledger::error::LedgerError;

/// What a transition did to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new line was appended with quantity 1
    Added { id: ItemId },
    /// An existing line went up by one
    Incremented { id: ItemId, quantity: u32 },
    /// A line left the ledger carrying `quantity`
    Removed { id: ItemId, quantity: u32 },
    /// A line's quantity was set from `from` to `to`
    QuantityChanged { id: ItemId, from: u32, to: u32 },
    /// All lines were dropped; `items` is how many there were
    Cleared { items: usize },
    /// Nothing moved; owners skip notify and save
    Unchanged,
}

impl Change {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Change::Unchanged)
    }
}

/// Sum `price * quantity` over `items` by full re-scan.
///
/// Returns `None` if the sum does not fit in a `Decimal` without rounding.
pub fn recompute_total(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| exact_add(acc, item.subtotal()?))
        .map(settle)
}

/// Overflow and rounding both leave the ledger untouched, but they are
/// reported apart
fn total_error(id: &ItemId, current: Decimal, delta: Decimal) -> LedgerError {
    if current.checked_add(delta).is_none() {
        LedgerError::Overflow { id: id.clone() }
    } else {
        LedgerError::InexactTotal { id: id.clone() }
    }
}

/// Collapse any zero result onto a canonical `0`
fn settle(total: Decimal) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        total
    }
}

/// The cart line-item ledger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLedger {
    items: Vec<LineItem>,
    total: Decimal,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id.as_str() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities over all lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id.as_str() == id)
    }

    /// Add one unit of `item`.
    ///
    /// An existing line with the same id is incremented and the total grows by
    /// the stored line's price; the candidate's price and fields are ignored in
    /// that case. The candidate price is still validated first.
    pub fn add_item(&mut self, item: CatalogItem) -> Result<Change, LedgerError> {
        if item.price < Decimal::ZERO {
            return Err(LedgerError::NegativePrice {
                id: item.id,
                price: item.price,
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            let quantity =
                existing
                    .quantity
                    .checked_add(1)
                    .ok_or_else(|| LedgerError::QuantityOutOfRange {
                        id: item.id.clone(),
                        quantity: i64::from(existing.quantity) + 1,
                    })?;
            let total = exact_add(self.total, existing.price)
                .ok_or_else(|| total_error(&item.id, self.total, existing.price))?;

            existing.quantity = quantity;
            self.total = total;
            info!(id = %item.id, quantity, total = %self.total, "incremented cart line");
            return Ok(Change::Incremented {
                id: item.id,
                quantity,
            });
        }

        let total = exact_add(self.total, item.price)
            .ok_or_else(|| total_error(&item.id, self.total, item.price))?;

        let line = LineItem::from_catalog(item);
        let id = line.id.clone();
        self.items.push(line);
        self.total = total;
        info!(id = %id, total = %self.total, "added cart line");
        Ok(Change::Added { id })
    }

    /// Remove the line with `id`. Absent ids leave the ledger unchanged.
    pub fn remove_item(&mut self, id: &str) -> Change {
        match self.position(id) {
            Some(pos) => self.remove_at(pos),
            None => {
                debug!(id, "remove: no such cart line");
                Change::Unchanged
            }
        }
    }

    fn remove_at(&mut self, pos: usize) -> Change {
        let line = self.items.remove(pos);
        // total >= subtotal whenever the invariant holds, so this only falls
        // back to a re-scan on a ledger that was already inconsistent
        self.total = line
            .subtotal()
            .and_then(|sub| exact_sub(self.total, sub))
            .map(settle)
            .or_else(|| recompute_total(&self.items))
            .unwrap_or_default();
        info!(id = %line.id, quantity = line.quantity, total = %self.total, "removed cart line");
        Change::Removed {
            id: line.id,
            quantity: line.quantity,
        }
    }

    /// Set the quantity of the line with `id`.
    ///
    /// Quantity 0 removes the line. Negative quantities and quantities above
    /// `u32::MAX` are rejected before the lookup, so they fail the same way for
    /// absent ids.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<Change, LedgerError> {
        if quantity < 0 {
            return Err(LedgerError::NegativeQuantity {
                id: ItemId::new(id),
                quantity,
            });
        }
        let to = u32::try_from(quantity).map_err(|_| LedgerError::QuantityOutOfRange {
            id: ItemId::new(id),
            quantity,
        })?;

        let Some(pos) = self.position(id) else {
            debug!(id, quantity, "update: no such cart line");
            return Ok(Change::Unchanged);
        };

        if to == 0 {
            return Ok(self.remove_at(pos));
        }

        let line = &mut self.items[pos];
        let from = line.quantity;
        if from == to {
            return Ok(Change::Unchanged);
        }

        let delta = Decimal::from(i64::from(to) - i64::from(from));
        let adjustment = line.price.checked_mul(delta).ok_or_else(|| LedgerError::Overflow {
            id: line.id.clone(),
        })?;
        let total = exact_mul(line.price, delta)
            .and_then(|adj| exact_add(self.total, adj))
            .ok_or_else(|| total_error(&line.id, self.total, adjustment))?;

        line.quantity = to;
        self.total = settle(total);
        info!(id, from, to, total = %self.total, "changed cart line quantity");
        Ok(Change::QuantityChanged {
            id: ItemId::new(id),
            from,
            to,
        })
    }

    /// Drop every line and zero the total
    pub fn clear_cart(&mut self) -> Change {
        let items = self.items.len();
        self.items.clear();
        self.total = Decimal::ZERO;
        info!(items, "cleared cart");
        Change::Cleared { items }
    }

    /// Plain record of the current state
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total,
        }
    }

    /// Rebuild a ledger from a persisted record.
    ///
    /// Lines must carry a non-negative price, a quantity of at least 1 and a
    /// unique id. The stored total is not trusted: a mismatch is logged and the
    /// recomputed value wins.
    pub fn restore(snapshot: CartSnapshot) -> Result<Self, LedgerError> {
        let mut seen = HashSet::new();
        for item in &snapshot.items {
            if item.quantity == 0 {
                return Err(LedgerError::InvalidSnapshot {
                    reason: format!("item '{}' has quantity 0", item.id),
                });
            }
            if item.price < Decimal::ZERO {
                return Err(LedgerError::InvalidSnapshot {
                    reason: format!("item '{}' has negative price {}", item.id, item.price),
                });
            }
            if !seen.insert(&item.id) {
                return Err(LedgerError::InvalidSnapshot {
                    reason: format!("item '{}' appears more than once", item.id),
                });
            }
        }

        let total =
            recompute_total(&snapshot.items).ok_or_else(|| LedgerError::InvalidSnapshot {
                reason: "total cannot be represented exactly as a decimal".to_string(),
            })?;

        if total != snapshot.total {
            warn!(
                stored = %snapshot.total,
                recomputed = %total,
                "stored cart total disagrees with its items; using recomputed total"
            );
        }

        debug!(items = snapshot.items.len(), total = %total, "restored cart ledger");
        Ok(Self {
            items: snapshot.items,
            total,
        })
    }
}
