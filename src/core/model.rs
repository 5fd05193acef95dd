//! Cart data model
//!
//! Line items, the catalog items they are created from, and the plain
//! snapshot record that gets persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::money::exact_mul;

/// Display fields carried along with an item, copied verbatim.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Opaque line item identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An item offered for adding to the cart.
///
/// Any `quantity` field present on the incoming record is dropped: the ledger
/// owns quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub price: Decimal,

    #[serde(flatten)]
    pub attributes: Attributes,
}

impl CatalogItem {
    pub fn new(id: impl Into<ItemId>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            price,
            attributes: Attributes::new(),
        }
    }

    /// Attach a display field
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ItemId,
    pub price: Decimal,
    pub quantity: u32,

    #[serde(flatten)]
    pub attributes: Attributes,
}

impl LineItem {
    /// Start a line with quantity 1
    pub fn from_catalog(item: CatalogItem) -> Self {
        let mut attributes = item.attributes;
        attributes.remove("quantity");
        Self {
            id: item.id,
            price: item.price,
            quantity: 1,
            attributes,
        }
    }

    /// `price * quantity`, or `None` if it overflows or would be rounded
    pub fn subtotal(&self) -> Option<Decimal> {
        exact_mul(self.price, Decimal::from(self.quantity))
    }
}

/// Plain `{ items, total }` record of a ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub total: Decimal,
}
