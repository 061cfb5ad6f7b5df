//! Cart store
//!
//! Lines are keyed by a content identity (product + size + addon set), so
//! adding the same combination twice bumps the quantity of one line instead
//! of creating a duplicate.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared::order::OrderItemInput;

use crate::storage::{CART_KEY, Storage};

/// Service charge applied on top of the subtotal (10%)
pub const SERVICE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Identity of a cart line: `{product}-{size|default}-{sorted addons}`
pub fn line_identity(product_id: &str, size_id: Option<&str>, addon_ids: &[String]) -> String {
    let mut addons: Vec<&str> = addon_ids.iter().map(String::as_str).collect();
    addons.sort_unstable();
    addons.dedup();
    format!(
        "{}-{}-{}",
        product_id,
        size_id.unwrap_or("default"),
        addons.join(",")
    )
}

/// Sort add-ons by id and drop duplicate ids, keeping each name aligned
/// with its id. Names are sorted on their own when the lists differ in length.
fn sorted_addons(ids: Vec<String>, mut names: Vec<String>) -> (Vec<String>, Vec<String>) {
    if ids.len() != names.len() {
        let mut ids = ids;
        ids.sort_unstable();
        ids.dedup();
        names.sort_unstable();
        return (ids, names);
    }

    let mut pairs: Vec<(String, String)> = ids.into_iter().zip(names).collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs.dedup_by(|a, b| a.0 == b.0);
    pairs.into_iter().unzip()
}

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Derived identity, see [`line_identity`]
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub size_id: Option<String>,
    pub size_name: Option<String>,
    /// Sorted, unique
    pub addon_ids: Vec<String>,
    /// Positionally aligned with `addon_ids`
    pub addon_names: Vec<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Always `unit_price * quantity`
    pub total_price: Decimal,
}

impl CartLine {
    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.total_price = self.unit_price * Decimal::from(quantity);
    }

    /// Payload item for order submission
    pub fn to_order_item(&self) -> OrderItemInput {
        OrderItemInput::new(
            self.product_id.clone(),
            self.size_id.clone(),
            self.quantity,
            self.addon_ids.clone(),
        )
    }
}

/// Input for [`CartStore::add_item`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub product_id: String,
    pub product_name: String,
    pub image_url: Option<String>,
    pub size_id: Option<String>,
    pub size_name: Option<String>,
    pub addon_ids: Vec<String>,
    pub addon_names: Vec<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CartSnapshot {
    items: Vec<CartLine>,
}

/// Persisted cart
#[derive(Debug)]
pub struct CartStore {
    storage: Storage,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Restore the persisted cart, repairing any line that breaks the
    /// quantity/total invariants
    pub fn rehydrate(storage: Storage) -> Self {
        let snapshot: CartSnapshot = storage.load_or_default(CART_KEY);
        let lines = snapshot
            .items
            .into_iter()
            .filter(|line| line.quantity > 0)
            .map(|mut line| {
                line.set_quantity(line.quantity);
                line
            })
            .collect();
        Self { storage, lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a selection, merging into an existing line with the same identity.
    ///
    /// Returns the line id. A zero quantity is ignored.
    pub fn add_item(&mut self, item: NewCartLine) -> String {
        let id = line_identity(&item.product_id, item.size_id.as_deref(), &item.addon_ids);
        if item.quantity == 0 {
            tracing::debug!(line = %id, "Ignoring zero-quantity add");
            return id;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            let quantity = line.quantity.saturating_add(item.quantity);
            line.set_quantity(quantity);
            tracing::debug!(line = %id, quantity, "Merged into existing cart line");
        } else {
            let (addon_ids, addon_names) = sorted_addons(item.addon_ids, item.addon_names);
            let mut line = CartLine {
                id: id.clone(),
                product_id: item.product_id,
                product_name: item.product_name,
                image_url: item.image_url,
                size_id: item.size_id,
                size_name: item.size_name,
                addon_ids,
                addon_names,
                quantity: 0,
                unit_price: item.unit_price,
                total_price: Decimal::ZERO,
            };
            line.set_quantity(item.quantity);
            tracing::debug!(line = %id, quantity = item.quantity, "Added cart line");
            self.lines.push(line);
        }

        self.persist();
        id
    }

    /// Remove a line; no-op when absent
    pub fn remove_item(&mut self, id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() != before {
            self.persist();
        }
    }

    /// Set a line's quantity; zero or negative removes the line
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity) else {
            if quantity <= 0 {
                self.remove_item(id);
            }
            return;
        };
        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.set_quantity(quantity);
            self.persist();
        }
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist();
    }

    // ========== Derived values ==========

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|l| l.total_price).sum()
    }

    /// Service charge, rounded to whole currency units
    pub fn tax(&self) -> Decimal {
        (self.subtotal() * SERVICE_RATE)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn total(&self) -> Decimal {
        self.subtotal() + self.tax()
    }

    /// Total units across lines, saturating at `u32::MAX`
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .map(|l| l.quantity)
            .fold(0u32, u32::saturating_add)
    }

    /// Items in submission form
    pub fn order_items(&self) -> Vec<OrderItemInput> {
        self.lines.iter().map(CartLine::to_order_item).collect()
    }

    fn persist(&self) {
        let snapshot = CartSnapshot {
            items: self.lines.clone(),
        };
        if let Err(e) = self.storage.save(CART_KEY, &snapshot) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}
