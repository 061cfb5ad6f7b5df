//! Catalog helpers: price composition, search, image URLs, price display

use rust_decimal::Decimal;
use shared::models::{Product, ProductDetail};

use crate::store::NewCartLine;

/// Resolve an image reference returned by the backend.
///
/// Absolute URLs pass through unchanged; relative paths are joined onto
/// `base`. Blank references resolve to `None`.
pub fn resolve_image_url(base: &str, raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }

    let base = base.trim_end_matches('/');
    if raw.starts_with('/') {
        Some(format!("{base}{raw}"))
    } else {
        Some(format!("{base}/{raw}"))
    }
}

/// Case-insensitive search over product name and description
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&query) || p.description.to_lowercase().contains(&query)
        })
        .collect()
}

/// Format an amount with space-grouped thousands: `12500` -> `"12 500"`
pub fn format_price(amount: Decimal) -> String {
    let amount = amount.normalize();
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let text = amount.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

// ============================================================================
// Product selection
// ============================================================================

/// Size/addon/quantity choice for one product, priced on the client.
///
/// `unit_price = base_price + size.price_modifier + Σ addon.price`.
#[derive(Debug, Clone)]
pub struct ProductSelection {
    detail: ProductDetail,
    size_id: Option<String>,
    addon_ids: Vec<String>,
    quantity: u32,
}

impl ProductSelection {
    /// Start a selection with the default size pre-selected
    pub fn new(detail: ProductDetail) -> Self {
        let size_id = detail.default_size().map(|s| s.id.clone());
        Self {
            detail,
            size_id,
            addon_ids: Vec::new(),
            quantity: 1,
        }
    }

    pub fn detail(&self) -> &ProductDetail {
        &self.detail
    }

    pub fn size_id(&self) -> Option<&str> {
        self.size_id.as_deref()
    }

    pub fn addon_ids(&self) -> &[String] {
        &self.addon_ids
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Select a size; unknown ids are rejected
    pub fn select_size(&mut self, size_id: &str) -> bool {
        if self.detail.size(size_id).is_none() {
            return false;
        }
        self.size_id = Some(size_id.to_string());
        true
    }

    /// Toggle an addon on or off; unknown or unavailable addons are rejected
    pub fn toggle_addon(&mut self, addon_id: &str) -> bool {
        match self.detail.addon(addon_id) {
            Some(addon) if addon.is_available => {}
            _ => return false,
        }
        if let Some(pos) = self.addon_ids.iter().position(|id| id == addon_id) {
            self.addon_ids.remove(pos);
        } else {
            self.addon_ids.push(addon_id.to_string());
        }
        true
    }

    /// Set quantity (clamped to at least 1)
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub fn unit_price(&self) -> Decimal {
        let size_modifier = self
            .size_id
            .as_deref()
            .and_then(|id| self.detail.size(id))
            .map(|s| s.price_modifier)
            .unwrap_or_default();
        let addons: Decimal = self
            .addon_ids
            .iter()
            .filter_map(|id| self.detail.addon(id))
            .map(|a| a.price)
            .sum();
        self.detail.product.base_price + size_modifier + addons
    }

    pub fn total_price(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    /// Build the cart line for this selection
    pub fn to_cart_line(&self) -> NewCartLine {
        let product = &self.detail.product;
        let size = self.size_id.as_deref().and_then(|id| self.detail.size(id));
        let addon_names = self
            .addon_ids
            .iter()
            .filter_map(|id| self.detail.addon(id))
            .map(|a| a.name.clone())
            .collect();

        NewCartLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            image_url: product.image_url.clone(),
            size_id: size.map(|s| s.id.clone()),
            size_name: size.map(|s| s.name.clone()),
            addon_ids: self.addon_ids.clone(),
            addon_names,
            quantity: self.quantity,
            unit_price: self.unit_price(),
        }
    }
}
