//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product as listed in the menu grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price before size modifier and addons
    pub base_price: Decimal,
    /// Absolute URL or path relative to the API host
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub category_id: String,
}

/// Product with its selectable sizes and addons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub sizes: Vec<ProductSize>,
    #[serde(default)]
    pub addons: Vec<ProductAddon>,
}

impl ProductDetail {
    pub fn size(&self, id: &str) -> Option<&ProductSize> {
        self.sizes.iter().find(|s| s.id == id)
    }

    pub fn addon(&self, id: &str) -> Option<&ProductAddon> {
        self.addons.iter().find(|a| a.id == id)
    }

    /// The size flagged as default, if any
    pub fn default_size(&self) -> Option<&ProductSize> {
        self.sizes.iter().find(|s| s.is_default)
    }
}

/// Size variant (price_modifier is added to the base price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSize {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price_modifier: Decimal,
    #[serde(default)]
    pub is_default: bool,
}

/// Optional addon (extra cheese, sauce...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAddon {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}
