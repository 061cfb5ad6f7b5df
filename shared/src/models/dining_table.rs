//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table as resolved from a QR code number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: String,
    pub number: u32,
    #[serde(default)]
    pub qr_code: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    /// Menu bound to this table (None = restaurant default menu)
    #[serde(default)]
    pub menu_id: Option<String>,
    #[serde(default)]
    pub menu_name: Option<String>,
}

fn default_true() -> bool {
    true
}
