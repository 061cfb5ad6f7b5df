//! Restaurant order-acceptance status

use serde::{Deserialize, Serialize};

/// `GET /restaurants/{id}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantStatus {
    pub accepting_orders: bool,
    /// Free text shown to diners while ordering is paused
    #[serde(default)]
    pub pause_message: Option<String>,
}
