//! Order read models and submission payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::{OrderItemStatus, OrderStatus};

// ============================================================================
// Read models
// ============================================================================

/// Order as returned by `/orders` endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub table_id: String,
    #[serde(default)]
    pub table_number: u32,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub table_type_name: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    /// ISO-8601 timestamp as sent by the backend
    #[serde(default)]
    pub created_at: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub service_fee: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub has_pending_items: Option<bool>,
}

impl Order {
    /// Whether new items may be appended to this order
    pub fn accepts_items(&self) -> bool {
        !self.status.is_finished()
    }
}

/// A single line inside an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub size_name: Option<String>,
    #[serde(default)]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub total_price: Decimal,
    #[serde(default)]
    pub selected_addons: Option<Vec<String>>,
    #[serde(default)]
    pub status: OrderItemStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
}

// ============================================================================
// Submission payloads
// ============================================================================

/// Item sent when creating an order or appending to one.
///
/// `addon_ids` is omitted entirely when there are none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_id: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_ids: Option<Vec<String>>,
}

impl OrderItemInput {
    pub fn new(
        product_id: impl Into<String>,
        size_id: Option<String>,
        quantity: u32,
        addon_ids: Vec<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size_id,
            quantity,
            addon_ids: (!addon_ids.is_empty()).then_some(addon_ids),
        }
    }
}

/// `POST /orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub table_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub items: Vec<OrderItemInput>,
}

/// `POST /orders/{id}/items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItemsRequest {
    pub items: Vec<OrderItemInput>,
}

/// `POST /orders/{id}/items/{itemId}/cancel`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_input_omits_empty_addons() {
        let item = OrderItemInput::new("p-1", None, 2, vec![]);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"productId": "p-1", "quantity": 2})
        );

        let item = OrderItemInput::new("p-1", Some("s-2".into()), 1, vec!["a-1".into()]);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"productId": "p-1", "sizeId": "s-2", "quantity": 1, "addonIds": ["a-1"]})
        );
    }

    #[test]
    fn test_create_request_omits_missing_instructions() {
        let req = CreateOrderRequest {
            table_id: "t-1".into(),
            special_instructions: None,
            items: vec![OrderItemInput::new("p-1", None, 1, vec![])],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("specialInstructions").is_none());
        assert_eq!(value["tableId"], "t-1");
    }

    #[test]
    fn test_order_with_numeric_statuses() {
        let json = json!({
            "id": "o-1",
            "userId": "u-1",
            "tableId": "t-1",
            "tableNumber": 12,
            "createdAt": "2026-10-16T12:30:00Z",
            "status": 2,
            "subtotal": 100,
            "serviceFee": 10,
            "total": 110,
            "items": [{
                "id": "i-1",
                "productId": "p-1",
                "productName": "Plov",
                "unitPrice": 50,
                "quantity": 2,
                "totalPrice": 100,
                "status": 1
            }]
        });
        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.items[0].status, OrderItemStatus::Active);
        assert_eq!(order.total, Decimal::from(110));
        assert!(order.accepts_items());
    }
}
