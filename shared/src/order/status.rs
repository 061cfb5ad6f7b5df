//! Order / order-item status with wire normalization
//!
//! The backend has shipped both encodings over time: `"Preparing"` and `2`
//! mean the same thing. Both are accepted here and nothing past this module
//! sees the raw form. Unknown numeric codes fall back to the first state of
//! the set (`Pending` for orders, `Active` for items) instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

/// Raw status as found on the wire
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Code(i64),
    Name(String),
}

// ============================================================================
// Order Status
// ============================================================================

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Numeric codes 0..=6 map onto this table in order
    const BY_CODE: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Normalize a numeric code; unknown codes become `Pending`
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::BY_CODE.get(i).copied())
            .unwrap_or_else(|| {
                tracing::warn!(code, "Unknown order status code, using Pending");
                OrderStatus::Pending
            })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::BY_CODE.iter().copied().find(|s| s.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Completed or cancelled orders no longer accept appended items
    pub fn is_finished(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawStatus::deserialize(deserializer)? {
            RawStatus::Code(code) => OrderStatus::from_code(code),
            RawStatus::Name(name) => OrderStatus::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(%name, "Unknown order status name, using Pending");
                OrderStatus::Pending
            }),
        })
    }
}

// ============================================================================
// Order Item Status
// ============================================================================

/// Per-item status inside an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum OrderItemStatus {
    Pending,
    #[default]
    Active,
    Cancelled,
}

impl OrderItemStatus {
    const BY_CODE: [OrderItemStatus; 3] = [
        OrderItemStatus::Pending,
        OrderItemStatus::Active,
        OrderItemStatus::Cancelled,
    ];

    /// Normalize a numeric code; unknown codes become `Active`
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::BY_CODE.get(i).copied())
            .unwrap_or_else(|| {
                tracing::warn!(code, "Unknown order item status code, using Active");
                OrderItemStatus::Active
            })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::BY_CODE.iter().copied().find(|s| s.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderItemStatus::Pending => "Pending",
            OrderItemStatus::Active => "Active",
            OrderItemStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderItemStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawStatus::deserialize(deserializer)? {
            RawStatus::Code(code) => OrderItemStatus::from_code(code),
            RawStatus::Name(name) => OrderItemStatus::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(%name, "Unknown order item status name, using Active");
                OrderItemStatus::Active
            }),
        })
    }
}
