//! Shared types for the table-side ordering client
//!
//! Wire models for the menu backend (tables, catalog, orders) and the
//! request/response DTOs exchanged with it. Everything here is plain data;
//! the HTTP plumbing lives in `dine-client`.

pub mod client;
pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{AuthResponse, ErrorBody, SendOtpRequest, VerifyOtpRequest};
pub use order::{
    AddItemsRequest, CancelItemRequest, CreateOrderRequest, Order, OrderItem, OrderItemInput,
    OrderItemStatus, OrderStatus,
};
