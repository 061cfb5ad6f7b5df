//! Catalog/order gateway contract
//!
//! Every backend interaction goes through this trait. [`crate::HttpClient`]
//! is the production implementation; tests script their own.

use async_trait::async_trait;
use shared::client::AuthResponse;
use shared::models::{Category, DiningTable, Menu, Product, ProductDetail, RestaurantStatus};
use shared::order::{CreateOrderRequest, Order, OrderItemInput};

use crate::error::ClientResult;

#[async_trait]
pub trait MenuGateway: Send + Sync {
    // ========== Tables / catalog ==========

    /// `GET /tables/by-number/{number}`
    async fn table_by_number(&self, number: u32) -> ClientResult<DiningTable>;

    /// `GET /categories[?menuId=]`
    async fn categories(&self, menu_id: Option<&str>) -> ClientResult<Vec<Category>>;

    /// `GET /products[?categoryId=][&menuId=]`
    async fn products(
        &self,
        category_id: Option<&str>,
        menu_id: Option<&str>,
    ) -> ClientResult<Vec<Product>>;

    /// `GET /products/{id}`
    async fn product(&self, id: &str) -> ClientResult<ProductDetail>;

    /// `GET /menus/{id}`
    async fn menu(&self, id: &str) -> ClientResult<Menu>;

    /// `GET /restaurants/{id}/status`
    async fn restaurant_status(&self, restaurant_id: &str) -> ClientResult<RestaurantStatus>;

    // ========== Auth ==========

    /// `POST /auth/send-otp`
    async fn send_otp(&self, phone: &str) -> ClientResult<()>;

    /// `POST /auth/verify-otp`
    async fn verify_otp(&self, phone: &str, code: &str) -> ClientResult<AuthResponse>;

    // ========== Orders ==========

    /// `POST /orders`
    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order>;

    /// `GET /orders/{id}`
    async fn order(&self, id: &str) -> ClientResult<Order>;

    /// `GET /orders/active?tableId=`; `None` when the table has no order
    async fn active_order(&self, table_id: &str) -> ClientResult<Option<Order>>;

    /// `POST /orders/{id}/items`
    async fn add_items(&self, order_id: &str, items: &[OrderItemInput]) -> ClientResult<()>;

    /// `GET /orders`
    async fn orders(&self) -> ClientResult<Vec<Order>>;

    /// `POST /orders/{id}/items/{itemId}/cancel`
    async fn cancel_item(&self, order_id: &str, item_id: &str) -> ClientResult<()>;
}
