// Shared fixtures for dine-client integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dine_client::storage::{AUTH_KEY, TOKEN_KEY};
use dine_client::{
    AuthSession, Category, ClientError, ClientResult, DinerApp, DiningTable, Menu, MenuGateway,
    NewCartLine, Order, OrderItemInput, OrderStatus, Product, ProductDetail, RestaurantStatus,
    RouteHistory, Storage,
};
use rust_decimal::Decimal;
use shared::client::AuthResponse;
use shared::order::CreateOrderRequest;

/// Scripted gateway: every response is configured by the test
#[derive(Default)]
pub struct FakeGateway {
    pub tables: Mutex<HashMap<u32, DiningTable>>,
    pub menus: Mutex<HashMap<String, Menu>>,
    pub restaurant: Mutex<Option<RestaurantStatus>>,
    pub active: Mutex<Option<Order>>,
    pub orders: Mutex<Vec<Order>>,

    pub fail_send_otp: Mutex<bool>,
    pub fail_verify_otp: Mutex<bool>,
    pub fail_active_lookup: Mutex<bool>,
    pub fail_orders: Mutex<bool>,
    /// Server message returned by the next order write
    pub fail_submit: Mutex<Option<String>>,
    /// Order writes answer 401
    pub unauthorized: Mutex<bool>,
    /// Delay applied to order writes
    pub submit_delay: Mutex<Option<Duration>>,
    /// Delay applied to OTP send and verify
    pub otp_delay: Mutex<Option<Duration>>,
    /// Delay applied to the order list
    pub orders_delay: Mutex<Option<Duration>>,
    /// Delay applied to the restaurant status lookup
    pub restaurant_delay: Mutex<Option<Duration>>,

    /// Order list requests running right now, and the most seen at once
    pub orders_in_flight: AtomicUsize,
    pub orders_peak: AtomicUsize,

    pub created: Mutex<Vec<CreateOrderRequest>>,
    pub appended: Mutex<Vec<(String, Vec<OrderItemInput>)>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_table(self: Arc<Self>, table: DiningTable) -> Arc<Self> {
        self.tables.lock().unwrap().insert(table.number, table);
        self
    }

    pub fn set<T>(slot: &Mutex<T>, value: T) {
        *slot.lock().unwrap() = value;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    pub fn peak_orders_in_flight(&self) -> usize {
        self.orders_peak.load(Ordering::SeqCst)
    }

    async fn pause(slot: &Mutex<Option<Duration>>) {
        let delay = *slot.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn order_write(&self) -> ClientResult<()> {
        Self::pause(&self.submit_delay).await;
        if *self.unauthorized.lock().unwrap() {
            return Err(ClientError::Unauthorized);
        }
        if let Some(message) = self.fail_submit.lock().unwrap().take() {
            return Err(ClientError::Api {
                status: 500,
                message: Some(message),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MenuGateway for FakeGateway {
    async fn table_by_number(&self, number: u32) -> ClientResult<DiningTable> {
        self.record("table_by_number");
        self.tables
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Table not found".into()))
    }

    async fn categories(&self, _menu_id: Option<&str>) -> ClientResult<Vec<Category>> {
        self.record("categories");
        Ok(Vec::new())
    }

    async fn products(
        &self,
        _category_id: Option<&str>,
        _menu_id: Option<&str>,
    ) -> ClientResult<Vec<Product>> {
        self.record("products");
        Ok(Vec::new())
    }

    async fn product(&self, id: &str) -> ClientResult<ProductDetail> {
        self.record("product");
        Err(ClientError::NotFound(format!("Product {id} not found")))
    }

    async fn menu(&self, id: &str) -> ClientResult<Menu> {
        self.record("menu");
        self.menus
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Menu not found".into()))
    }

    async fn restaurant_status(&self, _restaurant_id: &str) -> ClientResult<RestaurantStatus> {
        self.record("restaurant_status");
        Self::pause(&self.restaurant_delay).await;
        self.restaurant.lock().unwrap().clone().ok_or(ClientError::Api {
            status: 503,
            message: None,
        })
    }

    async fn send_otp(&self, _phone: &str) -> ClientResult<()> {
        self.record("send_otp");
        Self::pause(&self.otp_delay).await;
        if *self.fail_send_otp.lock().unwrap() {
            return Err(ClientError::Validation("Invalid phone".into()));
        }
        Ok(())
    }

    async fn verify_otp(&self, phone: &str, _code: &str) -> ClientResult<AuthResponse> {
        self.record("verify_otp");
        Self::pause(&self.otp_delay).await;
        if *self.fail_verify_otp.lock().unwrap() {
            return Err(ClientError::Validation("Invalid code".into()));
        }
        Ok(AuthResponse {
            token: "token-abc".into(),
            user_id: "u-1".into(),
            phone: phone.to_string(),
        })
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        self.record("create_order");
        self.order_write().await?;
        self.created.lock().unwrap().push(request.clone());
        Ok(order("o-new", &request.table_id, OrderStatus::Pending))
    }

    async fn order(&self, id: &str) -> ClientResult<Order> {
        self.record("order");
        Err(ClientError::NotFound(format!("Order {id} not found")))
    }

    async fn active_order(&self, _table_id: &str) -> ClientResult<Option<Order>> {
        self.record("active_order");
        if *self.fail_active_lookup.lock().unwrap() {
            return Err(ClientError::Api {
                status: 502,
                message: None,
            });
        }
        Ok(self.active.lock().unwrap().clone())
    }

    async fn add_items(&self, order_id: &str, items: &[OrderItemInput]) -> ClientResult<()> {
        self.record("add_items");
        self.order_write().await?;
        self.appended
            .lock()
            .unwrap()
            .push((order_id.to_string(), items.to_vec()));
        Ok(())
    }

    async fn orders(&self) -> ClientResult<Vec<Order>> {
        self.record("orders");
        let running = self.orders_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.orders_peak.fetch_max(running, Ordering::SeqCst);
        Self::pause(&self.orders_delay).await;
        self.orders_in_flight.fetch_sub(1, Ordering::SeqCst);

        if *self.fail_orders.lock().unwrap() {
            return Err(ClientError::Api {
                status: 500,
                message: Some("Database unavailable".into()),
            });
        }
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn cancel_item(&self, _order_id: &str, _item_id: &str) -> ClientResult<()> {
        self.record("cancel_item");
        Ok(())
    }
}

// ========== Builders ==========

pub fn table(number: u32, id: &str) -> DiningTable {
    DiningTable {
        id: id.to_string(),
        number,
        qr_code: format!("QR-{number}"),
        is_active: true,
        restaurant_id: Some("r-1".into()),
        restaurant_name: Some("Rohat".into()),
        menu_id: Some("m-main".into()),
        menu_name: Some("Main".into()),
    }
}

pub fn order(id: &str, table_id: &str, status: OrderStatus) -> Order {
    Order {
        id: id.to_string(),
        user_id: "u-1".into(),
        table_id: table_id.to_string(),
        table_number: 12,
        table_name: None,
        table_type_name: None,
        restaurant_id: Some("r-1".into()),
        restaurant_name: None,
        created_at: "2026-10-16T12:00:00Z".into(),
        status,
        subtotal: Decimal::ZERO,
        service_fee: Decimal::ZERO,
        total: Decimal::ZERO,
        special_instructions: None,
        items: Vec::new(),
        has_pending_items: None,
    }
}

pub fn plov(quantity: u32) -> NewCartLine {
    NewCartLine {
        product_id: "p-plov".into(),
        product_name: "Plov".into(),
        image_url: None,
        size_id: Some("s-large".into()),
        size_name: Some("Large".into()),
        addon_ids: vec!["a-salad".into()],
        addon_names: vec!["Salad".into()],
        quantity,
        unit_price: Decimal::from(63),
    }
}

/// Mark storage as holding a logged-in diner
pub fn sign_in(storage: &Storage) {
    storage.set_raw(TOKEN_KEY, "token-abc").unwrap();
    storage
        .save(
            AUTH_KEY,
            &AuthSession {
                token: Some("token-abc".into()),
                user_id: Some("u-1".into()),
                phone: Some("+992935551234".into()),
                is_authenticated: true,
            },
        )
        .unwrap();
}

pub struct Harness {
    pub app: Arc<DinerApp>,
    pub gateway: Arc<FakeGateway>,
    pub navigator: Arc<RouteHistory>,
    pub storage: Storage,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dine_client=debug")
        .with_test_writer()
        .try_init();
}

/// App over in-memory storage prepared by `prepare`
pub fn harness(gateway: Arc<FakeGateway>, prepare: impl FnOnce(&Storage)) -> Harness {
    init_tracing();
    let storage = Storage::in_memory();
    prepare(&storage);
    let navigator = Arc::new(RouteHistory::default());
    let app = DinerApp::rehydrate(storage.clone(), gateway.clone(), navigator.clone());
    Harness {
        app: Arc::new(app),
        gateway,
        navigator,
        storage,
    }
}
