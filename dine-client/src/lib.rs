//! Dine Client - table-side ordering client for the menu backend
//!
//! Three persisted stores (table session, cart, auth), the checkout
//! orchestrator that drives OTP login and order placement, and the HTTP
//! gateway that talks to the backend.

pub mod app;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod navigation;
pub mod phone;
pub mod poller;
pub mod qr;
pub mod storage;
pub mod store;

pub use app::DinerApp;
pub use checkout::{Checkout, CheckoutAction, CheckoutError, CheckoutStep, PauseAdvisory, SubmitOutcome};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::MenuGateway;
pub use http::HttpClient;
pub use navigation::{Navigator, Route, RouteHistory};
pub use poller::{OrderPoller, OrdersView};
pub use qr::QrEntry;
pub use storage::{Storage, StorageError};
pub use store::{AuthSession, AuthStore, CartLine, CartStore, NewCartLine, TableData, TableSession, TableStore};

// Re-export shared types for convenience
pub use shared::models::{Category, DiningTable, Menu, Product, ProductDetail, RestaurantStatus};
pub use shared::order::{Order, OrderItem, OrderItemInput, OrderItemStatus, OrderStatus};
