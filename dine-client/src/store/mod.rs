//! Client state containers
//!
//! Each store owns one persisted snapshot and is rehydrated once at startup
//! (see [`crate::DinerApp::rehydrate`]). Mutations persist immediately; a
//! failed write is logged and the in-memory state stays authoritative.

pub mod auth;
pub mod cart;
pub mod table;

pub use auth::{AuthSession, AuthStore, SEND_OTP_FAILED, VERIFY_OTP_FAILED};
pub use cart::{CartLine, CartStore, NewCartLine, SERVICE_RATE};
pub use table::{TableData, TableSession, TableStore};
