//! Order types
//!
//! Orders are owned by the backend; the client only reads them and submits
//! new items. Status codes arrive either as names or as small integers and
//! are normalized on deserialization (see [`status`]).

pub mod status;
pub mod types;

// Re-exports
pub use status::{OrderItemStatus, OrderStatus};
pub use types::*;
