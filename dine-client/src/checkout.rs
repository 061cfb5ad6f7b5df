//! Checkout orchestration
//!
//! Drives the phone -> OTP -> confirm sequence, the restaurant pause
//! advisory and order placement (append to the table's active order or
//! create a new one).

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared::order::{CreateOrderRequest, Order};
use thiserror::Error;

use crate::app::DinerApp;
use crate::error::ClientError;
use crate::gateway::MenuGateway;
use crate::navigation::Route;
use crate::phone::{OtpInput, PhoneInput};
use crate::store::{TableData, TableSession};

/// Shown when the backend reports ordering as paused without a reason
pub const DEFAULT_PAUSE_MESSAGE: &str =
    "The restaurant is not accepting orders right now. Please try again later.";

/// How long the pause advisory lookup may take before checkout proceeds
/// without it
pub const ADVISORY_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Phone,
    Otp,
    Confirm,
}

/// Network-bound checkout actions; at most one runs at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutAction {
    SendOtp,
    VerifyOtp,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Enter a complete phone number")]
    InvalidPhone,

    #[error("Enter the 4-digit code")]
    InvalidOtp,

    #[error("Not available at the {0:?} step")]
    WrongStep(CheckoutStep),

    #[error("{0:?} is already in progress")]
    Busy(CheckoutAction),

    #[error("Table not identified. Scan the QR code.")]
    TableUnknown,

    #[error("Could not find the table. Try scanning the QR code again.")]
    TableNotFound,

    #[error("SMS send failed, try again")]
    SendOtp,

    #[error("Invalid code, try again")]
    VerifyOtp,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Error: {0}")]
    Submit(String),

    #[error("Session expired, please sign in again")]
    SessionExpired,
}

/// Ordering is paused at the restaurant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseAdvisory {
    pub message: String,
}

/// How an accepted order was placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new order was created
    Created {
        order_id: String,
        table_number: Option<u32>,
    },
    /// Items were appended to the table's active order
    Appended {
        order_id: String,
        table_number: Option<u32>,
    },
}

impl SubmitOutcome {
    pub fn order_id(&self) -> &str {
        match self {
            SubmitOutcome::Created { order_id, .. } | SubmitOutcome::Appended { order_id, .. } => {
                order_id
            }
        }
    }

    pub fn table_number(&self) -> Option<u32> {
        match self {
            SubmitOutcome::Created { table_number, .. }
            | SubmitOutcome::Appended { table_number, .. } => *table_number,
        }
    }
}

/// Query the restaurant's status; `None` when ordering is open.
///
/// Fails open: lookup errors are logged and treated as "accepting orders".
pub async fn fetch_pause_advisory(
    gateway: &dyn MenuGateway,
    restaurant_id: &str,
) -> Option<PauseAdvisory> {
    match gateway.restaurant_status(restaurant_id).await {
        Ok(status) if status.accepting_orders => None,
        Ok(status) => {
            let message = status
                .pause_message
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_PAUSE_MESSAGE.to_string());
            Some(PauseAdvisory { message })
        }
        Err(e) => {
            tracing::warn!(restaurant_id, error = %e, "Restaurant status check failed");
            None
        }
    }
}

// ============================================================================
// In-flight guard
// ============================================================================

/// Releases the in-flight slot on drop, including when the owning future is
/// dropped before completion
struct InFlight<'a> {
    slot: &'a Mutex<Option<CheckoutAction>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

#[derive(Debug)]
struct CheckoutState {
    step: CheckoutStep,
    phone: PhoneInput,
    otp: OtpInput,
    instructions: String,
    submit_error: Option<String>,
    advisory: Option<PauseAdvisory>,
}

/// Checkout session, created when the diner enters the checkout view
#[derive(Debug)]
pub struct Checkout {
    app: Arc<DinerApp>,
    state: Mutex<CheckoutState>,
    in_flight: Mutex<Option<CheckoutAction>>,
    advisory_timeout: Duration,
}

impl Checkout {
    /// Enter checkout.
    ///
    /// An empty cart sends the diner back to the cart view and returns `None`.
    pub fn open(app: Arc<DinerApp>) -> Option<Self> {
        if app.cart().is_empty() {
            tracing::debug!("Checkout with an empty cart, redirecting to cart");
            app.navigator().navigate(Route::Cart);
            return None;
        }

        let step = if app.auth().is_authenticated() {
            CheckoutStep::Confirm
        } else {
            CheckoutStep::Phone
        };
        Some(Self {
            app,
            state: Mutex::new(CheckoutState {
                step,
                phone: PhoneInput::default(),
                otp: OtpInput::default(),
                instructions: String::new(),
                submit_error: None,
                advisory: None,
            }),
            in_flight: Mutex::new(None),
            advisory_timeout: ADVISORY_TIMEOUT,
        })
    }

    pub fn with_advisory_timeout(mut self, timeout: Duration) -> Self {
        self.advisory_timeout = timeout;
        self
    }

    pub fn app(&self) -> &Arc<DinerApp> {
        &self.app
    }

    pub fn step(&self) -> CheckoutStep {
        self.state.lock().step
    }

    /// Phone number in display form
    pub fn phone(&self) -> String {
        self.state.lock().phone.as_str().to_string()
    }

    pub fn otp(&self) -> String {
        self.state.lock().otp.as_str().to_string()
    }

    pub fn instructions(&self) -> String {
        self.state.lock().instructions.clone()
    }

    /// Error from the last OTP send/verify
    pub fn auth_error(&self) -> Option<String> {
        self.app.auth().error()
    }

    /// Error from the last submission attempt
    pub fn submit_error(&self) -> Option<String> {
        self.state.lock().submit_error.clone()
    }

    pub fn advisory(&self) -> Option<PauseAdvisory> {
        self.state.lock().advisory.clone()
    }

    /// Action currently awaiting the backend
    pub fn in_flight(&self) -> Option<CheckoutAction> {
        *self.in_flight.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight().is_some()
    }

    // ========== Input ==========

    /// Apply phone field input; overlong input is ignored
    pub fn input_phone(&self, raw: &str) -> bool {
        self.state.lock().phone.update(raw)
    }

    pub fn input_otp(&self, raw: &str) {
        self.state.lock().otp.update(raw);
    }

    pub fn set_instructions(&self, text: &str) {
        self.state.lock().instructions = text.to_string();
    }

    fn require_step(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        match self.step() {
            step if step == expected => Ok(()),
            step => Err(CheckoutError::WrongStep(step)),
        }
    }

    fn acquire(&self, action: CheckoutAction) -> Result<InFlight<'_>, CheckoutError> {
        let mut slot = self.in_flight.lock();
        if let Some(current) = *slot {
            return Err(CheckoutError::Busy(current));
        }
        *slot = Some(action);
        Ok(InFlight {
            slot: &self.in_flight,
        })
    }

    // ========== Phone / OTP ==========

    /// Phone -> Otp: request a code for the entered number
    pub async fn send_code(&self) -> Result<(), CheckoutError> {
        self.require_step(CheckoutStep::Phone)?;
        let phone = {
            let state = self.state.lock();
            if !state.phone.is_complete() {
                return Err(CheckoutError::InvalidPhone);
            }
            state.phone.e164()
        };
        let _guard = self.acquire(CheckoutAction::SendOtp)?;

        if self
            .app
            .auth()
            .send_otp(self.app.gateway(), &phone)
            .await
            .is_err()
        {
            return Err(CheckoutError::SendOtp);
        }

        let mut state = self.state.lock();
        state.otp.clear();
        state.step = CheckoutStep::Otp;
        Ok(())
    }

    /// Otp -> Confirm: verify the entered code
    pub async fn verify_code(&self) -> Result<(), CheckoutError> {
        self.require_step(CheckoutStep::Otp)?;
        let (phone, code) = {
            let state = self.state.lock();
            if !state.otp.is_complete() {
                return Err(CheckoutError::InvalidOtp);
            }
            (state.phone.e164(), state.otp.as_str().to_string())
        };
        let _guard = self.acquire(CheckoutAction::VerifyOtp)?;

        if self
            .app
            .auth()
            .verify_otp(self.app.gateway(), &phone, &code)
            .await
            .is_err()
        {
            return Err(CheckoutError::VerifyOtp);
        }

        self.state.lock().step = CheckoutStep::Confirm;
        Ok(())
    }

    /// Otp -> Phone
    pub fn change_number(&self) {
        let mut state = self.state.lock();
        if state.step == CheckoutStep::Otp {
            state.step = CheckoutStep::Phone;
            state.otp.clear();
            drop(state);
            self.app.auth().clear_error();
        }
    }

    // ========== Restaurant advisory ==========

    /// Look up whether the restaurant is accepting orders and record the
    /// advisory if it is not. Never fails; a lookup slower than the advisory
    /// timeout is abandoned and counts as open.
    pub async fn check_restaurant(&self) -> Option<PauseAdvisory> {
        let restaurant_id = self.app.table().session().restaurant_id.clone()?;
        let lookup = fetch_pause_advisory(self.app.gateway(), &restaurant_id);
        let advisory = match tokio::time::timeout(self.advisory_timeout, lookup).await {
            Ok(advisory) => advisory,
            Err(_) => {
                tracing::warn!(
                    restaurant_id = %restaurant_id,
                    timeout_ms = self.advisory_timeout.as_millis() as u64,
                    "Restaurant status check timed out"
                );
                None
            }
        };
        self.state.lock().advisory = advisory.clone();
        advisory
    }

    pub fn dismiss_advisory(&self) {
        self.state.lock().advisory = None;
    }

    /// Leave checkout for the menu from the advisory
    pub fn advisory_back_to_menu(&self) {
        self.dismiss_advisory();
        self.app.navigator().navigate(Route::Menu);
    }

    // ========== Submission ==========

    /// Confirm: place the cart as an order for the current table.
    ///
    /// On success the cart is cleared and the diner is sent to the
    /// confirmation view. On failure the cart is left untouched and the
    /// error is kept for display; the call may be retried.
    pub async fn submit(&self) -> Result<SubmitOutcome, CheckoutError> {
        self.require_step(CheckoutStep::Confirm)?;
        let _guard = self.acquire(CheckoutAction::Submit)?;
        self.state.lock().submit_error = None;

        match self.place_order().await {
            Ok(outcome) => {
                self.app.cart().clear_cart();
                self.state.lock().instructions.clear();
                tracing::info!(
                    order_id = outcome.order_id(),
                    table_number = ?outcome.table_number(),
                    appended = matches!(outcome, SubmitOutcome::Appended { .. }),
                    "Order placed"
                );
                self.app.navigator().navigate(Route::CheckoutSuccess {
                    table_number: outcome.table_number(),
                });
                Ok(outcome)
            }
            Err(e) => {
                if e == CheckoutError::EmptyCart {
                    self.app.navigator().navigate(Route::Cart);
                }
                self.state.lock().submit_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn place_order(&self) -> Result<SubmitOutcome, CheckoutError> {
        let items = self.app.cart().order_items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let session = self.app.table().session().clone();
        if !session.has_table() {
            return Err(CheckoutError::TableUnknown);
        }

        let (table_id, table_number) = self.resolve_table(&session).await?;
        let active = self.active_order(&table_id).await?;

        let gateway = self.app.gateway();
        match active {
            Some(order) => {
                tracing::debug!(order_id = %order.id, "Appending to active order");
                gateway
                    .add_items(&order.id, &items)
                    .await
                    .map_err(|e| self.submit_failure(e))?;
                Ok(SubmitOutcome::Appended {
                    order_id: order.id,
                    table_number,
                })
            }
            None => {
                let instructions = self.state.lock().instructions.trim().to_string();
                let request = CreateOrderRequest {
                    table_id,
                    special_instructions: (!instructions.is_empty()).then_some(instructions),
                    items,
                };
                let order = gateway
                    .create_order(&request)
                    .await
                    .map_err(|e| self.submit_failure(e))?;
                Ok(SubmitOutcome::Created {
                    order_id: order.id,
                    table_number,
                })
            }
        }
    }

    /// Backend table id for the session, re-resolving placeholders by number
    async fn resolve_table(
        &self,
        session: &TableSession,
    ) -> Result<(String, Option<u32>), CheckoutError> {
        if !session.needs_resolution() {
            if let Some(id) = session.table_id.clone() {
                return Ok((id, session.table_number));
            }
        }
        let number = session.table_number.ok_or(CheckoutError::TableUnknown)?;

        let table = match self.app.gateway().table_by_number(number).await {
            Ok(table) => table,
            Err(ClientError::Unauthorized) => return Err(self.session_expired()),
            Err(e) => {
                tracing::warn!(table_number = number, error = %e, "Table re-resolution failed");
                return Err(CheckoutError::TableNotFound);
            }
        };

        let mut data = TableData::from(table);
        if session.menu_id.is_some() {
            data.menu_id = session.menu_id.clone();
            data.menu_name = session.menu_name.clone();
        }
        let resolved = (data.id.clone(), Some(data.number));
        tracing::info!(table_id = %resolved.0, table_number = number, "Table re-resolved");
        self.app.table().set_table(data);
        Ok(resolved)
    }

    /// Active order that still accepts items; lookup failures count as none
    async fn active_order(&self, table_id: &str) -> Result<Option<Order>, CheckoutError> {
        match self.app.gateway().active_order(table_id).await {
            Ok(order) => Ok(order.filter(Order::accepts_items)),
            Err(ClientError::Unauthorized) => Err(self.session_expired()),
            Err(e) => {
                tracing::warn!(table_id, error = %e, "Active order lookup failed");
                Ok(None)
            }
        }
    }

    fn submit_failure(&self, error: ClientError) -> CheckoutError {
        if matches!(error, ClientError::Unauthorized) {
            return self.session_expired();
        }
        tracing::error!(error = %error, "Order submission failed");
        CheckoutError::Submit(error.user_message())
    }

    /// The gateway has already dropped the persisted credentials
    fn session_expired(&self) -> CheckoutError {
        self.app.auth().logout();
        let mut state = self.state.lock();
        state.step = CheckoutStep::Phone;
        state.otp.clear();
        CheckoutError::SessionExpired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_display() {
        let err = CheckoutError::Submit("Kitchen is closed".into());
        assert_eq!(err.to_string(), "Error: Kitchen is closed");
        assert_eq!(
            CheckoutError::TableNotFound.to_string(),
            "Could not find the table. Try scanning the QR code again."
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = SubmitOutcome::Appended {
            order_id: "o-1".into(),
            table_number: Some(12),
        };
        assert_eq!(outcome.order_id(), "o-1");
        assert_eq!(outcome.table_number(), Some(12));
    }
}
