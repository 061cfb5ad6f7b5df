//! Navigation seam
//!
//! The client never renders anything itself; it only tells the host which
//! view to show next. Hosts (a CLI, a webview shell, tests) implement
//! [`Navigator`].

use std::sync::Mutex;

/// Views the client can send the diner to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// QR landing page
    Home,
    Menu,
    Product(String),
    Cart,
    /// Checkout entry point (phone/OTP/confirm)
    Checkout,
    /// Order accepted confirmation
    CheckoutSuccess { table_number: Option<u32> },
    Orders,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Menu => "/menu".to_string(),
            Route::Product(id) => format!("/menu/{id}"),
            Route::Cart => "/cart".to_string(),
            Route::Checkout => "/checkout".to_string(),
            Route::CheckoutSuccess { .. } => "/checkout/success".to_string(),
            Route::Orders => "/orders".to_string(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Host-provided routing
pub trait Navigator: Send + Sync {
    /// Route currently displayed
    fn current(&self) -> Route;

    fn navigate(&self, route: Route);

    /// Reload the current view from persisted state
    fn reload(&self);
}

#[derive(Debug)]
struct HistoryState {
    current: Route,
    visited: Vec<Route>,
    reloads: usize,
}

/// In-memory navigator that records every transition
#[derive(Debug)]
pub struct RouteHistory {
    state: Mutex<HistoryState>,
}

impl RouteHistory {
    pub fn new(start: Route) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                current: start,
                visited: Vec::new(),
                reloads: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Routes navigated to, oldest first (the start route is not included)
    pub fn visited(&self) -> Vec<Route> {
        self.lock().visited.clone()
    }

    pub fn reloads(&self) -> usize {
        self.lock().reloads
    }
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for RouteHistory {
    fn current(&self) -> Route {
        self.lock().current.clone()
    }

    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigate");
        let mut state = self.lock();
        state.current = route.clone();
        state.visited.push(route);
    }

    fn reload(&self) {
        tracing::debug!("Reload");
        self.lock().reloads += 1;
    }
}
