//! Order list poller
//!
//! Refreshes the diner's orders on a fixed interval and publishes the latest
//! view over a watch channel. A refresh that overruns the interval skips the
//! missed ticks instead of queueing them, so refreshes never overlap.

use std::sync::Arc;
use std::time::Duration;

use shared::order::Order;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::gateway::MenuGateway;

/// Latest state of the order list
#[derive(Debug, Clone, Default)]
pub struct OrdersView {
    pub orders: Vec<Order>,
    /// Error of the most recent refresh; previous orders are kept
    pub last_error: Option<String>,
    /// Completed refreshes, successful or not
    pub refreshes: u64,
    pub refreshed_at: Option<Instant>,
}

/// Background refresher; stops when cancelled or dropped
#[derive(Debug)]
pub struct OrderPoller {
    view: watch::Receiver<OrdersView>,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl OrderPoller {
    /// Start polling immediately, then every `interval`. Must be called from
    /// within a tokio runtime.
    pub fn spawn(gateway: Arc<dyn MenuGateway>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(OrdersView::default());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run(gateway, interval, tx, shutdown.clone()));
        Self {
            view: rx,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<OrdersView> {
        self.view.clone()
    }

    pub fn current(&self) -> OrdersView {
        self.view.borrow().clone()
    }

    /// Stop polling and wait for the task to finish
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "Order poller task ended abnormally");
        }
    }
}

impl Drop for OrderPoller {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run(
    gateway: Arc<dyn MenuGateway>,
    interval: Duration,
    tx: watch::Sender<OrdersView>,
    shutdown: CancellationToken,
) {
    tracing::debug!(interval_ms = interval.as_millis() as u64, "Order poller started");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = gateway.orders() => result,
        };

        tx.send_modify(|view| {
            match result {
                Ok(orders) => {
                    view.orders = orders;
                    view.last_error = None;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Order refresh failed");
                    view.last_error = Some(e.user_message());
                }
            }
            view.refreshes += 1;
            view.refreshed_at = Some(Instant::now());
        });
    }

    tracing::debug!("Order poller stopped");
}
