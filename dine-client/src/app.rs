//! Application state container

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::gateway::MenuGateway;
use crate::http::HttpClient;
use crate::navigation::Navigator;
use crate::storage::Storage;
use crate::store::{AuthStore, CartStore, TableStore};

/// The three client stores plus the collaborators they talk to.
///
/// Built once at startup by [`DinerApp::rehydrate`] and shared behind an
/// `Arc`. Store locks are synchronous and never held across an await.
pub struct DinerApp {
    gateway: Arc<dyn MenuGateway>,
    navigator: Arc<dyn Navigator>,
    storage: Storage,
    table: Mutex<TableStore>,
    cart: Mutex<CartStore>,
    auth: AuthStore,
}

impl std::fmt::Debug for DinerApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DinerApp")
            .field("storage", &self.storage)
            .field("table", &self.table)
            .field("cart", &self.cart)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl DinerApp {
    /// Restore every store from `storage`
    pub fn rehydrate(
        storage: Storage,
        gateway: Arc<dyn MenuGateway>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let app = Self {
            table: Mutex::new(TableStore::rehydrate(storage.clone())),
            cart: Mutex::new(CartStore::rehydrate(storage.clone())),
            auth: AuthStore::rehydrate(storage.clone()),
            gateway,
            navigator,
            storage,
        };
        tracing::debug!(
            table = ?app.table.lock().session().table_number,
            cart_lines = app.cart.lock().lines().len(),
            authenticated = app.auth.is_authenticated(),
            "Client state rehydrated"
        );
        app
    }

    /// Wire file storage and the HTTP gateway from configuration
    pub fn connect(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        let storage = Storage::file(&config.data_dir);
        let gateway = HttpClient::new(config, storage.clone(), navigator.clone())?;
        Ok(Self::rehydrate(storage, Arc::new(gateway), navigator))
    }

    /// Re-read every store from persisted state
    pub fn reload(&mut self) {
        *self = Self::rehydrate(
            self.storage.clone(),
            self.gateway.clone(),
            self.navigator.clone(),
        );
    }

    pub fn gateway(&self) -> &dyn MenuGateway {
        self.gateway.as_ref()
    }

    pub fn gateway_handle(&self) -> Arc<dyn MenuGateway> {
        self.gateway.clone()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn table(&self) -> MutexGuard<'_, TableStore> {
        self.table.lock()
    }

    pub fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.cart.lock()
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }
}
