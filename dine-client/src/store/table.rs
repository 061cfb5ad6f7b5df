//! Table session store

use serde::{Deserialize, Serialize};
use shared::models::DiningTable;

use crate::storage::{Storage, TABLE_KEY};

/// Prefix of client-synthesized table ids
pub const PLACEHOLDER_PREFIX: &str = "table-";

/// Placeholder id for a table the backend could not resolve yet
pub fn placeholder_id(number: u32) -> String {
    format!("{PLACEHOLDER_PREFIX}{number}")
}

pub fn is_placeholder_id(id: &str) -> bool {
    id.starts_with(PLACEHOLDER_PREFIX)
}

/// Which table/menu/restaurant this device is ordering for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSession {
    pub table_id: Option<String>,
    pub table_number: Option<u32>,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub menu_id: Option<String>,
    pub menu_name: Option<String>,
}

impl TableSession {
    /// Whether there is anything to identify the table by
    pub fn has_table(&self) -> bool {
        self.table_id.is_some() || self.table_number.is_some()
    }

    /// The held id is absent or was synthesized on the client
    pub fn needs_resolution(&self) -> bool {
        self.table_id.as_deref().is_none_or(is_placeholder_id)
    }
}

/// Full replacement for the table session; absent fields are cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub id: String,
    pub number: u32,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub menu_id: Option<String>,
    pub menu_name: Option<String>,
}

impl TableData {
    /// Session data for a table the backend has not confirmed
    pub fn placeholder(number: u32) -> Self {
        Self {
            id: placeholder_id(number),
            number,
            restaurant_id: None,
            restaurant_name: None,
            menu_id: None,
            menu_name: None,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

impl From<DiningTable> for TableData {
    fn from(table: DiningTable) -> Self {
        Self {
            id: table.id,
            number: table.number,
            restaurant_id: table.restaurant_id.and_then(non_empty),
            restaurant_name: table.restaurant_name.and_then(non_empty),
            menu_id: table.menu_id.and_then(non_empty),
            menu_name: table.menu_name.and_then(non_empty),
        }
    }
}

/// Persisted table session
#[derive(Debug)]
pub struct TableStore {
    storage: Storage,
    session: TableSession,
}

impl TableStore {
    /// Restore the persisted session (empty when none)
    pub fn rehydrate(storage: Storage) -> Self {
        let session = storage.load_or_default(TABLE_KEY);
        Self { storage, session }
    }

    pub fn session(&self) -> &TableSession {
        &self.session
    }

    /// Overwrite the whole session
    pub fn set_table(&mut self, data: TableData) {
        self.session = TableSession {
            table_id: Some(data.id),
            table_number: Some(data.number),
            restaurant_id: data.restaurant_id,
            restaurant_name: data.restaurant_name,
            menu_id: data.menu_id,
            menu_name: data.menu_name,
        };
        tracing::debug!(
            table_id = ?self.session.table_id,
            table_number = ?self.session.table_number,
            "Table session set"
        );
        self.persist();
    }

    /// Reset every field
    pub fn clear_table(&mut self) {
        self.session = TableSession::default();
        tracing::debug!("Table session cleared");
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(TABLE_KEY, &self.session) {
            tracing::warn!(error = %e, "Failed to persist table session");
        }
    }
}
