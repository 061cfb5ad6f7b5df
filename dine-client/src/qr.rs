//! QR landing: turn a scanned URL into a table session

use reqwest::Url;

use crate::app::DinerApp;
use crate::navigation::Route;
use crate::store::TableData;

/// Parameters carried by a table QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrEntry {
    pub table_number: u32,
    /// Menu explicitly chosen by the QR code, overriding the table's default
    pub menu_id: Option<String>,
}

impl QrEntry {
    /// Parse `...?table=12&menu=<id>`.
    ///
    /// Accepts a full URL, a path with query, or a bare query string. The
    /// table number is read from the leading digits of `table`; `menuId` is
    /// accepted as an alias of `menu`. Returns `None` without a usable table.
    pub fn from_url(input: &str) -> Option<Self> {
        let input = input.trim();
        let url = Url::parse(input).ok().or_else(|| {
            let base = Url::parse("http://localhost/").ok()?;
            let relative = if input.starts_with('/') || input.starts_with('?') {
                input.to_string()
            } else {
                format!("?{input}")
            };
            base.join(&relative).ok()
        })?;

        let mut table_number = None;
        let mut menu_id = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "table" => table_number = parse_leading_number(&value),
                "menu" | "menuId" if !value.trim().is_empty() => {
                    menu_id = Some(value.trim().to_string())
                }
                _ => {}
            }
        }

        Some(Self {
            table_number: table_number?,
            menu_id,
        })
    }
}

fn parse_leading_number(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Resolve a QR entry against the backend and store the table session.
///
/// When the table cannot be resolved a placeholder session (`table-{n}`) is
/// stored instead; it is re-resolved at submission time. Always lands on the
/// menu.
pub async fn resolve_entry(app: &DinerApp, entry: &QrEntry) -> Route {
    let gateway = app.gateway();
    let data = match gateway.table_by_number(entry.table_number).await {
        Ok(table) => {
            let mut data = TableData::from(table);
            if let Some(menu_id) = &entry.menu_id
                && data.menu_id.as_deref() != Some(menu_id.as_str())
            {
                data.menu_name = match gateway.menu(menu_id).await {
                    Ok(menu) => Some(menu.name),
                    Err(e) => {
                        tracing::warn!(menu_id = %menu_id, error = %e, "Menu override lookup failed");
                        None
                    }
                };
                data.menu_id = Some(menu_id.clone());
            }
            tracing::info!(
                table_id = %data.id,
                table_number = data.number,
                menu_id = ?data.menu_id,
                "Table resolved from QR"
            );
            data
        }
        Err(e) => {
            tracing::warn!(
                table_number = entry.table_number,
                error = %e,
                "Table lookup failed, keeping placeholder session"
            );
            let mut data = TableData::placeholder(entry.table_number);
            data.menu_id = entry.menu_id.clone();
            data
        }
    };

    app.table().set_table(data);
    app.navigator().navigate(Route::Menu);
    Route::Menu
}

/// Handle a scanned URL; without a usable table parameter the session is
/// left as is and the diner goes straight to the menu
pub async fn handle_scan(app: &DinerApp, input: &str) -> Route {
    match QrEntry::from_url(input) {
        Some(entry) => resolve_entry(app, &entry).await,
        None => {
            tracing::debug!("QR without a table parameter");
            app.navigator().navigate(Route::Menu);
            Route::Menu
        }
    }
}
