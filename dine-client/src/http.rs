//! HTTP gateway for the menu backend

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{AuthResponse, ErrorBody, SendOtpRequest, VerifyOtpRequest};
use shared::models::{Category, DiningTable, Menu, Product, ProductDetail, RestaurantStatus};
use shared::order::{AddItemsRequest, CancelItemRequest, CreateOrderRequest, Order, OrderItemInput};

use crate::catalog::resolve_image_url;
use crate::gateway::MenuGateway;
use crate::navigation::{Navigator, Route};
use crate::storage::{AUTH_KEY, Storage, TOKEN_KEY};
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for the menu backend.
///
/// Reads the bearer token from persisted storage on every request, so a
/// token written by [`crate::AuthStore`] is picked up immediately. A 401
/// clears the persisted credentials and sends the diner back to checkout.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    api_url: Url,
    asset_base: String,
    storage: Storage,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("api_url", &self.api_url.as_str())
            .field("asset_base", &self.asset_base)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(
        config: &ClientConfig,
        storage: Storage,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        let api_url = Url::parse(&config.api_url())
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.api_url())))?;
        if api_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.api_url()));
        }

        Ok(Self {
            client,
            api_url,
            asset_base: config.asset_base().to_string(),
            storage,
            navigator,
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Resolve a product image reference against the backend host
    pub fn image_url(&self, raw: Option<&str>) -> Option<String> {
        resolve_image_url(&self.asset_base, raw)
    }

    /// Token currently persisted, if any
    pub fn token(&self) -> Option<String> {
        match self.storage.get_raw(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token");
                None
            }
        }
    }

    /// Endpoint URL; each segment is percent-encoded on its own
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach auth, send, and map non-success statuses to errors
    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let token = self.token();
        let request = match token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = ErrorBody::parse_message(&text);
        Err(match status {
            StatusCode::UNAUTHORIZED => {
                self.expire_session(token.as_deref());
                ClientError::Unauthorized
            }
            StatusCode::NOT_FOUND => {
                ClientError::NotFound(message.unwrap_or_else(|| "Resource not found".to_string()))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message.unwrap_or_else(|| status.to_string()))
            }
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Drop the credentials the failed request was sent with.
    ///
    /// Only acts when the rejected token is still the persisted one, so a
    /// burst of 401s (or a 401 racing a fresh login) expires the session once.
    fn expire_session(&self, sent_token: Option<&str>) {
        let Some(sent_token) = sent_token else {
            tracing::debug!("401 on an anonymous request, nothing to expire");
            return;
        };
        if self.token().as_deref() != Some(sent_token) {
            tracing::debug!("401 for a token that is no longer held");
            return;
        }

        match self.storage.remove(TOKEN_KEY) {
            Ok(false) => return,
            Ok(true) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to remove expired token"),
        }
        if let Err(e) = self.storage.remove(AUTH_KEY) {
            tracing::warn!(error = %e, "Failed to remove auth snapshot");
        }

        tracing::warn!("Session expired, re-authentication required");
        if self.navigator.current() == Route::Checkout {
            self.navigator.reload();
        } else {
            self.navigator.navigate(Route::Checkout);
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> ClientResult<T> {
        let response = self.send(self.client.get(self.url(path)?)).await?;
        Self::decode(response).await
    }

    /// Make a GET request with query parameters
    async fn get_query<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response = self
            .send(self.client.get(self.url(path)?).query(query))
            .await?;
        Self::decode(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        let response = self.send(self.client.post(self.url(path)?).json(body)).await?;
        Self::decode(response).await
    }

    /// Make a POST request and ignore the response body
    async fn post_discard<B: Serialize + ?Sized>(
        &self,
        path: &[&str],
        body: &B,
    ) -> ClientResult<()> {
        self.send(self.client.post(self.url(path)?).json(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl MenuGateway for HttpClient {
    // ========== Tables / catalog ==========

    async fn table_by_number(&self, number: u32) -> ClientResult<DiningTable> {
        let number = number.to_string();
        self.get(&["tables", "by-number", &number]).await
    }

    async fn categories(&self, menu_id: Option<&str>) -> ClientResult<Vec<Category>> {
        let query: Vec<(&str, &str)> = menu_id.map(|id| ("menuId", id)).into_iter().collect();
        self.get_query(&["categories"], &query).await
    }

    async fn products(
        &self,
        category_id: Option<&str>,
        menu_id: Option<&str>,
    ) -> ClientResult<Vec<Product>> {
        let query: Vec<(&str, &str)> = category_id
            .map(|id| ("categoryId", id))
            .into_iter()
            .chain(menu_id.map(|id| ("menuId", id)))
            .collect();
        self.get_query(&["products"], &query).await
    }

    async fn product(&self, id: &str) -> ClientResult<ProductDetail> {
        self.get(&["products", id]).await
    }

    async fn menu(&self, id: &str) -> ClientResult<Menu> {
        self.get(&["menus", id]).await
    }

    async fn restaurant_status(&self, restaurant_id: &str) -> ClientResult<RestaurantStatus> {
        self.get(&["restaurants", restaurant_id, "status"]).await
    }

    // ========== Auth ==========

    async fn send_otp(&self, phone: &str) -> ClientResult<()> {
        let request = SendOtpRequest {
            phone: phone.to_string(),
        };
        self.post_discard(&["auth", "send-otp"], &request).await
    }

    async fn verify_otp(&self, phone: &str, code: &str) -> ClientResult<AuthResponse> {
        let request = VerifyOtpRequest {
            phone: phone.to_string(),
            code: code.to_string(),
        };
        self.post(&["auth", "verify-otp"], &request).await
    }

    // ========== Orders ==========

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<Order> {
        self.post(&["orders"], request).await
    }

    async fn order(&self, id: &str) -> ClientResult<Order> {
        self.get(&["orders", id]).await
    }

    async fn active_order(&self, table_id: &str) -> ClientResult<Option<Order>> {
        let request = self
            .client
            .get(self.url(&["orders", "active"])?)
            .query(&[("tableId", table_id)]);
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(ClientError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let body = response.text().await?;
        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(body)?))
    }

    async fn add_items(&self, order_id: &str, items: &[OrderItemInput]) -> ClientResult<()> {
        let request = AddItemsRequest {
            items: items.to_vec(),
        };
        self.post_discard(&["orders", order_id, "items"], &request)
            .await
    }

    async fn orders(&self) -> ClientResult<Vec<Order>> {
        self.get(&["orders"]).await
    }

    async fn cancel_item(&self, order_id: &str, item_id: &str) -> ClientResult<()> {
        self.post_discard(
            &["orders", order_id, "items", item_id, "cancel"],
            &CancelItemRequest::default(),
        )
        .await
    }
}
