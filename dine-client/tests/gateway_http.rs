// dine-client/tests/gateway_http.rs
// HttpClient against an in-process axum backend

use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post};
use axum::{Json, Router};
use dine_client::storage::{AUTH_KEY, TOKEN_KEY};
use dine_client::{
    ClientConfig, ClientError, HttpClient, MenuGateway, OrderItemStatus, OrderStatus, Route,
    RouteHistory, Storage,
};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Seen {
    auth: Arc<Mutex<Vec<Option<String>>>>,
    queries: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    hits: Arc<Mutex<usize>>,
}

impl Seen {
    fn record(&self, headers: &HeaderMap) {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.auth.lock().unwrap().push(auth);
        *self.hits.lock().unwrap() += 1;
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str, storage: &Storage, navigator: &Arc<RouteHistory>) -> HttpClient {
    HttpClient::new(&ClientConfig::new(base), storage.clone(), navigator.clone()).unwrap()
}

fn signed_in_storage() -> Storage {
    let storage = Storage::in_memory();
    storage.set_raw(TOKEN_KEY, "tok-1").unwrap();
    storage
        .set_raw(AUTH_KEY, r#"{"token":"tok-1","isAuthenticated":true}"#)
        .unwrap();
    storage
}

async fn list_categories(
    State(seen): State<Seen>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    seen.record(&headers);
    seen.queries.lock().unwrap().push(query.unwrap_or_default());
    Json(json!([
        {"id": "c-1", "name": "Hot dishes", "icon": "flame", "sortOrder": 1, "isActive": true}
    ]))
}

#[tokio::test]
async fn test_bearer_token_and_query_params() {
    let seen = Seen::default();
    let router = Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/products", get(list_categories))
        .with_state(seen.clone());
    let base = serve(router).await;

    let storage = signed_in_storage();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client(&base, &storage, &navigator);

    let categories = gateway.categories(Some("m-1")).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Hot dishes");

    // products endpoint returns a category-shaped body here; only the query matters
    let _ = gateway.products(Some("c-1"), Some("m-1")).await;

    let auth = seen.auth.lock().unwrap().clone();
    assert_eq!(auth[0].as_deref(), Some("Bearer tok-1"));
    let queries = seen.queries.lock().unwrap().clone();
    assert_eq!(queries[0], "menuId=m-1");
    assert_eq!(queries[1], "categoryId=c-1&menuId=m-1");
}

#[tokio::test]
async fn test_anonymous_request_has_no_auth_header() {
    let seen = Seen::default();
    let router = Router::new()
        .route("/api/categories", get(list_categories))
        .with_state(seen.clone());
    let base = serve(router).await;

    let storage = Storage::in_memory();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client(&base, &storage, &navigator);

    gateway.categories(None).await.unwrap();
    assert_eq!(seen.auth.lock().unwrap().clone(), vec![None]);
    assert_eq!(seen.queries.lock().unwrap()[0], "");
}

async fn reject(State(seen): State<Seen>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    seen.record(&headers);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Token expired"})),
    )
}

#[tokio::test]
async fn test_unauthorized_expires_session_once() {
    let seen = Seen::default();
    let router = Router::new()
        .route("/api/orders", get(reject))
        .with_state(seen.clone());
    let base = serve(router).await;

    let storage = signed_in_storage();
    let navigator = Arc::new(RouteHistory::new(Route::Orders));
    let gateway = client(&base, &storage, &navigator);

    let burst = futures::future::join_all((0..3).map(|_| gateway.orders())).await;
    assert!(
        burst
            .iter()
            .all(|r| matches!(r, Err(ClientError::Unauthorized)))
    );

    // a later 401 with no token held does nothing
    let c = gateway.orders().await;
    assert!(matches!(c, Err(ClientError::Unauthorized)));

    assert_eq!(storage.get_raw(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get_raw(AUTH_KEY).unwrap(), None);
    assert_eq!(navigator.visited(), vec![Route::Checkout]);
    assert_eq!(navigator.reloads(), 0);
    assert_eq!(*seen.hits.lock().unwrap(), 4);
    assert_eq!(seen.auth.lock().unwrap()[3], None);
}

#[tokio::test]
async fn test_unauthorized_on_checkout_reloads() {
    let seen = Seen::default();
    let router = Router::new()
        .route("/api/orders", get(reject))
        .with_state(seen.clone());
    let base = serve(router).await;

    let storage = signed_in_storage();
    let navigator = Arc::new(RouteHistory::new(Route::Checkout));
    let gateway = client(&base, &storage, &navigator);

    assert!(gateway.orders().await.is_err());
    assert!(navigator.visited().is_empty());
    assert_eq!(navigator.reloads(), 1);
}

#[tokio::test]
async fn test_active_order_absent_variants() {
    let router = Router::new()
        .route(
            "/api/orders/active",
            get(|RawQuery(query): RawQuery| async move {
                match query.as_deref() {
                    Some("tableId=t-404") => (StatusCode::NOT_FOUND, String::new()),
                    Some("tableId=t-null") => (StatusCode::OK, "null".to_string()),
                    Some("tableId=t-empty") => (StatusCode::OK, String::new()),
                    _ => (
                        StatusCode::OK,
                        json!({
                            "id": "o-1",
                            "tableId": "t-12",
                            "status": 2,
                            "items": [
                                {"id": "i-1", "productId": "p-1", "productName": "Plov",
                                 "quantity": 1, "status": 9}
                            ]
                        })
                        .to_string(),
                    ),
                }
            }),
        );
    let base = serve(router).await;

    let storage = Storage::in_memory();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client(&base, &storage, &navigator);

    assert_eq!(gateway.active_order("t-404").await.unwrap(), None);
    assert_eq!(gateway.active_order("t-null").await.unwrap(), None);
    assert_eq!(gateway.active_order("t-empty").await.unwrap(), None);

    let order = gateway.active_order("t-12").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);
    assert!(order.accepts_items());
    assert_eq!(order.items[0].status, OrderItemStatus::Active);
}

#[tokio::test]
async fn test_error_bodies_are_mapped() {
    let router = Router::new()
        .route(
            "/api/orders",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Kitchen is closed"})),
                )
            }),
        )
        .route(
            "/api/auth/send-otp",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"message": "Bad phone"})),
                )
            }),
        )
        .route(
            "/api/products/{id}",
            get(|Path(id): Path<String>| async move {
                (StatusCode::NOT_FOUND, format!("no product {id}"))
            }),
        )
        .route(
            "/api/menus/{id}",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
    let base = serve(router).await;

    let storage = Storage::in_memory();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client(&base, &storage, &navigator);

    let request = shared::order::CreateOrderRequest {
        table_id: "t-12".into(),
        special_instructions: None,
        items: vec![],
    };
    let err = gateway.create_order(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert_eq!(err.user_message(), "Kitchen is closed");

    let err = gateway.send_otp("+992935551234").await.unwrap_err();
    assert!(matches!(&err, ClientError::Validation(m) if m == "Bad phone"));

    let err = gateway.product("p-9").await.unwrap_err();
    assert!(err.is_not_found());

    let err = gateway.menu("m-1").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 502, message: None }));
}

#[tokio::test]
async fn test_auth_and_order_writes() {
    let seen = Seen::default();
    let router = Router::new()
        .route(
            "/api/auth/verify-otp",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                seen.bodies.lock().unwrap().push(body.clone());
                Json(json!({"token": "tok-9", "userId": "u-9", "phone": body["phone"]}))
            }),
        )
        .route(
            "/api/orders/{id}/items",
            post(
                |State(seen): State<Seen>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    seen.queries.lock().unwrap().push(id);
                    seen.bodies.lock().unwrap().push(body);
                    Json(json!({"ok": true}))
                },
            ),
        )
        .route(
            "/api/orders/{id}/items/{item}/cancel",
            post(
                |State(seen): State<Seen>, Path((id, item)): Path<(String, String)>| async move {
                    seen.queries.lock().unwrap().push(format!("{id}/{item}"));
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(router).await;

    let storage = Storage::in_memory();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client(&base, &storage, &navigator);

    let auth = gateway.verify_otp("+992935551234", "1234").await.unwrap();
    assert_eq!(auth.token, "tok-9");
    assert_eq!(auth.user_id, "u-9");
    assert_eq!(auth.phone, "+992935551234");

    let items = vec![dine_client::OrderItemInput::new(
        "p-1",
        None,
        2,
        Vec::new(),
    )];
    gateway.add_items("o-1", &items).await.unwrap();
    gateway.cancel_item("o-1", "i-3").await.unwrap();

    let bodies = seen.bodies.lock().unwrap().clone();
    assert_eq!(bodies[0], json!({"phone": "+992935551234", "code": "1234"}));
    assert_eq!(bodies[1], json!({"items": [{"productId": "p-1", "quantity": 2}]}));
    assert_eq!(
        seen.queries.lock().unwrap().clone(),
        vec!["o-1".to_string(), "o-1/i-3".to_string()]
    );
}

#[tokio::test]
async fn test_image_url_resolution() {
    let storage = Storage::in_memory();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client("https://menu.example.com/", &storage, &navigator);

    assert_eq!(
        gateway.image_url(Some("/uploads/plov.jpg")).as_deref(),
        Some("https://menu.example.com/uploads/plov.jpg")
    );
    assert_eq!(gateway.image_url(Some("")), None);
}

#[tokio::test]
async fn test_path_ids_are_encoded_as_single_segments() {
    let seen = Seen::default();
    let router = Router::new()
        .route(
            "/api/orders/{id}/items/{item}/cancel",
            post(
                |State(seen): State<Seen>, Path((id, item)): Path<(String, String)>| async move {
                    seen.queries.lock().unwrap().push(format!("{id}|{item}"));
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(router).await;

    let storage = Storage::in_memory();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client(&base, &storage, &navigator);

    gateway.cancel_item("o/1?x=1", "i#3").await.unwrap();
    assert_eq!(
        seen.queries.lock().unwrap().clone(),
        vec!["o/1?x=1|i#3".to_string()]
    );
}

#[tokio::test]
async fn test_table_with_null_restaurant_fields() {
    let router = Router::new().route(
        "/api/tables/by-number/{number}",
        get(|Path(number): Path<u32>| async move {
            Json(json!({
                "id": "t-5",
                "number": number,
                "restaurantId": null,
                "restaurantName": null,
                "menuId": null
            }))
        }),
    );
    let base = serve(router).await;

    let storage = Storage::in_memory();
    let navigator = Arc::new(RouteHistory::default());
    let gateway = client(&base, &storage, &navigator);

    let table = gateway.table_by_number(5).await.unwrap();
    assert_eq!(table.id, "t-5");
    assert!(table.restaurant_id.is_none());
    assert!(table.restaurant_name.is_none());
}
