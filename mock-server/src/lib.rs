//! In-memory stand-in for the restaurant ordering API.
//!
//! Every response body uses the API envelope:
//! `{success: true, message, data}` or `{success: false, message, errors?}`.
//! `POST /_mock/faults` makes the next N `/api` requests fail with a chosen
//! status so clients can exercise their retry path.

mod auth;
mod orders;
mod resto;
mod seed;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub use seed::{Menu, Restaurant, Review};

#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_id: i64,
    pub menu_name: String,
    pub price: f64,
    pub image: Option<String>,
    pub quantity: u32,
    pub item_total: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderGroup {
    pub restaurant: Value,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub subtotal: f64,
    pub service_fee: f64,
    pub delivery_fee: f64,
    pub total_price: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: i64,
    pub transaction_id: String,
    #[serde(skip)]
    pub user_id: i64,
    pub status: String,
    pub payment_method: String,
    pub delivery_address: String,
    pub phone: Option<String>,
    pub pricing: Pricing,
    pub restaurants: Vec<OrderGroup>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Fault {
    pub status: u16,
    pub count: u32,
}

#[derive(Debug)]
pub struct Store {
    pub users: Vec<UserRecord>,
    pub tokens: HashMap<String, i64>,
    pub restaurants: Vec<Restaurant>,
    pub orders: Vec<OrderRecord>,
    pub fault: Option<Fault>,
}

impl Store {
    fn seeded() -> Self {
        Self {
            users: Vec::new(),
            tokens: HashMap::new(),
            restaurants: seed::restaurants(),
            orders: Vec::new(),
            fault: None,
        }
    }

    /// Resolve the bearer token in `headers` to a user id.
    fn authenticate(&self, headers: &HeaderMap) -> Result<i64, Response> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token).copied())
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Access token required", None))
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/resto", get(resto::list))
        .route("/api/resto/recommended", get(resto::recommended))
        .route("/api/resto/nearby", get(resto::nearby))
        .route("/api/resto/best-seller", get(resto::best_seller))
        .route("/api/resto/search", get(resto::search))
        .route("/api/resto/{id}", get(resto::detail))
        .route("/api/order/checkout", post(orders::checkout))
        .route("/api/order/my-order", get(orders::my_orders))
        .route_layer(middleware::from_fn_with_state(db.clone(), inject_faults));
    Router::new()
        .merge(api)
        .route("/_mock/faults", post(set_fault))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock restaurant API listening");
    }
    axum::serve(listener, app()).await
}

/// Success envelope.
pub(crate) fn ok(status: StatusCode, message: &str, data: Value) -> Response {
    (
        status,
        Json(json!({"success": true, "message": message, "data": data})),
    )
        .into_response()
}

/// Failure envelope. `errors` is omitted when `None`.
pub(crate) fn fail(status: StatusCode, message: &str, errors: Option<Value>) -> Response {
    let mut body = json!({"success": false, "message": message});
    if let Some(errors) = errors {
        body["errors"] = errors;
    }
    (status, Json(body)).into_response()
}

/// Unwrap a JSON body or answer with a 400 failure envelope.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value)
        .map_err(|rejection| fail(StatusCode::BAD_REQUEST, "Invalid request body", Some(json!(rejection.body_text()))))
}

/// Parse an optional numeric query parameter or answer with a 400 envelope.
pub(crate) fn query_num<T: std::str::FromStr>(
    query: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, Response> {
    match query.get(key).map(|raw| raw.trim()).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            fail(
                StatusCode::BAD_REQUEST,
                &format!("Invalid query parameter: {key}"),
                None,
            )
        }),
    }
}

/// Page slice plus the pagination object the API reports with it.
pub(crate) fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> (Vec<T>, Value) {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(limit as usize);
    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    let slice = items.iter().skip(start).take(limit as usize).cloned().collect();
    (
        slice,
        json!({"page": page, "limit": limit, "total": total, "totalPages": total_pages}),
    )
}

async fn inject_faults(State(db): State<Db>, request: Request, next: Next) -> Response {
    let forced = {
        let mut store = db.write().await;
        match store.fault.as_mut() {
            Some(fault) if fault.count > 0 => {
                fault.count -= 1;
                Some(fault.status)
            }
            _ => None,
        }
    };
    match forced.and_then(|status| StatusCode::from_u16(status).ok()) {
        Some(status) => {
            debug!(%status, path = %request.uri().path(), "injected fault");
            fail(status, "Injected fault", None)
        }
        None => next.run(request).await,
    }
}

async fn set_fault(
    State(db): State<Db>,
    body: Result<Json<Fault>, JsonRejection>,
) -> Response {
    let fault = match json_body(body) {
        Ok(fault) => fault,
        Err(response) => return response,
    };
    if StatusCode::from_u16(fault.status).is_err() {
        return fail(StatusCode::BAD_REQUEST, "Invalid status code", None);
    }
    db.write().await.fault = Some(fault);
    ok(StatusCode::OK, "Fault scheduled", json!({"status": fault.status, "count": fault.count}))
}
