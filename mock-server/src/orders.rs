use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{fail, json_body, ok, paginate, query_num, Db, OrderGroup, OrderItem, OrderRecord, Pricing, Store};

const SERVICE_FEE: f64 = 1000.0;
const DELIVERY_FEE_PER_RESTAURANT: f64 = 10000.0;
const DEFAULT_PAYMENT_METHOD: &str = "Bank Transfer";
const DEFAULT_STATUS_FILTER: &str = "done";
const DEFAULT_LIMIT: u32 = 10;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemInput {
    pub menu_id: i64,
    pub quantity: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRestaurantInput {
    pub restaurant_id: i64,
    pub items: Vec<CheckoutItemInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
    #[serde(default)]
    pub restaurants: Vec<CheckoutRestaurantInput>,
    #[serde(default)]
    pub delivery_address: String,
    pub phone: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Price every line against the menu, or explain what is missing.
fn build_groups(store: &Store, input: &CheckoutInput) -> Result<Vec<OrderGroup>, String> {
    input
        .restaurants
        .iter()
        .map(|wanted| {
            let restaurant = store
                .restaurants
                .iter()
                .find(|r| r.id == wanted.restaurant_id)
                .ok_or_else(|| format!("Restaurant {} not found", wanted.restaurant_id))?;
            if wanted.items.is_empty() {
                return Err(format!("No items for restaurant {}", restaurant.id));
            }
            let items = wanted
                .items
                .iter()
                .map(|line| {
                    let menu = restaurant
                        .menus
                        .iter()
                        .find(|m| m.id == line.menu_id)
                        .ok_or_else(|| format!("Menu {} not found", line.menu_id))?;
                    if line.quantity == 0 {
                        return Err(format!("Quantity for menu {} must be positive", menu.id));
                    }
                    Ok(OrderItem {
                        menu_id: menu.id,
                        menu_name: menu.food_name.clone(),
                        price: menu.price,
                        image: Some(menu.image.clone()),
                        quantity: line.quantity,
                        item_total: menu.price * f64::from(line.quantity),
                    })
                })
                .collect::<Result<Vec<_>, String>>()?;
            let subtotal = items.iter().map(|i| i.item_total).sum();
            Ok(OrderGroup {
                restaurant: restaurant.summary(),
                items,
                subtotal,
            })
        })
        .collect()
}

pub async fn checkout(
    State(db): State<Db>,
    headers: HeaderMap,
    body: Result<Json<CheckoutInput>, JsonRejection>,
) -> Response {
    let mut store = db.write().await;
    let user_id = match store.authenticate(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let input = match json_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    if input.delivery_address.trim().is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Delivery address is required", None);
    }
    if input.restaurants.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "At least one restaurant is required", None);
    }
    let restaurants = match build_groups(&store, &input) {
        Ok(groups) => groups,
        Err(message) => return fail(StatusCode::BAD_REQUEST, &message, None),
    };

    let subtotal: f64 = restaurants.iter().map(|g| g.subtotal).sum();
    let delivery_fee = DELIVERY_FEE_PER_RESTAURANT * restaurants.len() as f64;
    let order = OrderRecord {
        id: store.orders.len() as i64 + 1,
        transaction_id: format!("TX-{}", Uuid::new_v4().simple()),
        user_id,
        status: "preparing".to_string(),
        payment_method: input
            .payment_method
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        delivery_address: input.delivery_address,
        phone: input.phone,
        pricing: Pricing {
            subtotal,
            service_fee: SERVICE_FEE,
            delivery_fee,
            total_price: subtotal + SERVICE_FEE + delivery_fee,
        },
        restaurants,
    };
    tracing::debug!(order = order.id, notes = ?input.notes, "order placed");
    let transaction = json!({
        "id": order.id,
        "transactionId": order.transaction_id,
        "paymentMethod": order.payment_method,
        "status": order.status,
        "pricing": order.pricing,
        "restaurants": order.restaurants,
    });
    store.orders.push(order);
    ok(StatusCode::CREATED, "Order placed successfully", json!({"transaction": transaction}))
}

pub async fn my_orders(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let store = db.read().await;
    let user_id = match store.authenticate(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let paging = query_num::<u32>(&params, "page")
        .and_then(|page| Ok((page, query_num::<u32>(&params, "limit")?)));
    let (page, limit) = match paging {
        Ok(values) => values,
        Err(response) => return response,
    };
    let status = params
        .get("status")
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STATUS_FILTER);
    let mine: Vec<OrderRecord> = store
        .orders
        .iter()
        .filter(|o| o.user_id == user_id && o.status == status)
        .cloned()
        .collect();
    let (orders, pagination) = paginate(&mine, page.unwrap_or(1), limit.unwrap_or(DEFAULT_LIMIT));
    ok(
        StatusCode::OK,
        "Orders retrieved successfully",
        json!({"orders": orders, "pagination": pagination, "filter": {"status": status}}),
    )
}
