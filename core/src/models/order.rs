//! Checkout and order history.

use serde::{Deserialize, Serialize};

use super::Pagination;

/// Lifecycle of a placed order. Unknown values fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Preparing,
    OnTheWay,
    Delivered,
    Done,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Preparing => "preparing",
            OrderStatus::OnTheWay => "on_the_way",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Done => "done",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRestaurantInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_id: Option<i64>,
    pub menu_name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub quantity: Option<i64>,
    pub item_total: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRestaurantGroup {
    pub restaurant: Option<OrderRestaurantInfo>,
    pub items: Option<Vec<OrderItem>>,
    pub subtotal: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub subtotal: Option<f64>,
    pub service_fee: Option<f64>,
    pub delivery_fee: Option<f64>,
    pub total_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Option<i64>,
    pub transaction_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub payment_method: Option<String>,
    pub delivery_address: Option<String>,
    pub phone: Option<String>,
    pub pricing: Option<Pricing>,
    pub restaurants: Option<Vec<OrderRestaurantGroup>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
}

/// `data` of `GET /api/order/my-order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub orders: Option<Vec<Order>>,
    pub pagination: Option<Pagination>,
    pub filter: Option<OrderFilter>,
}

/// The transaction created by a checkout. `status` is free text here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTransaction {
    pub id: Option<i64>,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub pricing: Option<Pricing>,
    pub restaurants: Option<Vec<OrderRestaurantGroup>>,
    pub created_at: Option<String>,
}

/// `data` of `POST /api/order/checkout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub transaction: Option<CheckoutTransaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub menu_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRestaurant {
    pub restaurant_id: i64,
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub restaurants: Vec<CheckoutRestaurant>,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
