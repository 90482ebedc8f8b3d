//! Domain DTOs for the restaurant API.
//!
//! # Design
//! These are the domain schemas for the `data` field of success envelopes.
//! The upstream API is loosely specified, so nearly every field is optional
//! and unknown fields are ignored; callers must handle absent values. Every
//! type is `Default`, which doubles as its "no content" value. Field names
//! are camelCase on the wire.
//!
//! The mock-server crate defines its own copies of these shapes; integration
//! tests catch drift between the two.

pub mod auth;
pub mod order;
pub mod restaurant;

use serde::{Deserialize, Serialize};

pub use auth::{AuthData, Email, LoginRequest, RegisterRequest, User};
pub use order::{
    CheckoutItem, CheckoutRequest, CheckoutResponse, CheckoutRestaurant, CheckoutTransaction,
    Order, OrderFilter, OrderItem, OrderRestaurantGroup, OrderRestaurantInfo, OrderStatus,
    OrdersResponse, Pricing,
};
pub use restaurant::{
    Coordinates, MenuItem, PriceRange, RecommendedResponse, RecommendedRestaurant,
    RestaurantDetail, RestaurantFilters, RestaurantList, RestaurantListItem, ReviewItem,
    ReviewUser,
};

/// Page metadata shared by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub total: Option<i64>,
    pub total_pages: Option<i64>,
}
