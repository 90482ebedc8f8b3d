//! Stateless HTTP request builder and response parser for the restaurant API.
//!
//! # Design
//! `RestoClient` holds a `base_url`, a credential provider and a retry
//! policy, and carries no mutable state between calls. Each endpoint is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O dependencies.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::credentials::{CredentialProvider, NoCredentials};
use crate::error::{ApiError, BuildError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::models::restaurant::push_opt;
use crate::models::{
    AuthData, CheckoutRequest, CheckoutResponse, LoginRequest, OrderStatus, OrdersResponse,
    RecommendedResponse, RegisterRequest, RestaurantDetail, RestaurantFilters, RestaurantList,
};
use crate::parse::parse_response;
use crate::retry::RetryPolicy;

/// Menus and reviews requested with a restaurant detail page.
const DETAIL_MENU_LIMIT: u32 = 50;
const DETAIL_REVIEW_LIMIT: u32 = 6;

/// Synchronous, stateless client for the restaurant API.
#[derive(Clone)]
pub struct RestoClient {
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    retry: RetryPolicy,
}

impl fmt::Debug for RestoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl RestoClient {
    /// A client that sends no credentials.
    pub fn new(base_url: &str) -> Self {
        Self::with_credentials(base_url, NoCredentials)
    }

    pub fn with_credentials(base_url: &str, credentials: impl CredentialProvider + 'static) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: Arc::new(credentials),
            retry: RetryPolicy::default(),
        }
    }

    /// A client for the configured base URL that carries the configured
    /// retry policy, see [`RestoClient::retry_policy`].
    pub fn from_config(
        config: &ClientConfig,
        credentials: impl CredentialProvider + 'static,
    ) -> Self {
        Self {
            retry: config.retry,
            ..Self::with_credentials(&config.base_url, credentials)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The policy callers should drive requests with, e.g.
    /// `client.retry_policy().run(..)`.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    // -- auth --

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, BuildError> {
        self.post("/api/auth/register", input)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<AuthData, ApiError> {
        parse_response(&response)
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, BuildError> {
        self.post("/api/auth/login", input)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthData, ApiError> {
        parse_response(&response)
    }

    // -- restaurants --

    pub fn build_list_restaurants(&self, filters: &RestaurantFilters) -> HttpRequest {
        self.get("/api/resto", &filters.query_pairs())
    }

    pub fn parse_list_restaurants(&self, response: HttpResponse) -> Result<RestaurantList, ApiError> {
        parse_response(&response)
    }

    pub fn build_recommended_restaurants(&self) -> HttpRequest {
        self.get("/api/resto/recommended", &[])
    }

    pub fn parse_recommended_restaurants(
        &self,
        response: HttpResponse,
    ) -> Result<RecommendedResponse, ApiError> {
        parse_response(&response)
    }

    pub fn build_nearby_restaurants(&self, range: Option<f64>, limit: Option<u32>) -> HttpRequest {
        let mut query = Vec::new();
        push_opt(&mut query, "range", range);
        push_opt(&mut query, "limit", limit);
        self.get("/api/resto/nearby", &query)
    }

    pub fn parse_nearby_restaurants(&self, response: HttpResponse) -> Result<RestaurantList, ApiError> {
        parse_response(&response)
    }

    pub fn build_best_seller_restaurants(&self, page: Option<u32>, limit: Option<u32>) -> HttpRequest {
        let mut query = Vec::new();
        push_opt(&mut query, "page", page);
        push_opt(&mut query, "limit", limit);
        self.get("/api/resto/best-seller", &query)
    }

    pub fn parse_best_seller_restaurants(
        &self,
        response: HttpResponse,
    ) -> Result<RestaurantList, ApiError> {
        parse_response(&response)
    }

    pub fn build_search_restaurants(&self, q: &str, page: u32, limit: u32) -> HttpRequest {
        let query = [
            ("q", q.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get("/api/resto/search", &query)
    }

    pub fn parse_search_restaurants(&self, response: HttpResponse) -> Result<RestaurantList, ApiError> {
        parse_response(&response)
    }

    pub fn build_restaurant_detail(&self, id: i64) -> HttpRequest {
        let query = [
            ("limitMenu", DETAIL_MENU_LIMIT.to_string()),
            ("limitReview", DETAIL_REVIEW_LIMIT.to_string()),
        ];
        self.get(&format!("/api/resto/{id}"), &query)
    }

    pub fn parse_restaurant_detail(&self, response: HttpResponse) -> Result<RestaurantDetail, ApiError> {
        parse_response(&response)
    }

    // -- orders --

    pub fn build_checkout(&self, input: &CheckoutRequest) -> Result<HttpRequest, BuildError> {
        self.post("/api/order/checkout", input)
    }

    pub fn parse_checkout(&self, response: HttpResponse) -> Result<CheckoutResponse, ApiError> {
        parse_response(&response)
    }

    pub fn build_my_orders(&self, status: OrderStatus, page: u32, limit: u32) -> HttpRequest {
        let query = [
            ("status", status.as_str().to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get("/api/order/my-order", &query)
    }

    pub fn parse_my_orders(&self, response: HttpResponse) -> Result<OrdersResponse, ApiError> {
        parse_response(&response)
    }

    // -- plumbing --

    fn get(&self, path: &str, query: &[(&str, String)]) -> HttpRequest {
        let mut url = format!("{}{path}", self.base_url);
        if !query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        HttpRequest {
            method: HttpMethod::Get,
            path: url,
            headers: self.auth_headers(),
            body: None,
        }
    }

    fn post<T: Serialize>(&self, path: &str, input: &T) -> Result<HttpRequest, BuildError> {
        let body = serde_json::to_string(input)?;
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        headers.extend(self.auth_headers());
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers,
            body: Some(body),
        })
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        self.credentials
            .bearer_token()
            .filter(|token| !token.is_empty())
            .map(|token| ("authorization".to_string(), format!("Bearer {token}")))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{SharedToken, StaticToken};
    use crate::models::{CheckoutItem, CheckoutRestaurant};
    use serde_json::json;

    fn client() -> RestoClient {
        RestoClient::new("http://localhost:3000")
    }

    fn ok(data: serde_json::Value) -> HttpResponse {
        HttpResponse::new(200, json!({"success": true, "message": "ok", "data": data}).to_string())
    }

    #[test]
    fn build_list_restaurants_without_filters() {
        let req = client().build_list_restaurants(&RestaurantFilters::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/resto");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_restaurants_encodes_filters() {
        let filters = RestaurantFilters {
            location: Some("South Jakarta".to_string()),
            rating: Some(4.5),
            limit: Some(10),
            ..RestaurantFilters::default()
        };
        let req = client().build_list_restaurants(&filters);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/resto?location=South+Jakarta&rating=4.5&limit=10"
        );
    }

    #[test]
    fn build_search_encodes_query() {
        let req = client().build_search_restaurants("nasi & mie", 1, 20);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/resto/search?q=nasi+%26+mie&page=1&limit=20"
        );
    }

    #[test]
    fn build_restaurant_detail_requests_menu_and_review_limits() {
        let req = client().build_restaurant_detail(42);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/resto/42?limitMenu=50&limitReview=6"
        );
    }

    #[test]
    fn build_nearby_and_best_seller_skip_absent_params() {
        let c = client();
        assert_eq!(
            c.build_nearby_restaurants(None, Some(5)).path,
            "http://localhost:3000/api/resto/nearby?limit=5"
        );
        assert_eq!(
            c.build_best_seller_restaurants(None, None).path,
            "http://localhost:3000/api/resto/best-seller"
        );
    }

    #[test]
    fn build_login_produces_json_post() {
        let input = LoginRequest {
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
        };
        let req = client().build_login(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/auth/login");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "jane@example.com", "password": "secret1"}));
    }

    #[test]
    fn build_my_orders_uses_wire_status() {
        let req = client().build_my_orders(OrderStatus::OnTheWay, 2, 10);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/order/my-order?status=on_the_way&page=2&limit=10"
        );
    }

    #[test]
    fn credentials_are_attached_to_every_request() {
        let c = RestoClient::with_credentials("http://localhost:3000", StaticToken("abc".to_string()));
        assert_eq!(c.build_recommended_restaurants().header("authorization"), Some("Bearer abc"));

        let checkout = CheckoutRequest {
            restaurants: vec![CheckoutRestaurant {
                restaurant_id: 1,
                items: vec![CheckoutItem { menu_id: 1, quantity: 1 }],
            }],
            delivery_address: "Home".to_string(),
            phone: None,
            payment_method: None,
            notes: None,
        };
        let req = c.build_checkout(&checkout).unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn shared_token_changes_apply_to_next_request() {
        let token = SharedToken::new();
        let c = RestoClient::with_credentials("http://localhost:3000", token.clone());
        assert_eq!(c.build_recommended_restaurants().header("authorization"), None);

        token.set("fresh");
        assert_eq!(c.build_recommended_restaurants().header("authorization"), Some("Bearer fresh"));

        token.set("");
        assert_eq!(c.build_recommended_restaurants().header("authorization"), None);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = RestoClient::new("http://localhost:3000/");
        assert_eq!(c.base_url(), "http://localhost:3000");
        assert_eq!(c.build_recommended_restaurants().path, "http://localhost:3000/api/resto/recommended");
    }

    #[test]
    fn from_config_uses_configured_base_url() {
        let config = ClientConfig {
            base_url: "http://example.test/".to_string(),
            ..ClientConfig::default()
        };
        let c = RestoClient::from_config(&config, NoCredentials);
        assert_eq!(c.base_url(), "http://example.test");
    }

    #[test]
    fn from_config_carries_the_retry_policy() {
        let config = ClientConfig::from_lookup(|key| {
            (key == crate::config::MAX_RETRIES_VAR).then(|| "1".to_string())
        })
        .unwrap();
        let c = RestoClient::from_config(&config, NoCredentials);
        assert_eq!(c.retry_policy().max_retries, 1);
        assert_eq!(client().retry_policy(), &RetryPolicy::default());
    }

    #[test]
    fn parse_list_restaurants_success() {
        let list = client()
            .parse_list_restaurants(ok(json!({"restaurants": [{"id": 1, "name": "Sushi Tei"}]})))
            .unwrap();
        assert_eq!(list.restaurants.unwrap()[0].name.as_deref(), Some("Sushi Tei"));
    }

    #[test]
    fn parse_restaurant_detail_not_found() {
        let response = HttpResponse::new(
            404,
            json!({"success": false, "message": "Restaurant not found"}).to_string(),
        );
        let err = client().parse_restaurant_detail(response).unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "Resource not found.");
    }

    #[test]
    fn parse_login_unauthorized() {
        let response = HttpResponse::new(
            401,
            json!({"success": false, "message": "Invalid credentials"}).to_string(),
        );
        let err = client().parse_login(response).unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!err.is_retriable());
    }

    #[test]
    fn parse_my_orders_bad_json() {
        let err = client()
            .parse_my_orders(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert_eq!(err.message(), "Unexpected API response");
        assert_eq!(err.status(), 200);
    }

    #[test]
    fn parse_checkout_rejects_mistyped_payload() {
        let err = client()
            .parse_checkout(ok(json!({"transaction": {"id": "seven"}})))
            .unwrap_err();
        assert_eq!(err.status(), 500);
        assert!(!err.is_retriable());
    }
}
