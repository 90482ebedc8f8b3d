//! Restaurant listings, recommendations and detail pages.

use serde::{Deserialize, Serialize};

use super::Pagination;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantListItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub star: Option<f64>,
    pub place: Option<String>,
    pub logo: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub review_count: Option<i64>,
    pub menu_count: Option<i64>,
    pub price_range: Option<PriceRange>,
    pub distance: Option<f64>,
}

/// `data` of the list, nearby, best-seller and search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantList {
    pub restaurants: Option<Vec<RestaurantListItem>>,
    pub pagination: Option<Pagination>,
    /// Echoed back by the search endpoint only.
    pub search_query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Option<i64>,
    pub food_name: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRestaurant {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub star: Option<f64>,
    pub place: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub logo: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub review_count: Option<i64>,
    pub sample_menus: Option<Vec<MenuItem>>,
    pub is_frequently_ordered: Option<bool>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendedResponse {
    pub recommendations: Option<Vec<RecommendedRestaurant>>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewUser {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: Option<i64>,
    pub star: Option<f64>,
    pub comment: Option<String>,
    pub created_at: Option<String>,
    pub user: Option<ReviewUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetail {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub star: Option<f64>,
    pub average_rating: Option<f64>,
    pub place: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub distance: Option<f64>,
    pub logo: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub total_menus: Option<i64>,
    pub total_reviews: Option<i64>,
    pub menus: Option<Vec<MenuItem>>,
    pub reviews: Option<Vec<ReviewItem>>,
}

/// Query parameters for `GET /api/resto`. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilters {
    pub location: Option<String>,
    pub range: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub rating: Option<f64>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl RestaurantFilters {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        push_opt(&mut pairs, "range", self.range);
        push_opt(&mut pairs, "priceMin", self.price_min);
        push_opt(&mut pairs, "priceMax", self.price_max);
        push_opt(&mut pairs, "rating", self.rating);
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        push_opt(&mut pairs, "page", self.page);
        push_opt(&mut pairs, "limit", self.limit);
        pairs
    }
}

pub(crate) fn push_opt<T: ToString>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<T>,
) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}
