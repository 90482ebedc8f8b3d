use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use serde_json::{json, Value};

use crate::{fail, ok, paginate, query_num, Db, Restaurant};

const DEFAULT_LIMIT: u32 = 20;
const DEFAULT_NEARBY_RANGE: f64 = 10.0;
const DEFAULT_MENU_LIMIT: usize = 10;
const DEFAULT_REVIEW_LIMIT: usize = 5;

type Params = HashMap<String, String>;

fn list_data(restaurants: &[Restaurant], page: u32, limit: u32) -> Value {
    let (slice, pagination) = paginate(restaurants, page, limit);
    let items: Vec<Value> = slice.iter().map(Restaurant::list_item).collect();
    json!({"restaurants": items, "pagination": pagination})
}

fn page_and_limit(params: &Params) -> Result<(u32, u32), Response> {
    Ok((
        query_num(params, "page")?.unwrap_or(1),
        query_num(params, "limit")?.unwrap_or(DEFAULT_LIMIT),
    ))
}

struct ListFilters {
    rating: Option<f64>,
    price_min: Option<f64>,
    price_max: Option<f64>,
    range: Option<f64>,
    page: u32,
    limit: u32,
}

fn list_filters(params: &Params) -> Result<ListFilters, Response> {
    let (page, limit) = page_and_limit(params)?;
    Ok(ListFilters {
        rating: query_num(params, "rating")?,
        price_min: query_num(params, "priceMin")?,
        price_max: query_num(params, "priceMax")?,
        range: query_num(params, "range")?,
        page,
        limit,
    })
}

pub async fn list(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    let filters = match list_filters(&params) {
        Ok(filters) => filters,
        Err(response) => return response,
    };
    let category = params.get("category").filter(|c| !c.is_empty());
    let location = params.get("location").filter(|l| !l.is_empty());

    let store = db.read().await;
    let matches: Vec<Restaurant> = store
        .restaurants
        .iter()
        .filter(|r| filters.rating.map_or(true, |min| r.star >= min))
        .filter(|r| {
            category.map_or(true, |c| r.category.as_deref().is_some_and(|rc| rc.eq_ignore_ascii_case(c)))
        })
        .filter(|r| location.map_or(true, |l| r.place.to_lowercase().contains(&l.to_lowercase())))
        .filter(|r| filters.range.map_or(true, |km| r.distance <= km))
        .filter(|r| {
            let (min, max) = r.price_range();
            filters.price_min.map_or(true, |floor| max >= floor)
                && filters.price_max.map_or(true, |ceil| min <= ceil)
        })
        .cloned()
        .collect();
    ok(StatusCode::OK, "Restaurants retrieved successfully", list_data(&matches, filters.page, filters.limit))
}

pub async fn best_seller(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    let (page, limit) = match page_and_limit(&params) {
        Ok(values) => values,
        Err(response) => return response,
    };
    let store = db.read().await;
    let mut sorted = store.restaurants.clone();
    sorted.sort_by(|a, b| b.star.total_cmp(&a.star));
    ok(StatusCode::OK, "Best seller restaurants retrieved successfully", list_data(&sorted, page, limit))
}

pub async fn search(State(db): State<Db>, Query(params): Query<Params>) -> Response {
    let Some(q) = params.get("q").map(|q| q.trim()).filter(|q| !q.is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "Search query is required", None);
    };
    let (page, limit) = match page_and_limit(&params) {
        Ok(values) => values,
        Err(response) => return response,
    };
    let needle = q.to_lowercase();
    let store = db.read().await;
    let matches: Vec<Restaurant> = store
        .restaurants
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.menus.iter().any(|m| m.food_name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    let mut data = list_data(&matches, page, limit);
    data["searchQuery"] = json!(q);
    ok(StatusCode::OK, "Search results retrieved successfully", data)
}

pub async fn nearby(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    let store = db.read().await;
    if let Err(response) = store.authenticate(&headers) {
        return response;
    }
    let parsed = query_num::<f64>(&params, "range")
        .and_then(|range| Ok((range, query_num::<u32>(&params, "limit")?)));
    let (range, limit) = match parsed {
        Ok(values) => values,
        Err(response) => return response,
    };
    let range = range.unwrap_or(DEFAULT_NEARBY_RANGE);
    let mut close: Vec<Restaurant> = store
        .restaurants
        .iter()
        .filter(|r| r.distance <= range)
        .cloned()
        .collect();
    close.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    let data = list_data(&close, 1, limit.unwrap_or(DEFAULT_LIMIT));
    ok(StatusCode::OK, "Nearby restaurants retrieved successfully", data)
}

pub async fn recommended(State(db): State<Db>, headers: HeaderMap) -> Response {
    let store = db.read().await;
    let user_id = match store.authenticate(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let ordered_from: Vec<i64> = store
        .orders
        .iter()
        .filter(|o| o.user_id == user_id)
        .flat_map(|o| o.restaurants.iter().filter_map(|g| g.restaurant["id"].as_i64()))
        .collect();
    let recommendations: Vec<Value> = store
        .restaurants
        .iter()
        .filter(|r| r.star >= 4.0)
        .map(|r| {
            let mut item = r.list_item();
            item["lat"] = json!(r.lat);
            item["long"] = json!(r.long);
            item["sampleMenus"] = json!(r.menus.iter().take(2).collect::<Vec<_>>());
            item["isFrequentlyOrdered"] = json!(ordered_from.contains(&r.id));
            item
        })
        .collect();
    ok(
        StatusCode::OK,
        "Recommended restaurants retrieved successfully",
        json!({"recommendations": recommendations}),
    )
}

pub async fn detail(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return fail(StatusCode::BAD_REQUEST, "Invalid restaurant id", None);
    };
    let limits = query_num::<usize>(&params, "limitMenu")
        .and_then(|menus| Ok((menus, query_num::<usize>(&params, "limitReview")?)));
    let (menu_limit, review_limit) = match limits {
        Ok(values) => values,
        Err(response) => return response,
    };
    let store = db.read().await;
    match store.restaurants.iter().find(|r| r.id == id) {
        Some(restaurant) => ok(
            StatusCode::OK,
            "Restaurant detail retrieved successfully",
            restaurant.detail(
                menu_limit.unwrap_or(DEFAULT_MENU_LIMIT),
                review_limit.unwrap_or(DEFAULT_REVIEW_LIMIT),
            ),
        ),
        None => fail(StatusCode::NOT_FOUND, "Restaurant not found", None),
    }
}
