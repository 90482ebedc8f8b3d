use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: i64,
    pub food_name: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub image: String,
}

#[derive(Clone, Debug)]
pub struct Review {
    pub id: i64,
    pub star: f64,
    pub comment: String,
    pub user_name: String,
}

#[derive(Clone, Debug)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub star: f64,
    pub place: String,
    pub lat: f64,
    pub long: f64,
    pub logo: String,
    pub images: Vec<String>,
    pub category: Option<String>,
    /// Kilometres from the (fixed) caller location used by `/nearby`.
    pub distance: f64,
    pub menus: Vec<Menu>,
    pub reviews: Vec<Review>,
}

impl Restaurant {
    pub fn price_range(&self) -> (f64, f64) {
        if self.menus.is_empty() {
            return (0.0, 0.0);
        }
        let prices = self.menus.iter().map(|m| m.price);
        let min = prices.clone().fold(f64::INFINITY, f64::min);
        let max = prices.fold(0.0, f64::max);
        (min, max)
    }

    pub fn list_item(&self) -> Value {
        let (min, max) = self.price_range();
        json!({
            "id": self.id,
            "name": self.name,
            "star": self.star,
            "place": self.place,
            "logo": self.logo,
            "images": self.images,
            "category": self.category,
            "reviewCount": self.reviews.len(),
            "menuCount": self.menus.len(),
            "priceRange": {"min": min, "max": max},
            "distance": self.distance,
        })
    }

    pub fn detail(&self, menu_limit: usize, review_limit: usize) -> Value {
        let average = if self.reviews.is_empty() {
            0.0
        } else {
            self.reviews.iter().map(|r| r.star).sum::<f64>() / self.reviews.len() as f64
        };
        let reviews: Vec<Value> = self
            .reviews
            .iter()
            .take(review_limit)
            .map(|r| {
                json!({
                    "id": r.id,
                    "star": r.star,
                    "comment": r.comment,
                    "user": {"id": r.id, "name": r.user_name},
                })
            })
            .collect();
        json!({
            "id": self.id,
            "name": self.name,
            "star": self.star,
            "averageRating": average,
            "place": self.place,
            "coordinates": {"lat": self.lat, "long": self.long},
            "distance": self.distance,
            "logo": self.logo,
            "images": self.images,
            "category": self.category,
            "totalMenus": self.menus.len(),
            "totalReviews": self.reviews.len(),
            "menus": self.menus.iter().take(menu_limit).collect::<Vec<_>>(),
            "reviews": reviews,
        })
    }

    pub fn summary(&self) -> Value {
        json!({"id": self.id, "name": self.name, "logo": self.logo})
    }
}

fn menu(id: i64, food_name: &str, price: f64, kind: &str) -> Menu {
    Menu {
        id,
        food_name: food_name.to_string(),
        price,
        kind: kind.to_string(),
        image: format!("https://img.example.test/menu/{id}.png"),
    }
}

fn review(id: i64, star: f64, comment: &str, user_name: &str) -> Review {
    Review {
        id,
        star,
        comment: comment.to_string(),
        user_name: user_name.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn restaurant(
    id: i64,
    name: &str,
    star: f64,
    place: &str,
    category: Option<&str>,
    distance: f64,
    menus: Vec<Menu>,
    reviews: Vec<Review>,
) -> Restaurant {
    Restaurant {
        id,
        name: name.to_string(),
        star,
        place: place.to_string(),
        lat: -6.2 + id as f64 * 0.01,
        long: 106.8 + id as f64 * 0.01,
        logo: format!("https://img.example.test/logo/{id}.png"),
        images: vec![format!("https://img.example.test/resto/{id}.jpg")],
        category: category.map(str::to_string),
        distance,
        menus,
        reviews,
    }
}

pub fn restaurants() -> Vec<Restaurant> {
    vec![
        restaurant(
            1,
            "Burger King",
            4.6,
            "Jakarta Selatan",
            Some("Fast Food"),
            2.4,
            vec![
                menu(101, "Whopper", 55000.0, "food"),
                menu(102, "Chicken Nuggets", 30000.0, "food"),
                menu(103, "Iced Tea", 12000.0, "drink"),
            ],
            vec![
                review(1, 5.0, "Great burgers", "Ana"),
                review(2, 4.0, "Fast service", "Budi"),
            ],
        ),
        restaurant(
            2,
            "Sushi Tei",
            4.8,
            "Jakarta Pusat",
            Some("Japanese"),
            6.1,
            vec![
                menu(201, "Salmon Sashimi", 85000.0, "food"),
                menu(202, "Ocha", 8000.0, "drink"),
            ],
            vec![review(3, 5.0, "Fresh fish", "Citra")],
        ),
        restaurant(
            3,
            "Warung Nasi Ibu",
            4.2,
            "Depok",
            None,
            14.8,
            vec![
                menu(301, "Nasi Goreng", 25000.0, "food"),
                menu(302, "Es Jeruk", 7000.0, "drink"),
            ],
            Vec::new(),
        ),
        restaurant(
            4,
            "Roti Bakar 88",
            3.9,
            "Jakarta Barat",
            Some("Bakery"),
            8.7,
            vec![menu(401, "Roti Bakar Coklat", 20000.0, "food")],
            vec![review(4, 3.0, "Okay", "Dedi"), review(5, 5.0, "Love the cheese", "Eka")],
        ),
    ]
}
