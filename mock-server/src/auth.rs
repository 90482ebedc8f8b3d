use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{fail, json_body, ok, Db, UserRecord};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn user_json(user: &UserRecord) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "phone": user.phone,
    })
}

/// `local@label.label`, no whitespace, one `@`, no empty domain labels.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Per-field messages in the `{ field: [message] }` form used for 422s.
pub fn register_errors(input: &RegisterInput) -> Map<String, Value> {
    let mut errors = Map::new();
    let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

    if blank(&input.name) {
        errors.insert("name".into(), json!(["Name is required"]));
    }
    match input.email.as_deref() {
        Some(email) if looks_like_email(email) => {}
        Some(email) if !email.trim().is_empty() => {
            errors.insert("email".into(), json!(["Invalid email"]));
        }
        _ => {
            errors.insert("email".into(), json!(["Email is required"]));
        }
    }
    if blank(&input.phone) {
        errors.insert("phone".into(), json!(["Phone is required"]));
    }
    if input.password.as_deref().map_or(0, str::len) < MIN_PASSWORD_LEN {
        errors.insert(
            "password".into(),
            json!([format!("Password must be at least {MIN_PASSWORD_LEN} characters")]),
        );
    }
    errors
}

pub async fn register(
    State(db): State<Db>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> Response {
    let input = match json_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let errors = register_errors(&input);
    if !errors.is_empty() {
        return fail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation error",
            Some(Value::Object(errors)),
        );
    }

    let mut store = db.write().await;
    let email = input.email.unwrap_or_default();
    if store.users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
        return fail(StatusCode::CONFLICT, "Email already registered", None);
    }
    let user = UserRecord {
        id: store.users.len() as i64 + 1,
        name: input.name.unwrap_or_default(),
        email,
        phone: input.phone.unwrap_or_default(),
        password: input.password.unwrap_or_default(),
    };
    let token = Uuid::new_v4().to_string();
    store.tokens.insert(token.clone(), user.id);
    let data = json!({"token": token, "user": user_json(&user)});
    store.users.push(user);
    ok(StatusCode::CREATED, "User registered successfully", data)
}

pub async fn login(
    State(db): State<Db>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Response {
    let input = match json_body(body) {
        Ok(input) => input,
        Err(response) => return response,
    };
    let (Some(email), Some(password)) = (input.email, input.password) else {
        return fail(StatusCode::BAD_REQUEST, "Email and password are required", None);
    };

    let mut store = db.write().await;
    let Some(user) = store
        .users
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(&email) && u.password == password)
        .cloned()
    else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid email or password", None);
    };
    let token = Uuid::new_v4().to_string();
    store.tokens.insert(token.clone(), user.id);
    ok(
        StatusCode::OK,
        "Login successful",
        json!({"token": token, "user": user_json(&user)}),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str, phone: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn valid_registration_has_no_errors() {
        assert!(register_errors(&input("Jane", "jane@example.com", "0812", "secret1")).is_empty());
    }

    #[test]
    fn each_invalid_field_is_reported() {
        let errors = register_errors(&input("", "jane", " ", "123"));
        assert_eq!(errors["name"], json!(["Name is required"]));
        assert_eq!(errors["email"], json!(["Invalid email"]));
        assert_eq!(errors["phone"], json!(["Phone is required"]));
        assert_eq!(errors["password"], json!(["Password must be at least 6 characters"]));
    }

    #[test]
    fn malformed_emails_are_invalid() {
        for bad in ["ja ne@example.com", "a@b..c", "jane@.example.com", "a@b@c.com", " jane@example.com"] {
            let errors = register_errors(&input("Jane", bad, "0812", "secret1"));
            assert_eq!(errors["email"], json!(["Invalid email"]), "{bad}");
        }
    }

    #[test]
    fn missing_email_is_required_not_invalid() {
        let errors = register_errors(&RegisterInput {
            name: Some("Jane".into()),
            email: None,
            phone: Some("0812".into()),
            password: Some("secret1".into()),
        });
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["email"], json!(["Email is required"]));
    }
}
