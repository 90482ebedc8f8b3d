//! The response envelope every API body is wrapped in.
//!
//! ```text
//! { "success": true,  "message": string, "data": <resource-specific> }
//! { "success": false, "message": string, "errors"?: object|string|null }
//! ```
//!
//! # Design
//! Validation works on an already-decoded `serde_json::Value` and returns a
//! `Result` rather than deserializing straight into a tagged enum, so the
//! parser can try one shape, then the other, then give up with a precise
//! reason. The `success` discriminator must be a JSON boolean literal; no
//! truthiness coercion happens anywhere.

use serde_json::{Map, Value};
use thiserror::Error;

/// A body that claims success. `data` is not validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessEnvelope {
    pub message: String,
    pub data: Value,
}

/// A body that declares failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureEnvelope {
    pub message: String,
    /// Absent and `null` both map to `None`.
    pub errors: Option<Value>,
}

/// Why a value does not match the requested envelope shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeMismatch {
    #[error("envelope is not a JSON object")]
    NotAnObject,
    #[error("`success` is not the boolean {expected}")]
    WrongDiscriminator { expected: bool },
    #[error("`message` is missing or not a string")]
    MissingMessage,
}

/// Accept `body` iff it is `{ success: true, message: <string>, data?: any }`.
pub fn validate_success_envelope(body: &Value) -> Result<SuccessEnvelope, EnvelopeMismatch> {
    let object = discriminate(body, true)?;
    Ok(SuccessEnvelope {
        message: message_of(object)?,
        data: object.get("data").cloned().unwrap_or(Value::Null),
    })
}

/// Accept `body` iff it is `{ success: false, message: <string>, errors?: any }`.
pub fn validate_failure_envelope(body: &Value) -> Result<FailureEnvelope, EnvelopeMismatch> {
    let object = discriminate(body, false)?;
    let errors = match object.get("errors") {
        None | Some(Value::Null) => None,
        Some(errors) => Some(errors.clone()),
    };
    Ok(FailureEnvelope {
        message: message_of(object)?,
        errors,
    })
}

fn discriminate(body: &Value, expected: bool) -> Result<&Map<String, Value>, EnvelopeMismatch> {
    let object = body.as_object().ok_or(EnvelopeMismatch::NotAnObject)?;
    match object.get("success") {
        Some(Value::Bool(flag)) if *flag == expected => Ok(object),
        _ => Err(EnvelopeMismatch::WrongDiscriminator { expected }),
    }
}

fn message_of(object: &Map<String, Value>) -> Result<String, EnvelopeMismatch> {
    object
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(EnvelopeMismatch::MissingMessage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_accepts_any_data() {
        let env = validate_success_envelope(&json!({
            "success": true,
            "message": "ok",
            "data": [1, 2, 3]
        }))
        .unwrap();
        assert_eq!(env.message, "ok");
        assert_eq!(env.data, json!([1, 2, 3]));
    }

    #[test]
    fn success_envelope_without_data_yields_null() {
        let env = validate_success_envelope(&json!({"success": true, "message": "ok"})).unwrap();
        assert_eq!(env.data, Value::Null);
    }

    #[test]
    fn success_envelope_requires_string_message() {
        let err = validate_success_envelope(&json!({"success": true, "message": 7, "data": {}}))
            .unwrap_err();
        assert_eq!(err, EnvelopeMismatch::MissingMessage);

        let err = validate_success_envelope(&json!({"success": true, "data": {}})).unwrap_err();
        assert_eq!(err, EnvelopeMismatch::MissingMessage);
    }

    #[test]
    fn success_envelope_rejects_false_discriminator() {
        let err = validate_success_envelope(&json!({"success": false, "message": "ok"}))
            .unwrap_err();
        assert_eq!(err, EnvelopeMismatch::WrongDiscriminator { expected: true });
    }

    #[test]
    fn truthy_discriminators_are_not_coerced() {
        for success in [json!("true"), json!(1), json!({}), Value::Null] {
            let body = json!({"success": success, "message": "ok", "data": {}});
            assert!(validate_success_envelope(&body).is_err(), "{body}");
        }
        for success in [json!("false"), json!(0), Value::Null] {
            let body = json!({"success": success, "message": "nope"});
            assert!(validate_failure_envelope(&body).is_err(), "{body}");
        }
    }

    #[test]
    fn non_objects_never_match() {
        for body in [json!([]), json!("success"), json!(true), Value::Null] {
            assert_eq!(
                validate_success_envelope(&body).unwrap_err(),
                EnvelopeMismatch::NotAnObject
            );
            assert_eq!(
                validate_failure_envelope(&body).unwrap_err(),
                EnvelopeMismatch::NotAnObject
            );
        }
    }

    #[test]
    fn failure_envelope_errors_are_optional_and_nullable() {
        let env = validate_failure_envelope(&json!({"success": false, "message": "bad"})).unwrap();
        assert_eq!(env.errors, None);

        let env = validate_failure_envelope(&json!({
            "success": false,
            "message": "bad",
            "errors": null
        }))
        .unwrap();
        assert_eq!(env.errors, None);

        let env = validate_failure_envelope(&json!({
            "success": false,
            "message": "bad",
            "errors": "free text"
        }))
        .unwrap();
        assert_eq!(env.errors, Some(json!("free text")));
    }

    #[test]
    fn shapes_are_mutually_exclusive() {
        let success = json!({"success": true, "message": "ok", "data": null});
        let failure = json!({"success": false, "message": "bad", "errors": {}});
        assert!(validate_failure_envelope(&success).is_err());
        assert!(validate_success_envelope(&failure).is_err());
    }
}
