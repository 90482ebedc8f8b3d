//! Error normalization for the restaurant API client.
//!
//! # Design
//! Every failure a caller can observe is an `ApiError`: a status code (`0`
//! when no response arrived), a displayable message, optional per-field
//! messages for 422 responses, the raw `errors` payload for diagnostics, and a
//! retriability flag derived purely from the status.
//!
//! The normalizer's input is the tagged `Failure` enum, so an error that has
//! already been normalized is recognised by its type and passed through
//! untouched instead of being wrapped a second time.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::envelope::{validate_failure_envelope, FailureEnvelope};
use crate::http::TransportFailure;

pub(crate) const UNEXPECTED_RESPONSE: &str = "Unexpected API response";
const UNAUTHORIZED: &str = "Unauthorized / session expired";
const FORBIDDEN: &str = "You do not have permission to access this resource.";
const NOT_FOUND: &str = "Resource not found.";
const TOO_MANY_REQUESTS: &str = "Too many requests. Please try again.";
const SERVER_ERROR: &str = "Server error. Please try again.";
const REQUEST_FAILED: &str = "Request failed.";

/// The canonical error returned by every parse operation.
///
/// Fields are private; the constructors below are the only way to build one,
/// so `status`, `message` and `retriable` are always set together.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    status: u16,
    message: String,
    field_errors: Option<BTreeMap<String, String>>,
    raw_errors: Option<Value>,
    retriable: bool,
}

impl ApiError {
    /// The server broke the envelope contract. Never retried.
    pub fn unexpected_response(status: u16) -> Self {
        Self {
            status,
            message: UNEXPECTED_RESPONSE.to_string(),
            field_errors: None,
            raw_errors: None,
            retriable: false,
        }
    }

    /// Classify a failed exchange from its status and (decoded) body.
    ///
    /// `status` is `0` when no response was received.
    pub fn from_status(status: u16, body: Option<Value>) -> Self {
        let envelope = body
            .as_ref()
            .and_then(|body| validate_failure_envelope(body).ok());
        Self::classify(status, envelope, body)
    }

    pub(crate) fn from_envelope(status: u16, envelope: FailureEnvelope) -> Self {
        Self::classify(status, Some(envelope), None)
    }

    fn classify(status: u16, envelope: Option<FailureEnvelope>, body: Option<Value>) -> Self {
        let message = match forced_message(status) {
            Some(forced) => forced.to_string(),
            None => envelope
                .as_ref()
                .map(|env| env.message.as_str())
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(REQUEST_FAILED)
                .to_string(),
        };

        let field_errors = match (status, &envelope) {
            (422, Some(env)) => env.errors.as_ref().and_then(field_errors_of),
            _ => None,
        };

        let raw_errors = match envelope {
            Some(env) => env.errors,
            None => body,
        };

        Self {
            status,
            message,
            field_errors,
            raw_errors,
            retriable: is_retriable_status(status),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        self.field_errors.as_ref()
    }

    /// Message for a single input field, if the server reported one.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .map(String::as_str)
    }

    pub fn raw_errors(&self) -> Option<&Value> {
        self.raw_errors.as_ref()
    }

    pub fn is_retriable(&self) -> bool {
        self.retriable
    }

    /// True when no response was received at all.
    pub fn is_network(&self) -> bool {
        self.status == 0
    }

    /// True for 401; callers typically drop their credentials on this.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// What went wrong, before normalization.
#[derive(Debug, Clone)]
pub enum Failure {
    /// The transport produced no usable response.
    Transport(TransportFailure),
    /// Already normalized.
    Api(ApiError),
}

impl From<TransportFailure> for Failure {
    fn from(failure: TransportFailure) -> Self {
        Failure::Transport(failure)
    }
}

impl From<ApiError> for Failure {
    fn from(error: ApiError) -> Self {
        Failure::Api(error)
    }
}

impl From<TransportFailure> for ApiError {
    fn from(failure: TransportFailure) -> Self {
        normalize_error(failure)
    }
}

/// Turn any failure into an `ApiError`. Total and idempotent.
pub fn normalize_error(origin: impl Into<Failure>) -> ApiError {
    match origin.into() {
        Failure::Api(error) => error,
        Failure::Transport(failure) => {
            let status = failure.status().unwrap_or(0);
            let body = failure.response.as_ref().map(|r| decode_body(&r.body));
            let error = ApiError::from_status(status, body);
            debug!(
                status,
                reason = %failure.reason,
                retriable = error.retriable,
                "normalized transport failure"
            );
            error
        }
    }
}

/// Errors raised while building a request.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn forced_message(status: u16) -> Option<&'static str> {
    match status {
        401 => Some(UNAUTHORIZED),
        403 => Some(FORBIDDEN),
        404 => Some(NOT_FOUND),
        429 => Some(TOO_MANY_REQUESTS),
        0 | 500.. => Some(SERVER_ERROR),
        _ => None,
    }
}

fn is_retriable_status(status: u16) -> bool {
    matches!(status, 0 | 429 | 500 | 502 | 503)
}

/// Decode a response body for diagnostics. Non-JSON text, including an empty
/// body, is kept verbatim as a string.
pub(crate) fn decode_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// `{ field: "msg" | ["msg", ...] }` to `{ field: "msg" }`. Other values are dropped.
fn field_errors_of(errors: &Value) -> Option<BTreeMap<String, String>> {
    let object = errors.as_object()?;
    let fields: BTreeMap<String, String> = object
        .iter()
        .filter_map(|(field, value)| {
            let message = match value {
                Value::String(message) => message.clone(),
                Value::Array(messages) => match messages.first()? {
                    Value::String(message) => message.clone(),
                    other => other.to_string(),
                },
                _ => return None,
            };
            Some((field.clone(), message))
        })
        .collect();
    (!fields.is_empty()).then_some(fields)
}
