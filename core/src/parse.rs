//! Response parsing: envelope first, then the domain schema.
//!
//! # Design
//! The parser trusts the envelope, not the status code. A body that claims
//! success but carries the wrong resource shape, or a body matching neither
//! envelope, is a contract violation and is never reported as retriable.

use serde_json::Value;
use tracing::warn;

use crate::envelope::{validate_failure_envelope, validate_success_envelope};
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::schema::Schema;

/// Validate `response` against the envelope and `T`'s schema.
pub fn parse_response<T: Schema>(response: &HttpResponse) -> Result<T, ApiError> {
    if response.status == 204 {
        return Ok(T::no_content());
    }

    let Ok(body) = serde_json::from_str::<Value>(&response.body) else {
        warn!(status = response.status, "response body is not JSON");
        return Err(ApiError::unexpected_response(response.status));
    };

    if let Ok(envelope) = validate_success_envelope(&body) {
        return T::validate(envelope.data).map_err(|err| {
            warn!(status = response.status, error = %err, "success envelope carries unexpected data");
            ApiError::unexpected_response(500)
        });
    }

    match validate_failure_envelope(&body) {
        Ok(envelope) => Err(ApiError::from_envelope(response.status, envelope)),
        Err(mismatch) => {
            warn!(status = response.status, %mismatch, "response matches no envelope");
            Err(ApiError::unexpected_response(response.status))
        }
    }
}
