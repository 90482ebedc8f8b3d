//! Synchronous API client core for the restaurant ordering service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Every response body is
//! checked against the API envelope and then against the endpoint's domain
//! schema; every failure, from a dropped connection to a malformed body, is
//! normalized into a single `ApiError` that carries a display message,
//! optional per-field messages, and a retriability flag for `RetryPolicy`.
//!
//! # Design
//! - `RestoClient` holds only `base_url`, a `CredentialProvider` and a `RetryPolicy`.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Parsing, normalization and retry decisions are pure functions.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod http;
pub mod models;
pub mod parse;
pub mod retry;
pub mod schema;

pub use client::RestoClient;
pub use config::{ClientConfig, ConfigError};
pub use credentials::{CredentialProvider, NoCredentials, SharedToken, StaticToken};
pub use envelope::{
    validate_failure_envelope, validate_success_envelope, EnvelopeMismatch, FailureEnvelope,
    SuccessEnvelope,
};
pub use error::{normalize_error, ApiError, BuildError, Failure};
pub use http::{HttpMethod, HttpRequest, HttpResponse, TransportFailure};
pub use parse::parse_response;
pub use retry::{delay_before_retry, should_retry, RetryPolicy};
pub use schema::{Schema, SchemaError};
