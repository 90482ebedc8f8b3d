//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network; the caller (host) executes the actual I/O and
//! reports what happened, either a response of any status or a
//! `TransportFailure`.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RestoClient::build_*` methods. `path` is the absolute URL,
/// query string included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller for every response received, whatever its
/// status, then passed to `RestoClient::parse_*` or `parse_response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// A request that did not produce a usable response.
///
/// `response` is `None` when nothing came back at all (DNS failure, refused
/// connection, timeout). Transports that reject non-2xx statuses report the
/// rejected response here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub response: Option<HttpResponse>,
    pub reason: String,
}

impl TransportFailure {
    /// No response was received.
    pub fn network(reason: impl Into<String>) -> Self {
        Self {
            response: None,
            reason: reason.into(),
        }
    }

    /// A response was received but the transport treated it as a failure.
    pub fn rejected(response: HttpResponse) -> Self {
        let reason = format!("HTTP {}", response.status);
        Self {
            response: Some(response),
            reason,
        }
    }

    /// The received status, or `None` for network-level failures.
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure: {}", self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/api/resto".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer abc".to_string())],
            body: None,
        };
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn network_failure_has_no_status() {
        let failure = TransportFailure::network("connection refused");
        assert_eq!(failure.status(), None);
        assert_eq!(failure.to_string(), "transport failure: connection refused");
    }

    #[test]
    fn rejected_failure_keeps_response() {
        let failure = TransportFailure::rejected(HttpResponse::new(503, "down"));
        assert_eq!(failure.status(), Some(503));
        assert_eq!(failure.reason, "HTTP 503");
    }
}
