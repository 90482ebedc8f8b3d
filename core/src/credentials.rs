//! Bearer-token sources for outgoing requests.
//!
//! The client asks its provider for a token every time it builds a request,
//! so a `SharedToken` updated after login or cleared after a 401 takes effect
//! on the next request without rebuilding the client.

use std::sync::{Arc, RwLock};

pub trait CredentialProvider: Send + Sync {
    /// The token to send, if any. Empty strings are treated as absent.
    fn bearer_token(&self) -> Option<String>;
}

/// Anonymous requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A token that can be replaced or cleared while the client is in use.
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    slot: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        self.replace(Some(token.into()));
    }

    pub fn clear(&self) {
        self.replace(None);
    }

    fn replace(&self, token: Option<String>) {
        let mut slot = match self.slot.write() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = token;
    }
}

impl CredentialProvider for SharedToken {
    fn bearer_token(&self) -> Option<String> {
        match self.slot.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_token_clones_see_updates() {
        let token = SharedToken::new();
        let handle = token.clone();
        assert_eq!(token.bearer_token(), None);

        handle.set("abc");
        assert_eq!(token.bearer_token().as_deref(), Some("abc"));

        handle.clear();
        assert_eq!(token.bearer_token(), None);
    }

    #[test]
    fn static_and_anonymous_providers() {
        assert_eq!(StaticToken("t".to_string()).bearer_token().as_deref(), Some("t"));
        assert_eq!(NoCredentials.bearer_token(), None);
    }
}
