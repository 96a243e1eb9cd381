//! Session resolution.
//!
//! # Responsibilities
//! - Read the session token from `Authorization: Bearer` or the session cookie
//! - Map the token to an `Identity`
//!
//! # Design Decisions
//! - `SessionTable` is an in-memory stand-in for the hosted auth provider
//! - The table and its cookie name are replaced as a whole on config reload

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use dashmap::DashMap;

use crate::auth::identity::Identity;
use crate::config::SessionSeed;
use crate::error::ApiError;
use crate::http::request::cookie_value;

/// Resolves the caller's identity from request headers.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `Ok(None)` means no valid session; errors are collaborator failures.
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, ApiError>;
}

/// Token → identity table.
pub struct SessionTable {
    cookie_name: ArcSwap<String>,
    sessions: DashMap<String, Identity>,
}

impl SessionTable {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: ArcSwap::from_pointee(cookie_name.into()),
            sessions: DashMap::new(),
        }
    }

    /// Build a table from configured seeds.
    pub fn from_seeds(cookie_name: impl Into<String>, seeds: &[SessionSeed]) -> Self {
        let table = Self::new(cookie_name);
        table.replace_all(seeds);
        table
    }

    pub fn cookie_name(&self) -> Arc<String> {
        self.cookie_name.load_full()
    }

    /// Switch the cookie consulted for sessions.
    pub fn set_cookie_name(&self, cookie_name: impl Into<String>) {
        self.cookie_name.store(Arc::new(cookie_name.into()));
    }

    pub fn insert(&self, token: impl Into<String>, identity: Identity) {
        self.sessions.insert(token.into(), identity);
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Replace every session with the given seeds.
    pub fn replace_all(&self, seeds: &[SessionSeed]) {
        self.sessions.retain(|token, _| seeds.iter().any(|s| &s.token == token));
        for seed in seeds {
            self.sessions.insert(seed.token.clone(), seed.identity());
        }
        tracing::info!(sessions = self.sessions.len(), "Session table seeded");
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn token<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        bearer.or_else(|| {
            let cookie_name = self.cookie_name.load();
            cookie_value(headers, cookie_name.as_str()).filter(|t| !t.is_empty())
        })
    }

    pub fn lookup(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = self.token(headers)?;
        self.sessions.get(token).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl SessionResolver for SessionTable {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, ApiError> {
        Ok(self.lookup(headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Role;
    use axum::http::HeaderValue;

    fn seed(token: &str, role: Role) -> SessionSeed {
        SessionSeed {
            token: token.to_string(),
            user_id: format!("user-{token}"),
            email: format!("{token}@example.com"),
            role,
        }
    }

    #[test]
    fn test_bearer_token_resolves() {
        let table = SessionTable::from_seeds("mixer_session", &[seed("t1", Role::Editor)]);
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t1"));

        let who = table.lookup(&headers).unwrap();
        assert_eq!(who.id, "user-t1");
        assert_eq!(who.role, Role::Editor);
    }

    #[test]
    fn test_cookie_token_resolves() {
        let table = SessionTable::from_seeds("mixer_session", &[seed("t2", Role::Admin)]);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("mixer_session=t2"));

        assert!(table.lookup(&headers).unwrap().is_admin());
    }

    #[test]
    fn test_unknown_or_missing_token() {
        let table = SessionTable::from_seeds("mixer_session", &[seed("t1", Role::Viewer)]);
        assert!(table.lookup(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert!(table.lookup(&headers).is_none());
    }

    #[test]
    fn test_cookie_name_can_change() {
        let table = SessionTable::from_seeds("mixer_session", &[seed("t3", Role::Viewer)]);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=t3"));
        assert!(table.lookup(&headers).is_none());

        table.set_cookie_name("sid");
        assert_eq!(table.cookie_name().as_str(), "sid");
        assert!(table.lookup(&headers).is_some());
    }

    #[test]
    fn test_replace_all_drops_stale_sessions() {
        let table = SessionTable::from_seeds("s", &[seed("old", Role::Viewer)]);
        table.replace_all(&[seed("new", Role::Viewer)]);

        assert_eq!(table.len(), 1);
        assert!(!table.revoke("old"));
        assert!(table.revoke("new"));
        assert!(table.is_empty());
    }
}
