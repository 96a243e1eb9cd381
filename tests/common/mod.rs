//! Shared helpers for in-process API tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use mixer_api::auth::Role;
use mixer_api::config::{ApiConfig, SessionSeed};
use mixer_api::{build_router, AppState};

pub const ADMIN: &str = "admin-token";
pub const EDITOR: &str = "editor-token";
pub const VIEWER: &str = "viewer-token";

fn seed(token: &str, user_id: &str, role: Role) -> SessionSeed {
    SessionSeed {
        token: token.to_string(),
        user_id: user_id.to_string(),
        email: format!("{user_id}@mixer.test"),
        role,
    }
}

pub fn test_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.security.csrf.secure_cookie = false;
    config.auth.sessions = vec![
        seed(ADMIN, "u-admin", Role::Admin),
        seed(EDITOR, "u-editor", Role::Editor),
        seed(VIEWER, "u-viewer", Role::Viewer),
    ];
    config
}

pub fn test_app() -> (Router, AppState) {
    let state = AppState::new(test_config());
    (build_router(state.clone()), state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Request builder carrying optional session and CSRF credentials.
pub struct Call {
    method: Method,
    uri: String,
    session: Option<String>,
    csrf: Option<String>,
    body: Option<Value>,
    extra: Vec<(&'static str, String)>,
}

impl Call {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            session: None,
            csrf: None,
            body: None,
            extra: Vec::new(),
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::DELETE, uri)
    }

    pub fn session(mut self, token: &str) -> Self {
        self.session = Some(token.to_string());
        self
    }

    /// Send `token` as both the CSRF cookie and header.
    pub fn csrf(mut self, token: &str) -> Self {
        self.csrf = Some(token.to_string());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.extra.push((name, value.into()));
        self
    }

    pub async fn send(self, router: &Router) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);

        let mut cookies = Vec::new();
        if let Some(session) = &self.session {
            cookies.push(format!("mixer_session={session}"));
        }
        if let Some(token) = &self.csrf {
            cookies.push(format!("csrf_token={token}"));
            builder = builder.header("x-csrf-token", token);
        }
        if !cookies.is_empty() {
            builder = builder.header(header::COOKIE, cookies.join("; "));
        }
        for (name, value) in self.extra {
            builder = builder.header(name, value);
        }

        let body = match self.body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, headers, body }
    }
}

/// Fetch a CSRF token the way a browser client would.
pub async fn csrf_token(router: &Router) -> String {
    let res = Call::get("/api/csrf").send(router).await;
    assert_eq!(res.status, StatusCode::OK);
    res.body["data"]["token"].as_str().unwrap().to_string()
}
