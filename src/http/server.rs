//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with API and admin routes
//! - Wire up middleware (tracing, correlation, panic catcher, timeout, headers)
//! - Own the shared application state
//! - Serve until the shutdown signal fires

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::auth::SessionTable;
use crate::cache::SimpleCache;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::middleware::{correlation_middleware, timeout_middleware};
use crate::store::{BrandStore, InMemoryBrandStore};
use crate::{admin, api, security};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ArcSwap<ApiConfig>>,
    sessions: Arc<SessionTable>,
    cache: SimpleCache,
    brands: Arc<dyn BrandStore>,
    started_at: Instant,
}

impl AppState {
    /// State backed by an in-memory brand store.
    pub fn new(config: ApiConfig) -> Self {
        Self::with_brand_store(config, Arc::new(InMemoryBrandStore::new()))
    }

    pub fn with_brand_store(config: ApiConfig, brands: Arc<dyn BrandStore>) -> Self {
        let sessions = Arc::new(SessionTable::from_seeds(
            config.auth.session_cookie.clone(),
            &config.auth.sessions,
        ));
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            sessions,
            cache: SimpleCache::new(),
            brands,
            started_at: Instant::now(),
        }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<ApiConfig> {
        self.config.load_full()
    }

    pub fn sessions(&self) -> Arc<SessionTable> {
        self.sessions.clone()
    }

    pub fn cache(&self) -> &SimpleCache {
        &self.cache
    }

    pub fn brands(&self) -> &dyn BrandStore {
        self.brands.as_ref()
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Swap in a reloaded configuration.
    ///
    /// Sessions, CSRF cookie flags and cache lifetimes follow the new config
    /// immediately; listener, timeout and body-limit settings need a restart.
    pub fn reload(&self, config: ApiConfig) {
        self.sessions.set_cookie_name(config.auth.session_cookie.clone());
        self.sessions.replace_all(&config.auth.sessions);
        self.config.store(Arc::new(config));
        tracing::info!("Configuration reloaded");
    }
}

/// Build the full router with every layer applied.
pub fn build_router(state: AppState) -> Router {
    let config = state.config();

    let mut router = Router::new()
        .merge(api::router(&state))
        .merge(admin::router(&state))
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::method_not_allowed)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .layer(middleware::from_fn_with_state(
            Duration::from_secs(config.timeouts.request_secs),
            timeout_middleware,
        ));

    if config.security.enable_headers {
        router = security::headers::apply(router);
    }

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(correlation_middleware))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::internal(format!("handler panicked: {detail}")).into_response()
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: ApiConfig) -> Self {
        Self::from_state(AppState::new(config))
    }

    pub fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { router, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Router clone for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Accept connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
