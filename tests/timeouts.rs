//! Request deadline handling with a slow storage collaborator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{test_config, Call, VIEWER};
use mixer_api::store::{Brand, BrandStore, StoreError};
use mixer_api::{build_router, AppState};

mod common;

struct SlowBrandStore {
    delay: Duration,
}

#[async_trait]
impl BrandStore for SlowBrandStore {
    async fn list(&self, _offset: usize, _limit: usize) -> Result<(Vec<Brand>, u64), StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok((Vec::new(), 0))
    }

    async fn get(&self, _id: Uuid) -> Result<Option<Brand>, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn insert(&self, brand: Brand) -> Result<Brand, StoreError> {
        Ok(brand)
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Ok(false)
    }
}

fn slow_app() -> (axum::Router, AppState) {
    let mut config = test_config();
    config.timeouts.request_secs = 1;
    let store = Arc::new(SlowBrandStore {
        delay: Duration::from_secs(3),
    });
    let state = AppState::with_brand_store(config, store);
    (build_router(state.clone()), state)
}

#[tokio::test]
async fn test_slow_handler_gets_timeout_envelope() {
    let (app, state) = slow_app();

    let res = Call::get("/api/brands")
        .session(VIEWER)
        .header("x-request-id", "slow-1")
        .send(&app)
        .await;

    assert_eq!(res.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(res.body["success"], json!(false));
    assert_eq!(res.body["error"], json!("Request timed out"));
    assert!(res.body["timestamp"].is_string());
    assert_eq!(res.headers.get("x-correlation-id").unwrap(), "slow-1");
    // Nothing was cached for the abandoned call.
    assert!(state.cache().is_empty());
}

#[tokio::test]
async fn test_fast_routes_unaffected_by_deadline() {
    let (app, _) = slow_app();
    let res = Call::get("/api/health").send(&app).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], json!(true));
}
