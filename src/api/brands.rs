//! Brand endpoints.

use std::time::Duration;

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::api::extract::{JsonBody, QueryParams};
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::http::response::{created, ok, ok_paginated, ApiResponse, Pagination};
use crate::http::server::AppState;
use crate::store::{Brand, NewBrand};

/// Every cache key owned by this module starts with this prefix.
pub const CACHE_PREFIX: &str = "brands:";

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;
const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrand {
    #[serde(default)]
    pub name: String,
    pub website_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BrandPage {
    items: Vec<Brand>,
    total: u64,
}

fn ttl(state: &AppState) -> Duration {
    Duration::from_secs(state.config().cache.brand_ttl_secs)
}

fn list_key(page: u32, limit: u32) -> String {
    format!("{CACHE_PREFIX}list:{page}:{limit}")
}

fn item_key(id: Uuid) -> String {
    format!("{CACHE_PREFIX}item:{id}")
}

pub async fn list(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<ApiResponse<Vec<Brand>>, ApiError> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if page == 0 || limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::validation(
            "Invalid pagination",
            Some(json!({ "page": ">= 1", "limit": format!("1..={MAX_LIMIT}") })),
        ));
    }

    let key = list_key(page, limit);
    let cached = state.cache().get_as::<BrandPage>(&key);
    let result = match cached {
        Some(hit) => hit,
        None => {
            let offset = ((page - 1) as usize).saturating_mul(limit as usize);
            let (items, total) = state.brands().list(offset, limit as usize).await?;
            let fresh = BrandPage { items, total };
            state.cache().set_as(key, &fresh, ttl(&state))?;
            fresh
        }
    };

    Ok(ok_paginated(result.items, Pagination::new(page, limit, result.total)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    Path(id): Path<String>,
) -> Result<ApiResponse<Brand>, ApiError> {
    let id = parse_id(&id)?;
    let key = item_key(id);
    if let Some(brand) = state.cache().get_as::<Brand>(&key) {
        return Ok(ok(brand));
    }

    let brand = state
        .brands()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Brand not found"))?;
    state.cache().set_as(key, &brand, ttl(&state))?;
    Ok(ok(brand))
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    JsonBody(input): JsonBody<CreateBrand>,
) -> Result<ApiResponse<Brand>, ApiError> {
    let new_brand = validate(input)?;
    let brand = state.brands().insert(new_brand.into_brand(caller.id.as_str())).await?;

    state.cache().delete_by_prefix(CACHE_PREFIX);
    tracing::info!(brand_id = %brand.id, user_id = %caller.id, "Brand created");
    Ok(created(brand))
}

pub async fn remove(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> Result<ApiResponse<Value>, ApiError> {
    let id = parse_id(&id)?;
    if !state.brands().delete(id).await? {
        return Err(ApiError::not_found("Brand not found"));
    }

    state.cache().delete_by_prefix(CACHE_PREFIX);
    tracing::info!(brand_id = %id, user_id = %caller.id, "Brand deleted");
    Ok(ok(json!({ "id": id })))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation("Invalid brand id", Some(json!({ "id": raw }))))
}

fn validate(input: CreateBrand) -> Result<NewBrand, ApiError> {
    let mut problems = Map::new();

    let name = input.name.trim().to_string();
    if name.is_empty() {
        problems.insert("name".into(), json!("is required"));
    } else if name.chars().count() > MAX_NAME_LEN {
        problems.insert("name".into(), json!(format!("must be at most {MAX_NAME_LEN} characters")));
    }

    let website_url = non_blank(input.website_url);
    if let Some(url) = &website_url {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            problems.insert("websiteUrl".into(), json!("must be an http(s) URL"));
        }
    }

    if !problems.is_empty() {
        return Err(ApiError::validation("Invalid brand", Some(Value::Object(problems))));
    }

    Ok(NewBrand {
        name,
        website_url,
        country: non_blank(input.country),
        language: non_blank(input.language),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
