//! Brand records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new brand.
#[derive(Debug, Clone)]
pub struct NewBrand {
    pub name: String,
    pub website_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
}

impl NewBrand {
    pub fn into_brand(self, created_by: impl Into<String>) -> Brand {
        Brand {
            id: Uuid::new_v4(),
            name: self.name,
            website_url: self.website_url,
            country: self.country,
            language: self.language,
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::internal(err.to_string())
    }
}

/// Persistence for brands.
#[async_trait]
pub trait BrandStore: Send + Sync {
    /// One page of brands ordered by creation time, plus the total count.
    async fn list(&self, offset: usize, limit: usize) -> Result<(Vec<Brand>, u64), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Brand>, StoreError>;

    async fn insert(&self, brand: Brand) -> Result<Brand, StoreError>;

    /// Returns false if no brand had this id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryBrandStore {
    brands: DashMap<Uuid, Brand>,
}

impl InMemoryBrandStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BrandStore for InMemoryBrandStore {
    async fn list(&self, offset: usize, limit: usize) -> Result<(Vec<Brand>, u64), StoreError> {
        let mut all: Vec<Brand> = self.brands.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));

        let total = all.len() as u64;
        let page = all.into_iter().skip(offset).take(limit).collect();
        Ok((page, total))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Brand>, StoreError> {
        Ok(self.brands.get(&id).map(|r| r.value().clone()))
    }

    async fn insert(&self, brand: Brand) -> Result<Brand, StoreError> {
        self.brands.insert(brand.id, brand.clone());
        Ok(brand)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.brands.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_brand(name: &str) -> NewBrand {
        NewBrand {
            name: name.to_string(),
            website_url: None,
            country: Some("GB".into()),
            language: Some("en".into()),
        }
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let store = InMemoryBrandStore::new();
        let brand = store.insert(new_brand("Acme").into_brand("u-1")).await.unwrap();

        assert_eq!(store.get(brand.id).await.unwrap(), Some(brand.clone()));
        assert!(store.delete(brand.id).await.unwrap());
        assert!(!store.delete(brand.id).await.unwrap());
        assert_eq!(store.get(brand.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let store = InMemoryBrandStore::new();
        for name in ["a", "b", "c"] {
            store.insert(new_brand(name).into_brand("u-1")).await.unwrap();
        }

        let (page, total) = store.list(2, 10).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);

        let (page, _) = store.list(0, 2).await.unwrap();
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_brand_json_is_camel_case() {
        let brand = new_brand("Acme").into_brand("u-1");
        let json = serde_json::to_value(&brand).unwrap();
        assert!(json.get("createdBy").is_some());
        assert!(json.get("websiteUrl").is_none());
    }
}
