//! Storage collaborators.
//!
//! The relational database is outside this service; handlers only see the
//! traits here. The in-memory implementations back development and tests.

pub mod brands;

pub use brands::{Brand, BrandStore, InMemoryBrandStore, NewBrand, StoreError};
