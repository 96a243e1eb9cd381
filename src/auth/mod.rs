//! Caller identity and session resolution.
//!
//! # Data Flow
//! ```text
//! Request headers
//!     → session.rs (bearer token or session cookie → Identity)
//!     → pipeline (Authenticate interceptor)
//!     → handler (Authenticated extractor)
//! ```
//!
//! # Design Decisions
//! - The hosted auth provider is abstracted behind `SessionResolver`
//! - Identity carries only the fields the pipeline inspects

pub mod identity;
pub mod session;

pub use identity::{Authenticated, Identity, Role};
pub use session::{SessionResolver, SessionTable};
