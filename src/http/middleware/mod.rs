//! Axum middleware for the API.
//!
//! # Ordering
//! ```text
//! TraceLayer
//!     → correlation.rs (resolve id, span, response header, failure logging)
//!     → panic catcher (500 envelope)
//!     → timeout.rs (408 envelope past the request deadline)
//!     → guard.rs (per-route pipeline: auth, admin, CSRF)
//!     → handler
//! ```

pub mod correlation;
pub mod guard;
pub mod timeout;

pub use correlation::correlation_middleware;
pub use guard::{enforce, guarded, Guard};
pub use timeout::timeout_middleware;
