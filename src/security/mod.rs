//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → csrf.rs (double-submit check for state-changing calls)
//!     → Pass to handler
//! Outgoing response:
//!     → headers.rs (nosniff, frame denial, referrer policy, no-store)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a missing token is a rejection, never a pass
//! - No trust in client input

pub mod csrf;
pub mod headers;

pub use csrf::{requires_csrf, CsrfGuard, IssuedToken, CSRF_COOKIE, CSRF_HEADER};
