//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and consistency.
//! All problems are reported together, not just the first.

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::ApiConfig;

/// One week.
pub const MAX_BRAND_TTL_SECS: u64 = 7 * 24 * 60 * 60;
/// One hour.
pub const MAX_REQUEST_SECS: u64 = 60 * 60;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u64 },

    #[error("unknown log level '{0}'")]
    LogLevel(String),

    #[error("session cookie name must be a non-empty token")]
    SessionCookie,

    #[error("session #{index}: {reason}")]
    Session { index: usize, reason: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    } else if config.timeouts.request_secs > MAX_REQUEST_SECS {
        errors.push(ValidationError::TooLarge {
            field: "timeouts.request_secs",
            max: MAX_REQUEST_SECS,
        });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "security.max_body_size" });
    }
    if config.cache.brand_ttl_secs == 0 {
        errors.push(ValidationError::Zero { field: "cache.brand_ttl_secs" });
    } else if config.cache.brand_ttl_secs > MAX_BRAND_TTL_SECS {
        errors.push(ValidationError::TooLarge {
            field: "cache.brand_ttl_secs",
            max: MAX_BRAND_TTL_SECS,
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    let cookie = &config.auth.session_cookie;
    if cookie.is_empty() || !cookie.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
        errors.push(ValidationError::SessionCookie);
    }

    let mut seen = HashSet::new();
    for (index, seed) in config.auth.sessions.iter().enumerate() {
        if seed.token.trim().is_empty() {
            errors.push(ValidationError::Session { index, reason: "empty token".into() });
        } else if !seen.insert(seed.token.as_str()) {
            errors.push(ValidationError::Session { index, reason: "duplicate token".into() });
        }
        if seed.user_id.trim().is_empty() {
            errors.push(ValidationError::Session { index, reason: "empty user_id".into() });
        }
        if !seed.email.contains('@') {
            errors.push(ValidationError::Session { index, reason: "invalid email".into() });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::config::schema::SessionSeed;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ApiConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ApiConfig::default();
        config.listener.bind_address = "not-an-addr".into();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "chatty".into();
        config.auth.session_cookie = "bad cookie".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero { field: "timeouts.request_secs" }));
        assert!(errors.contains(&ValidationError::LogLevel("chatty".into())));
    }

    #[test]
    fn test_duplicate_session_tokens() {
        let seed = SessionSeed {
            token: "t".into(),
            user_id: "u".into(),
            email: "u@example.com".into(),
            role: Role::Viewer,
        };
        let mut config = ApiConfig::default();
        config.auth.sessions = vec![seed.clone(), seed];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Session { index: 1, reason: "duplicate token".into() }]
        );
    }

    #[test]
    fn test_oversized_durations_rejected() {
        let mut config = ApiConfig::default();
        config.cache.brand_ttl_secs = i64::MAX as u64;
        config.timeouts.request_secs = MAX_REQUEST_SECS + 1;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::TooLarge {
            field: "cache.brand_ttl_secs",
            max: MAX_BRAND_TTL_SECS,
        }));
        assert!(errors.contains(&ValidationError::TooLarge {
            field: "timeouts.request_secs",
            max: MAX_REQUEST_SECS,
        }));

        config.cache.brand_ttl_secs = MAX_BRAND_TTL_SECS;
        config.timeouts.request_secs = MAX_REQUEST_SECS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ApiConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
