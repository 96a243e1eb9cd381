//! Property tests for envelopes, pagination and correlation ids.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use proptest::prelude::*;

use mixer_api::http::{fail, ok, CorrelationId, Pagination, X_REQUEST_ID};

proptest! {
    #[test]
    fn prop_pagination_covers_total(page in 1u32..1000, limit in 1u32..=100, total in 0u64..100_000) {
        let p = Pagination::new(page, limit, total);
        let pages = p.total_pages as u64;
        prop_assert!(pages * limit as u64 >= total);
        if total > 0 {
            prop_assert!((pages - 1) * (limit as u64) < total);
        } else {
            prop_assert_eq!(pages, 0);
        }
    }

    #[test]
    fn prop_failure_envelope_has_no_data(message in ".{0,64}", code in 400u16..600) {
        let status = StatusCode::from_u16(code).unwrap();
        let body = serde_json::to_value(fail(status, message.clone(), None).envelope()).unwrap();
        prop_assert_eq!(&body["success"], &serde_json::json!(false));
        prop_assert!(body.get("data").is_none());
        prop_assert_eq!(body["error"].as_str(), Some(message.as_str()));
    }

    #[test]
    fn prop_success_envelope_has_no_error(value in any::<i64>()) {
        let body = serde_json::to_value(ok(value).envelope()).unwrap();
        prop_assert_eq!(&body["success"], &serde_json::json!(true));
        prop_assert!(body.get("error").is_none());
        prop_assert_eq!(body["data"].as_i64(), Some(value));
    }

    #[test]
    fn prop_visible_inbound_ids_are_kept(id in "[!-~]{1,128}") {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_str(&id).unwrap());
        let resolved = CorrelationId::resolve(&headers);
        prop_assert_eq!(resolved.as_str(), id.as_str());
    }
}
