use super::*;
use serde_json::json;

// =============================================================
// CreateOrderRequest
// =============================================================

#[test]
fn create_request_serializes_cart() {
    let request = CreateOrderRequest { cart: vec![CartItem::new("pitchai_upgrade", 1)] };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "cart": [{ "id": "pitchai_upgrade", "quantity": "1" }] })
    );
}

// =============================================================
// CreateOrderResponse
// =============================================================

#[test]
fn create_with_id_is_created() {
    let classified = CreateOrderResponse::classify(json!({ "id": "5O190127TN364715T", "status": "CREATED" }));
    assert_eq!(classified, CreateOrderResponse::Created { id: OrderId::new("5O190127TN364715T") });
}

#[test]
fn create_with_empty_id_is_not_created() {
    let classified = CreateOrderResponse::classify(json!({ "id": "" }));
    assert!(matches!(classified, CreateOrderResponse::Unrecognized(_)));
}

#[test]
fn create_with_numeric_id_is_created() {
    let classified = CreateOrderResponse::classify(json!({ "id": 42 }));
    assert_eq!(classified, CreateOrderResponse::Created { id: OrderId::new("42") });
}

#[test]
fn create_with_zero_or_non_scalar_id_is_not_created() {
    assert!(matches!(CreateOrderResponse::classify(json!({ "id": 0 })), CreateOrderResponse::Unrecognized(_)));
    assert!(matches!(CreateOrderResponse::classify(json!({ "id": ["x"] })), CreateOrderResponse::Unrecognized(_)));
}

#[test]
fn create_with_details_is_error_detail() {
    let classified = CreateOrderResponse::classify(json!({
        "name": "UNPROCESSABLE_ENTITY",
        "details": [{ "issue": "INVALID_CURRENCY", "description": "Currency not supported" }],
        "debug_id": "dbg-1"
    }));
    assert_eq!(
        classified,
        CreateOrderResponse::ErrorDetail(ProviderError {
            issue: Some("INVALID_CURRENCY".into()),
            description: Some("Currency not supported".into()),
            debug_id: Some("dbg-1".into()),
        })
    );
}

#[test]
fn create_empty_object_is_unrecognized() {
    assert_eq!(CreateOrderResponse::classify(json!({})), CreateOrderResponse::Unrecognized(json!({})));
}

#[test]
fn create_with_empty_details_is_unrecognized() {
    assert!(matches!(CreateOrderResponse::classify(json!({ "details": [] })), CreateOrderResponse::Unrecognized(_)));
}

// =============================================================
// CaptureResponse
// =============================================================

#[test]
fn capture_declined_is_error_detail_with_issue() {
    let classified = CaptureResponse::classify(json!({ "details": [{ "issue": "INSTRUMENT_DECLINED" }] }));
    let CaptureResponse::ErrorDetail(error) = classified else {
        panic!("expected error detail");
    };
    assert!(error.has_issue("INSTRUMENT_DECLINED"));
    assert_eq!(error.debug_id, None);
}

#[test]
fn capture_prefers_captures_over_authorizations() {
    let body = json!({
        "purchase_units": [{ "payments": {
            "captures": [{ "id": "T123", "status": "COMPLETED" }],
            "authorizations": [{ "id": "A999", "status": "CREATED" }]
        }}]
    });
    let CaptureResponse::Captured { transaction, .. } = CaptureResponse::classify(body) else {
        panic!("expected captured");
    };
    assert_eq!(transaction, Transaction { id: "T123".into(), status: "COMPLETED".into() });
}

#[test]
fn capture_falls_back_to_authorization() {
    let body = json!({
        "purchase_units": [{ "payments": { "authorizations": [{ "id": "A999", "status": "CREATED" }] } }]
    });
    let CaptureResponse::Captured { transaction, .. } = CaptureResponse::classify(body) else {
        panic!("expected captured");
    };
    assert_eq!(transaction.id, "A999");
}

#[test]
fn capture_without_status_reports_unknown() {
    let body = json!({ "purchase_units": [{ "payments": { "captures": [{ "id": "T1" }] } }] });
    let CaptureResponse::Captured { transaction, .. } = CaptureResponse::classify(body) else {
        panic!("expected captured");
    };
    assert_eq!(transaction.status, "UNKNOWN");
}

#[test]
fn capture_with_units_but_no_payments_is_missing_transaction() {
    let body = json!({ "purchase_units": [{ "reference_id": "default" }] });
    assert!(matches!(CaptureResponse::classify(body), CaptureResponse::MissingTransaction(_)));
}

#[test]
fn capture_without_units_is_unrecognized() {
    assert!(matches!(CaptureResponse::classify(json!({ "status": "COMPLETED" })), CaptureResponse::Unrecognized(_)));
    assert!(matches!(CaptureResponse::classify(json!({ "purchase_units": null })), CaptureResponse::Unrecognized(_)));
}

// =============================================================
// ProviderError formatting
// =============================================================

#[test]
fn summary_includes_issue_description_and_debug_id() {
    let error = ProviderError {
        issue: Some("INVALID_CURRENCY".into()),
        description: Some("Currency not supported".into()),
        debug_id: Some("dbg-1".into()),
    };
    assert_eq!(error.summary(), "INVALID_CURRENCY Currency not supported (dbg-1)");
    assert_eq!(error.reason(), "Currency not supported (dbg-1)");
}

#[test]
fn formatting_skips_absent_parts() {
    let error = ProviderError { issue: Some("ORDER_NOT_APPROVED".into()), ..ProviderError::default() };
    assert_eq!(error.summary(), "ORDER_NOT_APPROVED");
    assert_eq!(error.reason(), "ORDER_NOT_APPROVED");
    assert_eq!(ProviderError::default().summary(), "unknown provider error");
}
