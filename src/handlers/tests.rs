// ---------------------------------------------------------------------------
// handlers/tests.rs -- Unit tests for error responses and the panic boundary
// ---------------------------------------------------------------------------

use axum::body::to_bytes;
use serde_json::Value;

use super::*;

async fn into_parts(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn bad_request_passes_message_through() {
    let (status, body) =
        into_parts(ApiError::BadRequest(NO_TEXT_MESSAGE.to_string()).into_response()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "error": "No text provided" }));
}

#[tokio::test]
async fn internal_error_hides_detail() {
    let (status, body) =
        into_parts(ApiError::Internal("db password is hunter2".to_string()).into_response()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({ "error": "An error occurred processing your request" })
    );
}

#[tokio::test]
async fn service_errors_become_internal() {
    let err: ApiError = ServiceError::NotConfigured("sentiment").into();
    assert!(matches!(err, ApiError::Internal(_)));
    let (status, _) = into_parts(err.into_response()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn panic_payloads_map_to_generic_500() {
    let payloads: [Box<dyn Any + Send>; 3] = [
        Box::new("boom"),
        Box::new(String::from("boom")),
        Box::new(42_u8),
    ];
    for payload in payloads {
        let (status, body) = into_parts(panic_response(payload)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}

#[tokio::test]
async fn home_reports_running() {
    let Json(status) = home().await;
    assert_eq!(status.message, system::STATUS_MESSAGE);
}
