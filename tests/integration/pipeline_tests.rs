//! End-to-end pipeline tests.
//!
//! Each test drives a full origin-response event through the handler and
//! asserts on the response the platform would receive.

use std::sync::atomic::Ordering;

use edge_resizer::event::BodyEncoding;
use edge_resizer::handler::{ImageHandler, ERROR_BODY};

use super::test_utils::{
    create_test_jpeg, decoded_body, decoded_dimensions, make_event, MockObjectStore,
};

/// Handler over a store holding one 640x480 gradient JPEG at `pepe.jpg`.
fn handler_with_sample() -> ImageHandler<MockObjectStore> {
    let store = MockObjectStore::new().with_object("pepe.jpg", create_test_jpeg(640, 480, 90));
    ImageHandler::new(store)
}

// =============================================================================
// Terminal Outcomes
// =============================================================================

#[tokio::test]
async fn test_resize_request_returns_transformed_response() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event(
            "/pepe.jpg",
            "width=300&height=300&format=avif&type=cover&quality=100",
        ))
        .await;

    assert_eq!(response.status, "200");
    assert_eq!(response.status_description, "OK");
    assert_eq!(response.body_encoding, Some(BodyEncoding::Base64));
    assert_eq!(response.header("content-type"), Some("image/avif"));
    assert_eq!(response.header("cache-control"), Some("max-age=31536000"));

    let body = response.body.expect("success carries a body");
    let bytes = decoded_body(&body);
    assert!(!bytes.is_empty());
    // ISO BMFF container: "ftyp" box at offset 4
    assert_eq!(&bytes[4..8], b"ftyp");
}

#[tokio::test]
async fn test_height_only_passes_original_through() {
    let handler = handler_with_sample();
    let response = handler.handle(make_event("/pepe.jpg", "height=300")).await;

    assert_eq!(response.status, "204");
    assert_eq!(response.status_description, "Original Response");
    assert!(response.body.is_none());
    assert!(response.body_encoding.is_none());
    assert!(response.headers.is_empty());
}

#[tokio::test]
async fn test_no_parameters_passes_original_through() {
    let handler = handler_with_sample();
    let response = handler.handle(make_event("/pepe.jpg", "")).await;

    assert_eq!(response.status, "204");
    assert_eq!(response.status_description, "Original Response");
    assert!(response.body.is_none());
}

#[tokio::test]
async fn test_missing_object_returns_error_response() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/ghost.png", "width=300&height=300"))
        .await;

    assert_eq!(response.status, "500");
    assert_eq!(response.status_description, "Internal Server Error");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
    assert!(response.body_encoding.is_none());
}

#[tokio::test]
async fn test_missing_object_wins_over_incomplete_parameters() {
    // The original is fetched before the completeness check, so a missing
    // object is an error even when no transform would run
    let store = MockObjectStore::new();
    let fetches = store.fetch_counter();
    let handler = ImageHandler::new(store);

    let response = handler.handle(make_event("/ghost.png", "height=300")).await;

    assert_eq!(response.status, "500");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_store_returns_error_response() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/unreachable.jpg", "width=100&height=100"))
        .await;

    assert_eq!(response.status, "500");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
}

#[tokio::test]
async fn test_empty_object_returns_error_response() {
    let store = MockObjectStore::new().with_object("empty.png", vec![]);
    let handler = ImageHandler::new(store);

    let response = handler
        .handle(make_event("/empty.png", "width=100&height=100"))
        .await;

    assert_eq!(response.status, "500");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
}

#[tokio::test]
async fn test_corrupt_object_returns_error_response() {
    let store = MockObjectStore::new().with_object("broken.jpg", vec![0x00, 0x01, 0x02, 0x03]);
    let handler = ImageHandler::new(store);

    let response = handler
        .handle(make_event("/broken.jpg", "width=100&height=100"))
        .await;

    assert_eq!(response.status, "500");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
}

#[tokio::test]
async fn test_uri_without_extension_passes_through() {
    let store = MockObjectStore::new();
    let fetches = store.fetch_counter();
    let handler = ImageHandler::new(store);

    let response = handler
        .handle(make_event("/healthcheck", "width=300&height=300"))
        .await;

    assert_eq!(response.status, "204");
    assert_eq!(response.status_description, "Original Response");
    // An unusable URI short-circuits before any fetch
    assert_eq!(fetches.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Parameter Handling
// =============================================================================

#[tokio::test]
async fn test_unsupported_format_returns_error_response() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/pepe.jpg", "width=100&height=100&format=tiff"))
        .await;

    assert_eq!(response.status, "500");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
}

#[tokio::test]
async fn test_invalid_fit_returns_error_response() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/pepe.jpg", "width=100&height=100&type=stretch"))
        .await;

    assert_eq!(response.status, "500");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
}

#[tokio::test]
async fn test_out_of_range_quality_returns_error_response() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/pepe.jpg", "width=100&height=100&quality=300"))
        .await;

    assert_eq!(response.status, "500");
    assert_eq!(response.body.as_deref(), Some(ERROR_BODY));
}

#[tokio::test]
async fn test_zero_quality_uses_default() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/pepe.jpg", "width=100&height=100&quality=0"))
        .await;

    assert_eq!(response.status, "200");
}

#[tokio::test]
async fn test_default_format_is_webp() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/pepe.jpg", "width=100&height=100"))
        .await;

    assert_eq!(response.header("content-type"), Some("image/webp"));

    let bytes = decoded_body(&response.body.unwrap());
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WEBP");
}

#[tokio::test]
async fn test_content_type_echoes_requested_token() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event("/pepe.jpg", "width=100&height=100&format=jpg"))
        .await;

    // The subtype is the token as requested, not a canonical MIME name
    assert_eq!(response.header("content-type"), Some("image/jpg"));

    let bytes = decoded_body(&response.body.unwrap());
    assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_first_query_value_wins() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event(
            "/pepe.jpg",
            "width=300&width=999&height=200&format=png&type=fill",
        ))
        .await;

    assert_eq!(response.status, "200");
    let dims = decoded_dimensions(&response.body.unwrap());
    assert_eq!(dims, (300, 200));
}

#[tokio::test]
async fn test_percent_encoded_uri_resolves_object() {
    let store = MockObjectStore::new().with_object("café.jpg", create_test_jpeg(100, 100, 90));
    let handler = ImageHandler::new(store);

    let response = handler
        .handle(make_event("/caf%C3%A9.jpg", "width=50&height=50"))
        .await;

    assert_eq!(response.status, "200");
}

// =============================================================================
// Fit Geometry
// =============================================================================

#[tokio::test]
async fn test_fill_produces_exact_dimensions() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event(
            "/pepe.jpg",
            "width=300&height=300&type=fill&format=png",
        ))
        .await;

    assert_eq!(decoded_dimensions(&response.body.unwrap()), (300, 300));
}

#[tokio::test]
async fn test_cover_produces_exact_dimensions() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event(
            "/pepe.jpg",
            "width=300&height=300&type=cover&format=png",
        ))
        .await;

    assert_eq!(decoded_dimensions(&response.body.unwrap()), (300, 300));
}

#[tokio::test]
async fn test_contain_letterboxes_to_exact_dimensions() {
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event(
            "/pepe.jpg",
            "width=300&height=300&type=contain&format=png",
        ))
        .await;

    assert_eq!(decoded_dimensions(&response.body.unwrap()), (300, 300));
}

#[tokio::test]
async fn test_inside_fits_within_bounds() {
    // 640x480 into 300x300 preserving aspect ratio lands at 300x225
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event(
            "/pepe.jpg",
            "width=300&height=300&type=inside&format=png",
        ))
        .await;

    assert_eq!(decoded_dimensions(&response.body.unwrap()), (300, 225));
}

#[tokio::test]
async fn test_outside_covers_bounds() {
    // 640x480 into 300x300: height is the dominant axis, width follows
    let handler = handler_with_sample();
    let response = handler
        .handle(make_event(
            "/pepe.jpg",
            "width=300&height=300&type=outside&format=png",
        ))
        .await;

    let (width, height) = decoded_dimensions(&response.body.unwrap());
    assert_eq!(height, 300);
    assert!(width >= 300);
}

// =============================================================================
// Response Shape
// =============================================================================

#[tokio::test]
async fn test_success_replaces_conflicting_headers() {
    let handler = handler_with_sample();

    let mut event = make_event("/pepe.jpg", "width=100&height=100");
    let original = &mut event.records[0].cf.response;
    original.set_header("Content-Type", "application/octet-stream");
    original.set_header("X-Origin", "upstream-7");

    let response = handler.handle(event).await;

    assert_eq!(response.header("content-type"), Some("image/webp"));
    assert_eq!(response.header("x-origin"), Some("upstream-7"));
}

#[tokio::test]
async fn test_failure_leaves_original_headers() {
    let handler = handler_with_sample();

    let mut event = make_event("/ghost.jpg", "width=100&height=100");
    event.records[0]
        .cf
        .response
        .set_header("X-Origin", "upstream-7");

    let response = handler.handle(event).await;

    assert_eq!(response.status, "500");
    assert_eq!(response.header("x-origin"), Some("upstream-7"));
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    // WebP output is lossless, so the whole response is deterministic
    let handler = handler_with_sample();
    let query = "width=120&height=80&type=fill";

    let first = handler.handle(make_event("/pepe.jpg", query)).await;
    let second = handler.handle(make_event("/pepe.jpg", query)).await;

    assert_eq!(first, second);
}
