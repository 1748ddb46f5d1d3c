//! Test utilities for integration tests.
//!
//! This module provides an in-memory object store, event builders shaped
//! like the platform's wire format, and image fixture helpers.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use edge_resizer::error::RetrievalError;
use edge_resizer::event::{
    EdgeEvent, EdgeEventData, EdgeRecord, EdgeRequest, EdgeResponse, HeaderEntry, Headers,
};
use edge_resizer::store::ObjectStore;

// =============================================================================
// Mock Object Store with Fetch Tracking
// =============================================================================

/// An in-memory object store that tracks how many fetches were made.
///
/// Keys containing "unreachable" simulate a connection failure, and objects
/// stored with an empty payload surface the empty-body error.
pub struct MockObjectStore {
    objects: HashMap<String, Bytes>,
    fetch_count: Arc<AtomicUsize>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_object(mut self, key: impl Into<String>, data: Vec<u8>) -> Self {
        self.objects.insert(key.into(), Bytes::from(data));
        self
    }

    /// Handle to the fetch counter, usable after the store moves into a
    /// handler.
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetch_count)
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get_object(&self, key: &str) -> Result<Bytes, RetrievalError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if key.contains("unreachable") {
            return Err(RetrievalError::Connection("connection refused".to_string()));
        }

        match self.objects.get(key) {
            Some(data) if data.is_empty() => Err(RetrievalError::EmptyBody(key.to_string())),
            Some(data) => Ok(data.clone()),
            None => Err(RetrievalError::NotFound(key.to_string())),
        }
    }
}

// =============================================================================
// Event Builders
// =============================================================================

/// Build an origin-response event the way the platform delivers it: the
/// viewer request alongside an untouched origin response.
pub fn make_event(uri: &str, querystring: &str) -> EdgeEvent {
    let mut request_headers = Headers::new();
    request_headers.insert(
        "host".to_string(),
        vec![HeaderEntry {
            key: Some("Host".to_string()),
            value: "d123.cloudfront.net".to_string(),
        }],
    );

    EdgeEvent {
        records: vec![EdgeRecord {
            cf: EdgeEventData {
                config: Default::default(),
                request: EdgeRequest {
                    client_ip: "2001:cdba::3257:9652".to_string(),
                    headers: request_headers,
                    method: "GET".to_string(),
                    querystring: querystring.to_string(),
                    uri: uri.to_string(),
                },
                response: EdgeResponse::new("204", "Original Response"),
            },
        }],
    }
}

// =============================================================================
// Image Fixtures
// =============================================================================

/// Create a test JPEG image with a simple gradient pattern.
pub fn create_test_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x % 256) as u8;
        let g = (y % 256) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    });

    let mut buf = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode_image(&DynamicImage::ImageRgb8(img))
        .unwrap();
    buf.into_inner()
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Decode a base64 success body into raw bytes.
pub fn decoded_body(body: &str) -> Vec<u8> {
    general_purpose::STANDARD
        .decode(body)
        .expect("body is valid base64")
}

/// Decode a base64 success body and return the rendition's dimensions.
///
/// Only usable for output formats the image crate can also decode
/// (not AVIF).
pub fn decoded_dimensions(body: &str) -> (u32, u32) {
    let bytes = decoded_body(body);
    let img = image::load_from_memory(&bytes).expect("body decodes as an image");
    (img.width(), img.height())
}
