//! Origin-response event handling.
//!
//! This module glues the layers together: interpret the request, fetch the
//! original image, transform it, and rewrite the origin response.
//!
//! Every invocation ends in exactly one of four outcomes:
//!
//! - **Pass-through**: the URI is unusable or the transform parameters are
//!   incomplete; the origin response is returned untouched
//! - **Success**: a 200 response whose body is the base64-encoded rendition
//! - **Failure**: a 500 response with a fixed error body, when fetch or
//!   transform fails
//! - **Synthesized failure**: a fresh 500 response when the event carries
//!   no records to answer from
//!
//! The handler itself never fails; errors are folded into the response.

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_CACHE_MAX_AGE;
use crate::error::PipelineError;
use crate::event::{BodyEncoding, EdgeEvent, EdgeEventData, EdgeResponse};
use crate::request::ImageRequest;
use crate::store::ObjectStore;
use crate::transform::{TransformEngine, TransformPlan};

/// Fixed body for failure responses.
pub const ERROR_BODY: &str = "Error processing image";

/// Handles origin-response events for one configured bucket.
pub struct ImageHandler<S: ObjectStore> {
    /// Store holding the original images
    store: S,
    /// Transform engine, shared across invocations
    engine: TransformEngine,
    /// Cache-Control max-age for transformed responses, in seconds
    cache_max_age: u32,
}

impl<S: ObjectStore> ImageHandler<S> {
    /// Create a handler with the default cache max-age.
    pub fn new(store: S) -> Self {
        Self::with_cache_max_age(store, DEFAULT_CACHE_MAX_AGE)
    }

    /// Create a handler with a specific cache max-age.
    pub fn with_cache_max_age(store: S, cache_max_age: u32) -> Self {
        Self {
            store,
            engine: TransformEngine::new(),
            cache_max_age,
        }
    }

    /// Process one origin-response event.
    ///
    /// Always returns a response; see the module docs for the possible
    /// outcomes.
    pub async fn handle(&self, event: EdgeEvent) -> EdgeResponse {
        let Some(record) = event.records.into_iter().next() else {
            error!("Event carried no records");
            let mut response = EdgeResponse::new("500", "Internal Server Error");
            response.body = Some(ERROR_BODY.to_string());
            return response;
        };

        let EdgeEventData {
            request,
            mut response,
            ..
        } = record.cf;

        let image_request = match ImageRequest::from_parts(&request.uri, &request.querystring) {
            Ok(image_request) => image_request,
            Err(e) => {
                warn!(uri = %request.uri, error = %e, "Unusable image URI, passing response through");
                return response;
            }
        };

        match self.run_pipeline(&image_request).await {
            Ok(Some(body)) => {
                info!(
                    key = %image_request.key,
                    format = %image_request.spec.format,
                    bytes = body.len(),
                    "Transformed image"
                );
                self.apply_success(&mut response, &body, &image_request.spec.format);
            }
            Ok(None) => {
                debug!(
                    key = %image_request.key,
                    "Transform parameters incomplete, passing response through"
                );
            }
            Err(e) => {
                error!(key = %image_request.key, error = %e, "Image pipeline failed");
                apply_failure(&mut response);
            }
        }

        response
    }

    /// Fetch the original and, when the spec is complete, transform it.
    ///
    /// `Ok(None)` means the transform parameters were incomplete and the
    /// original response should pass through. The fetch happens first
    /// either way, so a missing original is reported even when no
    /// transform would run.
    async fn run_pipeline(&self, request: &ImageRequest) -> Result<Option<Bytes>, PipelineError> {
        let original = self.store.get_object(&request.key).await?;

        let Some((width, height)) = request.spec.dimensions() else {
            return Ok(None);
        };

        let plan = TransformPlan {
            width,
            height,
            quality: request.spec.quality,
            fit: request.spec.fit.clone(),
            format: request.spec.format.clone(),
        };

        let body = self.engine.transform(&original, &plan)?;
        Ok(Some(body))
    }

    /// Rewrite the response into a success carrying the rendition.
    ///
    /// The Content-Type subtype echoes the requested format token.
    fn apply_success(&self, response: &mut EdgeResponse, body: &Bytes, format: &str) {
        response.status = "200".to_string();
        response.status_description = "OK".to_string();
        response.body = Some(general_purpose::STANDARD.encode(body));
        response.body_encoding = Some(BodyEncoding::Base64);
        response.set_header("Content-Type", format!("image/{}", format));
        response.set_header("Cache-Control", format!("max-age={}", self.cache_max_age));
    }
}

/// Rewrite the response into the fixed failure shape. Headers are left as
/// the origin sent them.
fn apply_failure(response: &mut EdgeResponse) {
    response.status = "500".to_string();
    response.status_description = "Internal Server Error".to_string();
    response.body = Some(ERROR_BODY.to_string());
    response.body_encoding = None;
}

// =============================================================================
// Tests
// =============================================================================
