//! # Edge Resizer
//!
//! An on-demand image resizer that runs as an origin-response function at
//! the CDN edge.
//!
//! When a viewer requests an image with transform parameters in the query
//! string, this library fetches the original from S3, resizes and
//! re-encodes it, and replaces the origin response body with the rendition.
//! Requests without complete parameters pass the origin response through
//! untouched, so the same path keeps serving originals.
//!
//! ## Features
//!
//! - **Query-driven renditions**: width, height, fit policy, output format,
//!   and quality come straight from the request
//! - **Format support**: encodes JPEG, PNG, WebP, GIF, and AVIF from any
//!   decodable original
//! - **Fit policies**: cover, contain (letterboxed), fill, inside, outside
//! - **Total handling**: every event produces a response; failures become a
//!   fixed 500 payload instead of a thrown error
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`event`] - Origin-response event envelope types
//! - [`request`] - URI and query string interpretation
//! - [`store`] - Object store trait and S3 implementation
//! - [`transform`] - Decode, resize, and encode engine
//! - [`handler`] - Event orchestration
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use edge_resizer::{create_s3_client, ImageHandler, S3ObjectStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     // The client and handler are built once and reused across
//!     // invocations
//!     let client = create_s3_client(None, "ap-northeast-2").await;
//!     let store = S3ObjectStore::new(client, "resource-hyub".to_string());
//!     let handler = ImageHandler::new(store);
//!
//!     // Deserialize an EdgeEvent from the platform and answer it
//!     let event = edge_resizer::EdgeEvent { records: vec![] };
//!     let response = handler.handle(event).await;
//!     println!("status: {}", response.status);
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod request;
pub mod store;
pub mod transform;

// Re-export commonly used types
pub use config::{Config, DEFAULT_BUCKET, DEFAULT_CACHE_MAX_AGE, DEFAULT_REGION};
pub use error::{PipelineError, RequestError, RetrievalError, TransformError};
pub use event::{
    BodyEncoding, DistributionConfig, EdgeEvent, EdgeEventData, EdgeRecord, EdgeRequest,
    EdgeResponse, HeaderEntry, Headers,
};
pub use handler::{ImageHandler, ERROR_BODY};
pub use request::{ImageRequest, TransformSpec, DEFAULT_FIT, DEFAULT_FORMAT, DEFAULT_QUALITY};
pub use store::{create_s3_client, ObjectStore, S3ObjectStore};
pub use transform::{
    is_valid_quality, FitMode, OutputFormat, TransformEngine, TransformPlan, MAX_QUALITY,
    MIN_QUALITY,
};
