//! Image transformation layer.
//!
//! This module turns an original image into the requested rendition:
//! decode, resize under a fit policy, re-encode in the requested format.
//!
//! # Architecture
//!
//! The transform engine sits between the event handler and the image codecs:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             Event Handler               │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            Transform Engine             │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │   FitMode    │  │  OutputFormat   │  │
//! │  │  (geometry)  │  │   (encoders)    │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           image crate codecs            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TransformEngine`]: Decodes the source, applies the fit policy, encodes the output
//! - [`TransformPlan`]: Complete parameters for one transform
//! - [`FitMode`]: Geometric strategy for reconciling source and target dimensions
//! - [`OutputFormat`]: Supported output codecs
//!
//! Fit and format arrive as raw request tokens and are validated here, so a
//! typo in a query parameter surfaces as a transform error rather than a
//! parse failure.

mod engine;
mod fit;
mod format;

pub use engine::{is_valid_quality, TransformEngine, TransformPlan, MAX_QUALITY, MIN_QUALITY};
pub use fit::FitMode;
pub use format::OutputFormat;
