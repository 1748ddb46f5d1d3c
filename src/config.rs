//! Configuration management for the edge resizer.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `RESIZER_` prefix
//! - Sensible defaults for all settings
//!
//! # Example
//!
//! ```ignore
//! use edge_resizer::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("S3 bucket: {}", config.bucket);
//! println!("Cache max-age: {}s", config.cache_max_age);
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables with the `RESIZER_` prefix:
//!
//! - `RESIZER_BUCKET` - S3 bucket holding the original images (default: resource-hyub)
//! - `RESIZER_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `RESIZER_S3_REGION` - AWS region (default: ap-northeast-2)
//! - `RESIZER_CACHE_MAX_AGE` - Cache-Control max-age seconds (default: 31536000)

use clap::Parser;

// =============================================================================
// Default Values
// =============================================================================

/// Default S3 bucket holding the original images.
pub const DEFAULT_BUCKET: &str = "resource-hyub";

/// Default AWS region.
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Default Cache-Control max-age in seconds (1 year).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 31_536_000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Edge Resizer - on-demand image resizing for origin responses.
///
/// Intercepts origin responses at the CDN edge, fetches the original image
/// from S3, and replaces the response body with a resized, re-encoded
/// rendition described by the request's query parameters.
#[derive(Parser, Debug, Clone)]
#[command(name = "edge-resizer")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // S3 Configuration
    // =========================================================================
    /// S3 bucket name containing the original images.
    #[arg(long, default_value = DEFAULT_BUCKET, env = "RESIZER_BUCKET")]
    pub bucket: String,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    ///
    /// If not specified, uses the default AWS S3 endpoint.
    #[arg(long, env = "RESIZER_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "RESIZER_S3_REGION")]
    pub s3_region: String,

    // =========================================================================
    // Response Configuration
    // =========================================================================
    /// Cache-Control max-age in seconds for transformed responses.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "RESIZER_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        // Validate bucket is not empty
        if self.bucket.is_empty() {
            return Err("S3 bucket name is required. Set --bucket or RESIZER_BUCKET".to_string());
        }

        // Validate region is not empty
        if self.s3_region.is_empty() {
            return Err("S3 region is required. Set --s3-region or RESIZER_S3_REGION".to_string());
        }

        // Validate cache max-age
        if self.cache_max_age == 0 {
            return Err("cache_max_age must be greater than 0".to_string());
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
