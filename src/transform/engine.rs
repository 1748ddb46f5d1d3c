//! Transform engine.
//!
//! Runs a single decode, resize, encode pass over an in-memory image.
//! Validation of the fit, format, and quality tokens happens here rather
//! than at parse time, so every rejection takes the same error path as a
//! codec failure.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, Limits};

use super::{FitMode, OutputFormat};
use crate::error::TransformError;

/// Minimum allowed encode quality.
pub const MIN_QUALITY: u32 = 1;

/// Maximum allowed encode quality.
pub const MAX_QUALITY: u32 = 100;

/// Decoder allocation cap. Originals larger than this are treated as
/// undecodable rather than risking the function's memory limit.
const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// AVIF encoder speed, 1 (slowest, densest) to 10 (fastest). Edge
/// invocations are latency-bound, so encoding leans fast.
const AVIF_SPEED: u8 = 8;

/// Complete parameters for one transform.
///
/// Unlike [`TransformSpec`](crate::request::TransformSpec), both dimensions
/// are always present; the handler only builds a plan once the spec is
/// complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformPlan {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Encode quality (validated here, 1-100)
    pub quality: u32,
    /// Fit policy token (validated here)
    pub fit: String,
    /// Output format token (validated here)
    pub format: String,
}

/// Image transform engine.
///
/// Currently stateless, but kept as a struct for future options
/// (e.g. resample filter selection, encoder tuning).
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {}

impl TransformEngine {
    /// Create a new transform engine.
    pub fn new() -> Self {
        Self {}
    }

    /// Transform `source` into the rendition described by `plan`.
    ///
    /// # Arguments
    /// * `source` - Raw bytes of the original image, any decodable format
    /// * `plan` - Target dimensions, fit policy, output format, and quality
    ///
    /// # Errors
    /// Returns `TransformError` when the plan carries an invalid quality,
    /// fit, or format token, when the source does not decode, or when
    /// encoding fails.
    pub fn transform(&self, source: &[u8], plan: &TransformPlan) -> Result<Bytes, TransformError> {
        if !is_valid_quality(plan.quality) {
            return Err(TransformError::InvalidQuality {
                quality: plan.quality,
            });
        }

        let fit = FitMode::parse(&plan.fit).ok_or_else(|| TransformError::InvalidFit {
            fit: plan.fit.clone(),
        })?;

        let format =
            OutputFormat::parse(&plan.format).ok_or_else(|| TransformError::UnsupportedFormat {
                format: plan.format.clone(),
            })?;

        let image = self.decode(source)?;
        let resized = fit.apply(&image, plan.width, plan.height);
        self.encode(&resized, format, plan.quality as u8)
    }

    /// Decode source bytes, sniffing the format from magic bytes.
    fn decode(&self, source: &[u8]) -> Result<DynamicImage, TransformError> {
        let mut reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode {
                message: e.to_string(),
            })?;

        let mut limits = Limits::default();
        limits.max_alloc = Some(MAX_DECODE_ALLOC);
        reader.limits(limits);

        reader.decode().map_err(|e| TransformError::Decode {
            message: e.to_string(),
        })
    }

    /// Encode the resized image in the requested format.
    ///
    /// Quality only reaches the lossy encoders; PNG, GIF, and the image
    /// crate's lossless WebP ignore it.
    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Bytes, TransformError> {
        let mut output = Cursor::new(Vec::new());

        match format {
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);
                encoder
                    .encode_image(&rgb)
                    .map_err(|e| TransformError::Encode {
                        message: e.to_string(),
                    })?;
            }
            OutputFormat::Avif => {
                let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
                let encoder = AvifEncoder::new_with_speed_quality(&mut output, AVIF_SPEED, quality);
                rgba.write_with_encoder(encoder)
                    .map_err(|e| TransformError::Encode {
                        message: e.to_string(),
                    })?;
            }
            OutputFormat::WebP | OutputFormat::Gif => {
                // These encoders only accept 8-bit RGB(A) buffers
                let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
                rgba.write_to(&mut output, format.image_format())
                    .map_err(|e| TransformError::Encode {
                        message: e.to_string(),
                    })?;
            }
            OutputFormat::Png => {
                image
                    .write_to(&mut output, format.image_format())
                    .map_err(|e| TransformError::Encode {
                        message: e.to_string(),
                    })?;
            }
        }

        Ok(Bytes::from(output.into_inner()))
    }
}

/// Check if a quality value is within the valid range.
#[inline]
pub fn is_valid_quality(quality: u32) -> bool {
    quality >= MIN_QUALITY && quality <= MAX_QUALITY
}

// =============================================================================
// Tests
// =============================================================================
