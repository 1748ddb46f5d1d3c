//! Request interpretation.
//!
//! Turns the viewer request's URI and query string into an [`ImageRequest`]:
//! the object key of the original image plus a [`TransformSpec`] describing
//! the rendition to produce.
//!
//! Query parsing is deliberately lenient. Malformed numeric values fall back
//! to "absent" (dimensions) or to the default (quality) instead of failing
//! the request; only the URI itself can make interpretation fail, which the
//! handler treats as a pass-through. Fit and format values are carried as
//! received and validated by the transform engine.

use url::form_urlencoded;

use crate::error::RequestError;

// =============================================================================
// Defaults
// =============================================================================

/// Default encode quality when the parameter is absent or unusable.
pub const DEFAULT_QUALITY: u32 = 75;

/// Default fit policy.
pub const DEFAULT_FIT: &str = "contain";

/// Default output format.
pub const DEFAULT_FORMAT: &str = "webp";

// =============================================================================
// Transform Spec
// =============================================================================

/// The rendition requested through query parameters.
///
/// `width` and `height` are `None` unless the query carried a usable
/// positive integer; the transform only runs when both are present.
/// `fit` and `format` hold the raw requested tokens, defaulted when absent
/// or empty, and are validated downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    /// Target width in pixels
    pub width: Option<u32>,
    /// Target height in pixels
    pub height: Option<u32>,
    /// Encode quality (1-100 expected; out-of-range values are rejected downstream)
    pub quality: u32,
    /// Fit policy token from the `type` parameter
    pub fit: String,
    /// Output format token from the `format` parameter
    pub format: String,
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: DEFAULT_QUALITY,
            fit: DEFAULT_FIT.to_string(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl TransformSpec {
    /// Parse a query string into a spec.
    ///
    /// Accepts the string with or without a leading `?`. Unknown parameters
    /// are ignored, and when a parameter repeats the first occurrence wins.
    pub fn from_querystring(querystring: &str) -> Self {
        let query = querystring.trim_start_matches('?');

        let mut width: Option<String> = None;
        let mut height: Option<String> = None;
        let mut quality: Option<String> = None;
        let mut fit: Option<String> = None;
        let mut format: Option<String> = None;

        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match name.as_ref() {
                "width" => &mut width,
                "height" => &mut height,
                "quality" => &mut quality,
                "type" => &mut fit,
                "format" => &mut format,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Self {
            width: width.as_deref().and_then(parse_dimension),
            height: height.as_deref().and_then(parse_dimension),
            quality: quality.as_deref().map(parse_quality).unwrap_or(DEFAULT_QUALITY),
            fit: fit
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_FIT.to_string()),
            format: format
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        }
    }

    /// Both target dimensions, when the spec is complete.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some((width, height)),
            _ => None,
        }
    }

    /// Whether the spec carries enough information to run a transform.
    pub fn is_complete(&self) -> bool {
        self.dimensions().is_some()
    }
}

/// Parse a dimension value. Only positive integers are usable.
fn parse_dimension(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Parse a quality value.
///
/// Unparseable values and zero fall back to the default. Parseable values
/// outside 1-100 are kept as-is so the engine can reject them.
fn parse_quality(value: &str) -> u32 {
    match value.trim().parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_QUALITY,
        Ok(quality) => quality,
    }
}

// =============================================================================
// Image Request
// =============================================================================

/// A fully interpreted request: which object to fetch and how to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Object key of the original image in the bucket
    pub key: String,
    /// Requested rendition
    pub spec: TransformSpec,
}

impl ImageRequest {
    /// Interpret a request URI and query string.
    ///
    /// The URI is percent-decoded, stripped of at most one leading `/`, and
    /// must end in a file extension; the remainder becomes the object key.
    ///
    /// # Errors
    ///
    /// Returns `RequestError` when the URI does not percent-decode to valid
    /// UTF-8 or carries no file extension.
    pub fn from_parts(uri: &str, querystring: &str) -> Result<Self, RequestError> {
        let decoded = urlencoding::decode(uri).map_err(|_| RequestError::InvalidEncoding {
            uri: uri.to_string(),
        })?;

        let key = object_key(&decoded)?;
        let spec = TransformSpec::from_querystring(querystring);

        Ok(Self { key, spec })
    }
}

/// Derive the object key from a decoded URI path.
///
/// The split happens at the last `.`, so dotted directory names stay part
/// of the key.
fn object_key(path: &str) -> Result<String, RequestError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);

    match trimmed.rsplit_once('.') {
        Some((name, extension)) if !extension.is_empty() => Ok(format!("{}.{}", name, extension)),
        _ => Err(RequestError::MissingExtension {
            uri: path.to_string(),
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
