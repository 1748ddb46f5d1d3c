//! Origin-response event envelope.
//!
//! Types mirroring the JSON the CDN edge platform delivers to an
//! origin-response function: a list of records, each carrying the viewer
//! request and the origin's response. The handler answers with an
//! [`EdgeResponse`], either the origin's response passed through untouched
//! or a replacement carrying a transformed image body.
//!
//! Field names follow the platform wire format (`Records`, `clientIp`,
//! `statusDescription`, `bodyEncoding`), and header maps keep the
//! platform's shape: lowercase lookup keys mapping to entry lists that
//! remember the canonical header casing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header map in the platform's wire shape.
///
/// Keys are lowercased header names; each value is a list of entries so a
/// header can appear multiple times.
pub type Headers = HashMap<String, Vec<HeaderEntry>>;

/// A single header occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Canonically-cased header name (e.g. `Content-Type`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Header value
    pub value: String,
}

/// Top-level event delivered by the edge platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEvent {
    /// Event records; origin-response events carry exactly one
    #[serde(rename = "Records", default)]
    pub records: Vec<EdgeRecord>,
}

/// One record of an edge event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// The CDN payload for this record
    pub cf: EdgeEventData,
}

/// The CDN payload: distribution metadata, viewer request, origin response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEventData {
    /// Distribution metadata (absent in some test harnesses)
    #[serde(default)]
    pub config: DistributionConfig,
    /// The viewer request that reached the origin
    pub request: EdgeRequest,
    /// The response the origin produced
    pub response: EdgeResponse,
}

/// Metadata about the distribution and triggering event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionConfig {
    #[serde(default)]
    pub distribution_domain_name: String,
    #[serde(default)]
    pub distribution_id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub request_id: String,
}

/// The viewer request as forwarded to the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRequest {
    /// IP address of the requesting client
    #[serde(default)]
    pub client_ip: String,
    /// Request headers
    #[serde(default)]
    pub headers: Headers,
    /// HTTP method
    #[serde(default)]
    pub method: String,
    /// Raw query string, without the leading `?`
    #[serde(default)]
    pub querystring: String,
    /// Request path, e.g. `/pepe.jpg`
    pub uri: String,
}

/// Encoding of the `body` field of a response.
///
/// The platform also accepts plain text bodies by omitting the field;
/// this handler only ever emits base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Base64,
}

/// The response handed back to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponse {
    /// HTTP status code as a string, per the wire format
    pub status: String,
    /// Human-readable status line
    #[serde(default)]
    pub status_description: String,
    /// Response headers
    #[serde(default)]
    pub headers: Headers,
    /// Replacement body, if the handler sets one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// How `body` is encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_encoding: Option<BodyEncoding>,
}

impl EdgeResponse {
    /// Create a response with no headers and no body.
    pub fn new(status: impl Into<String>, status_description: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            status_description: status_description.into(),
            headers: Headers::new(),
            body: None,
            body_encoding: None,
        }
    }

    /// Set a header, replacing any existing entries for it.
    ///
    /// The lookup key is the lowercased name; the entry keeps the
    /// canonical casing as given.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(
            name.to_ascii_lowercase(),
            vec![HeaderEntry {
                key: Some(name.to_string()),
                value: value.into(),
            }],
        );
    }

    /// Look up the first value of a header by its lowercased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|entries| entries.first())
            .map(|entry| entry.value.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
