use thiserror::Error;

/// Errors that can occur while interpreting the requested URI and query.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// URI contains percent-escapes that do not decode to valid UTF-8
    #[error("Invalid URI encoding: {uri}")]
    InvalidEncoding {
        /// The raw URI as received
        uri: String,
    },

    /// URI path carries no file extension to derive an object key from
    #[error("No file extension in URI: {uri}")]
    MissingExtension {
        /// The raw URI as received
        uri: String,
    },
}

/// Errors that can occur while fetching an original image from the store.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    /// Object does not exist in the bucket
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Error reported by the storage service
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network or connection error while streaming the object body
    #[error("Connection error: {0}")]
    Connection(String),

    /// Object exists but its payload is empty
    #[error("Object has an empty body: {0}")]
    EmptyBody(String),
}

/// Errors that can occur while decoding, resizing, or re-encoding an image.
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    /// Source bytes are not a decodable image
    #[error("Failed to decode source image: {message}")]
    Decode {
        /// Details of the decode failure
        message: String,
    },

    /// Requested fit policy is not one of the supported policies
    #[error("Invalid fit policy: {fit}")]
    InvalidFit {
        /// The rejected fit value
        fit: String,
    },

    /// Requested quality is outside the valid range
    #[error("Invalid quality: {quality} (must be between 1 and 100)")]
    InvalidQuality {
        /// The rejected quality value
        quality: u32,
    },

    /// Requested output format does not name a supported encoder
    #[error("Unsupported output format: {format}")]
    UnsupportedFormat {
        /// The rejected format value
        format: String,
    },

    /// Encoder failed to produce output
    #[error("Failed to encode image: {message}")]
    Encode {
        /// Details of the encode failure
        message: String,
    },
}

/// Errors from the full fetch-and-transform pipeline.
///
/// Any variant maps to the error response outcome; the distinction only
/// matters for logging.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Fetching the original image failed
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Transforming the image failed
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}
