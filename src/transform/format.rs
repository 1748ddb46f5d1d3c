use image::ImageFormat;

/// Output codecs supported by the transform engine.
///
/// Tokens match the `format` query parameter and are case-sensitive.
/// Anything else is rejected before decoding starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Avif,
}

impl OutputFormat {
    /// Parse a format token. Returns None for unsupported codecs.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            "avif" => Some(Self::Avif),
            _ => None,
        }
    }

    /// The image crate format identifier for this codec.
    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
            Self::Gif => ImageFormat::Gif,
            Self::Avif => ImageFormat::Avif,
        }
    }
}
