use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

/// Resampling filter used for all resize operations.
const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Geometric strategy for fitting a source image into a target width and height.
///
/// Tokens match the `type` query parameter and are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Fill both dimensions exactly, cropping whatever overflows
    Cover,
    /// Fit within both dimensions, letterboxed on a black canvas to the
    /// exact target size
    Contain,
    /// Stretch to the exact dimensions, ignoring aspect ratio
    Fill,
    /// Largest rendition that fits within both dimensions, no padding
    Inside,
    /// Smallest rendition that covers both dimensions, no cropping
    Outside,
}

impl FitMode {
    /// Parse a fit token. Returns None for unrecognized values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cover" => Some(Self::Cover),
            "contain" => Some(Self::Contain),
            "fill" => Some(Self::Fill),
            "inside" => Some(Self::Inside),
            "outside" => Some(Self::Outside),
            _ => None,
        }
    }

    /// Resize `image` to the target dimensions under this policy.
    pub fn apply(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        match self {
            Self::Cover => image.resize_to_fill(width, height, RESIZE_FILTER),
            Self::Contain => letterbox(image, width, height),
            Self::Fill => image.resize_exact(width, height, RESIZE_FILTER),
            Self::Inside => image.resize(width, height, RESIZE_FILTER),
            Self::Outside => scale_to_cover(image, width, height),
        }
    }
}

/// Scale to fit within the bounds, then center the result on an opaque black
/// canvas of exactly the target size.
fn letterbox(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let scaled = image.resize(width, height, RESIZE_FILTER);

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let x = (width - scaled.width()) / 2;
    let y = (height - scaled.height()) / 2;
    imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));

    DynamicImage::ImageRgba8(canvas)
}

/// Scale preserving aspect ratio so both output dimensions meet or exceed
/// the bounds. The dominant axis lands exactly on its target.
fn scale_to_cover(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let src_width = image.width();
    let src_height = image.height();

    let width_ratio = f64::from(width) / f64::from(src_width);
    let height_ratio = f64::from(height) / f64::from(src_height);

    if width_ratio >= height_ratio {
        let out_height = ((f64::from(src_height) * width_ratio).round() as u32).max(height);
        image.resize_exact(width, out_height, RESIZE_FILTER)
    } else {
        let out_width = ((f64::from(src_width) * height_ratio).round() as u32).max(width);
        image.resize_exact(out_width, height, RESIZE_FILTER)
    }
}
