//! Error types for pyrmatch.

use thiserror::Error;

/// Result alias for pyrmatch operations.
pub type PyrMatchResult<T> = std::result::Result<T, PyrMatchError>;

/// Errors that can occur when building images or running a search.
///
/// "No match" is never an error; it is reported as `None` by the matcher.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PyrMatchError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region does not fit inside the image it is carved from.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template does not fit inside the searched region.
    #[error(
        "template {tpl_width}x{tpl_height} larger than search region {region_width}x{region_height}"
    )]
    TemplateLargerThanRegion {
        tpl_width: usize,
        tpl_height: usize,
        region_width: usize,
        region_height: usize,
    },
    /// An explicit pyramid level exceeds the supported maximum.
    #[error("pyramid level {level} out of range (max {max})")]
    LevelOutOfRange { level: usize, max: usize },
    /// A response surface has no samples.
    #[error("empty response surface")]
    EmptyResponse,
    /// Image decoding or file access failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
