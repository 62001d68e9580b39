//! Loading scenes and templates through the `image` crate (`image-io` feature).
//!
//! Every decoded image is reduced to 8-bit luma before it reaches the matcher.

use crate::image::{ImageView, OwnedImage};
use crate::util::{PyrMatchError, PyrMatchResult};
use std::path::Path;

/// Borrows the pixels of a luma buffer without copying.
pub fn gray_view(img: &image::GrayImage) -> PyrMatchResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts any decoded image to a grayscale [`OwnedImage`].
pub fn to_gray_owned(img: image::DynamicImage) -> PyrMatchResult<OwnedImage> {
    let gray = img.into_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Decodes the file at `path` and converts it to grayscale.
///
/// Decoding failures are reported as [`PyrMatchError::ImageIo`] with the path
/// in the message.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> PyrMatchResult<OwnedImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| PyrMatchError::ImageIo {
        reason: format!("{}: {err}", path.display()),
    })?;
    to_gray_owned(img)
}
