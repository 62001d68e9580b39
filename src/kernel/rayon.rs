//! Rayon-parallel correlation (feature-gated).
//!
//! Rows of the response surface are independent, so they are filled on the
//! rayon pool with the same per-row routine as the sequential kernel. The
//! output is bit-identical to [`CpuKernel`](crate::kernel::CpuKernel) with
//! `parallel: false`.

use crate::image::ImageView;
use crate::kernel::scalar::{fill_row, TemplateStats};
use crate::kernel::{response_size, ResponseMap};
use crate::search::MatchMethod;
use crate::util::PyrMatchResult;
use rayon::prelude::*;

/// Row-parallel dense correlation of `tpl` over `image`.
pub fn correlate_par(
    image: ImageView<'_, u8>,
    tpl: ImageView<'_, u8>,
    method: MatchMethod,
) -> PyrMatchResult<ResponseMap> {
    let (resp_width, resp_height) = response_size(image, tpl)?;
    let stats = TemplateStats::from_view(tpl)?;
    let mut data = vec![0.0f32; resp_width * resp_height];
    data.par_chunks_mut(resp_width)
        .enumerate()
        .for_each(|(y, row)| fill_row(image, &stats, method, y, row));
    ResponseMap::new(data, resp_width, resp_height)
}
