//! PyrMatch is a CPU template matcher that searches an image pyramid
//! coarse-to-fine.
//!
//! A blind correlation runs once over the whole scene at a coarse level; the
//! best placement is then refined level by level inside small planned search
//! regions until its score clears a strict threshold, drops below a weak one,
//! or full resolution is reached. Scoring follows the six classic
//! correlation/difference methods, normalized so that higher is always better.
//!
//! Optional features: `rayon` (row-parallel correlation), `simd` (vectorized
//! window sums), `image-io` (loading via the `image` crate) and `tracing`
//! (spans and events for each search and level).

pub mod geom;
pub mod image;
pub mod kernel;
pub mod search;
mod trace;
pub mod util;

pub use geom::{Point, SearchRegion};
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::pyramid::ImagePyramid;
pub use crate::image::{ImageView, OwnedImage};
pub use kernel::{CpuKernel, Extremes, Kernel, ResponseMap};
pub use search::coords::to_full_resolution;
pub use search::roi::plan_search_region;
pub use search::{
    best_match, find_template, select_start_level, LevelStep, LostReason, Match,
    MatchCandidate, MatchMethod, Matcher, MaxLevel, SearchConfig, SearchOutcome, SearchState,
    MAX_PYRAMID_LEVEL,
};
pub use util::{PyrMatchError, PyrMatchResult};
