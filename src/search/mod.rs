//! Coarse-to-fine template search.
//!
//! [`Matcher`] picks a start level, runs one blind correlation over the whole
//! scene at that level and then tracks the best placement down the pyramid,
//! searching only a small planned window at each finer level. A refinement at
//! or above the strict threshold is accepted immediately; one below the weak
//! threshold ends the search.

pub(crate) mod controller;
pub mod coords;
pub mod correlate;
pub mod level;
mod method;
pub mod roi;

pub use controller::{LevelStep, LostReason, SearchOutcome, SearchState};
pub use correlate::{best_match, MatchCandidate};
pub use level::{select_start_level, MAX_PYRAMID_LEVEL};
pub use method::MatchMethod;

use crate::geom::{Point, SearchRegion};
use crate::image::ImageView;
use crate::kernel::{CpuKernel, Kernel};
use crate::trace::trace_event;
use crate::util::{PyrMatchError, PyrMatchResult};
use controller::SearchController;

/// Default weak threshold, used by [`find_template`].
pub const DEFAULT_WEAK_THRESHOLD: f32 = 0.75;
/// Default strict threshold.
pub const DEFAULT_STRICT_THRESHOLD: f32 = 0.9;

/// How the coarsest pyramid level is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaxLevel {
    /// Derived from the scene and template sizes by [`select_start_level`].
    #[default]
    Auto,
    /// Explicit start level, at most [`MAX_PYRAMID_LEVEL`].
    Fixed(usize),
}

/// Search parameters. Fixed for the duration of one search call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Scoring method; scores are normalized so that higher is better.
    pub method: MatchMethod,
    /// Minimum refinement score to keep tracking a candidate.
    pub weak_threshold: f32,
    /// Minimum score to accept a match.
    ///
    /// Expected to be at least `weak_threshold`; this is not checked.
    pub strict_threshold: f32,
    pub max_level: MaxLevel,
    /// Allow the blind search when the start level is 0.
    ///
    /// Off by default: a start level of 0 then never matches.
    pub search_level_zero: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            method: MatchMethod::default(),
            weak_threshold: DEFAULT_WEAK_THRESHOLD,
            strict_threshold: DEFAULT_STRICT_THRESHOLD,
            max_level: MaxLevel::Auto,
            search_level_zero: false,
        }
    }
}

/// Accepted match in full-resolution scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Column of the template's top-left corner.
    pub x: usize,
    /// Row of the template's top-left corner.
    pub y: usize,
    /// Normalized score (higher is better).
    pub score: f32,
    /// Pyramid level at which the match was accepted.
    pub level: usize,
}

impl Match {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Coarse-to-fine template matcher.
///
/// Holds only configuration and a kernel; every call is independent, so a
/// matcher can be shared across threads when its kernel is `Sync`.
#[derive(Clone, Debug, Default)]
pub struct Matcher<K = CpuKernel> {
    kernel: K,
    cfg: SearchConfig,
}

impl Matcher<CpuKernel> {
    /// Creates a matcher with the CPU kernel and default config.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Kernel> Matcher<K> {
    /// Creates a matcher backed by a custom kernel.
    pub fn with_kernel(kernel: K) -> Self {
        Self {
            kernel,
            cfg: SearchConfig::default(),
        }
    }

    /// Replaces the search config.
    pub fn with_config(mut self, cfg: SearchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Resolves the start level for a scene/template pair.
    pub fn start_level(
        &self,
        scene: ImageView<'_, u8>,
        tpl: ImageView<'_, u8>,
    ) -> PyrMatchResult<usize> {
        match self.cfg.max_level {
            MaxLevel::Auto => Ok(select_start_level(
                scene.width(),
                scene.height(),
                tpl.width(),
                tpl.height(),
            )),
            MaxLevel::Fixed(level) if level <= MAX_PYRAMID_LEVEL => Ok(level),
            MaxLevel::Fixed(level) => Err(PyrMatchError::LevelOutOfRange {
                level,
                max: MAX_PYRAMID_LEVEL,
            }),
        }
    }

    /// Runs the search and returns the terminal state with per-level steps.
    pub fn search(
        &self,
        scene: ImageView<'_, u8>,
        tpl: ImageView<'_, u8>,
    ) -> PyrMatchResult<SearchOutcome> {
        let start_level = self.start_level(scene, tpl)?;
        trace_event!(
            "start_level",
            level = start_level,
            auto = self.cfg.max_level == MaxLevel::Auto
        );
        SearchController::new(&self.kernel, &self.cfg, scene, tpl, start_level).run()
    }

    /// Finds the template, reporting geometry and config problems as errors.
    pub fn try_find(
        &self,
        scene: ImageView<'_, u8>,
        tpl: ImageView<'_, u8>,
    ) -> PyrMatchResult<Option<Match>> {
        Ok(self.search(scene, tpl)?.matched)
    }

    /// Finds the template; any failure is reported as "not found".
    pub fn find(&self, scene: ImageView<'_, u8>, tpl: ImageView<'_, u8>) -> Option<Match> {
        self.try_find(scene, tpl).unwrap_or_else(|err| {
            trace_event!("search_failed", reason = err.to_string().as_str());
            None
        })
    }

    /// Like [`Matcher::try_find`], restricted to `region` of the scene.
    ///
    /// The returned match is in scene coordinates.
    pub fn try_find_in_region(
        &self,
        scene: ImageView<'_, u8>,
        region: SearchRegion,
        tpl: ImageView<'_, u8>,
    ) -> PyrMatchResult<Option<Match>> {
        let window = scene.region(&region)?;
        Ok(self.try_find(window, tpl)?.map(|m| Match {
            x: m.x + region.x,
            y: m.y + region.y,
            ..m
        }))
    }

    /// Like [`Matcher::find`], restricted to `region` of the scene.
    pub fn find_in_region(
        &self,
        scene: ImageView<'_, u8>,
        region: SearchRegion,
        tpl: ImageView<'_, u8>,
    ) -> Option<Match> {
        self.try_find_in_region(scene, region, tpl)
            .unwrap_or_else(|err| {
                trace_event!("search_failed", reason = err.to_string().as_str());
                None
            })
    }
}

/// Finds `tpl` in `scene` with the default method, automatic levels, a weak
/// threshold of 0.75 and `threshold` as the strict threshold.
pub fn find_template(
    scene: ImageView<'_, u8>,
    tpl: ImageView<'_, u8>,
    threshold: f32,
) -> Option<Match> {
    Matcher::new()
        .with_config(SearchConfig {
            strict_threshold: threshold,
            ..SearchConfig::default()
        })
        .find(scene, tpl)
}
