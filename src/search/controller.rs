//! Level-by-level search driver.
//!
//! The controller is an explicit state machine over [`SearchState`]. It starts
//! in `Searching` at the start level, runs one blind full-scene correlation,
//! then tracks the candidate down the pyramid through planned regions until it
//! escalates, loses the track, or runs out of levels.

use std::time::Duration;

use crate::geom::{Point, SearchRegion};
use crate::image::pyramid::image_at_level;
use crate::image::ImageView;
use crate::kernel::Kernel;
use crate::search::coords::to_full_resolution;
use crate::search::correlate::{best_match, MatchCandidate};
use crate::search::roi::plan_search_region;
use crate::search::{Match, SearchConfig};
use crate::trace::{trace_event, trace_span, SplitTimer};
use crate::util::PyrMatchResult;

/// Why a search ended without a match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LostReason {
    /// The continuation rule rejected the blind search. With the default
    /// config this is what happens whenever the start level is 0.
    Refused,
    /// A refinement score fell below the weak threshold.
    BelowWeak { score: f32 },
}

/// Search state; the last three variants are terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchState {
    /// No candidate yet; the next step is the blind search at `level`.
    Searching { level: usize },
    /// A candidate is being refined; its point is at `candidate.level`.
    Tracking { candidate: MatchCandidate },
    /// Strict threshold reached at `level`; `point` is full resolution.
    Escalated {
        point: Point,
        score: f32,
        level: usize,
    },
    /// The search gave up at `level`.
    Lost { level: usize, reason: LostReason },
    /// Level 0 was processed without escalating.
    Exhausted { candidate: MatchCandidate },
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Escalated { .. } | SearchState::Lost { .. } | SearchState::Exhausted { .. }
        )
    }
}

/// Diagnostics for one correlated level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelStep {
    pub level: usize,
    /// Region searched at this level; `None` for the blind search.
    pub region: Option<SearchRegion>,
    /// Best placement in level coordinates (region offset applied).
    pub candidate: MatchCandidate,
    pub elapsed: Duration,
}

/// Full record of one search call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub start_level: usize,
    pub state: SearchState,
    pub steps: Vec<LevelStep>,
    /// Final decision: the match in full-resolution coordinates, if accepted.
    pub matched: Option<Match>,
}

/// Decides whether a blind search may run at `level` while no candidate exists.
///
/// The search loop only consults this at the start level: the blind search
/// always yields a candidate, so the `start_level - 1` rule never fires there.
pub(crate) fn continuation_allows(level: usize, start_level: usize, search_level_zero: bool) -> bool {
    if level == start_level && (level != 0 || search_level_zero) {
        return true;
    }
    if start_level <= 2 {
        return false;
    }
    level + 1 == start_level
}

pub(crate) struct SearchController<'a, K: ?Sized> {
    kernel: &'a K,
    cfg: &'a SearchConfig,
    scene: ImageView<'a, u8>,
    tpl: ImageView<'a, u8>,
    start_level: usize,
    steps: Vec<LevelStep>,
    timer: SplitTimer,
}

impl<'a, K> SearchController<'a, K>
where
    K: Kernel + ?Sized,
{
    pub(crate) fn new(
        kernel: &'a K,
        cfg: &'a SearchConfig,
        scene: ImageView<'a, u8>,
        tpl: ImageView<'a, u8>,
        start_level: usize,
    ) -> Self {
        Self {
            kernel,
            cfg,
            scene,
            tpl,
            start_level,
            steps: Vec::with_capacity(start_level + 1),
            timer: SplitTimer::start(),
        }
    }

    pub(crate) fn run(mut self) -> PyrMatchResult<SearchOutcome> {
        let _span = trace_span!(
            "pyramid_search",
            start_level = self.start_level,
            method = self.cfg.method.name()
        )
        .entered();

        let mut state = SearchState::Searching {
            level: self.start_level,
        };
        for level in (0..=self.start_level).rev() {
            state = self.advance(state, level)?;
            if state.is_terminal() {
                break;
            }
        }
        if let SearchState::Tracking { candidate } = state {
            state = SearchState::Exhausted { candidate };
        }

        let matched = self.decide(&state);
        trace_event!(
            "search_result",
            found = matched.is_some(),
            x = matched.map_or(0, |m| m.x),
            y = matched.map_or(0, |m| m.y)
        );
        Ok(SearchOutcome {
            start_level: self.start_level,
            state,
            steps: self.steps,
            matched,
        })
    }

    fn advance(&mut self, state: SearchState, level: usize) -> PyrMatchResult<SearchState> {
        let _span = trace_span!("level", level = level).entered();
        match state {
            SearchState::Searching { .. } => self.blind_search(level),
            SearchState::Tracking { candidate } => self.refine(candidate, level),
            terminal => Ok(terminal),
        }
    }

    fn blind_search(&mut self, level: usize) -> PyrMatchResult<SearchState> {
        if !continuation_allows(level, self.start_level, self.cfg.search_level_zero) {
            trace_event!("search_refused", level = level, start_level = self.start_level);
            return Ok(SearchState::Lost {
                level,
                reason: LostReason::Refused,
            });
        }

        let scene = image_at_level(self.kernel, self.scene, level)?;
        let tpl = image_at_level(self.kernel, self.tpl, level)?;
        // Kept even below the weak threshold; only refinement can lose a track.
        let candidate = best_match(self.kernel, scene.view(), tpl.view(), self.cfg.method, level)?;
        self.record(level, None, candidate);
        trace_event!(
            "blind_search",
            level = level,
            x = candidate.point.x,
            y = candidate.point.y,
            score = candidate.score
        );
        Ok(SearchState::Tracking { candidate })
    }

    fn refine(&mut self, prev: MatchCandidate, level: usize) -> PyrMatchResult<SearchState> {
        let scene = image_at_level(self.kernel, self.scene, level)?;
        let tpl = image_at_level(self.kernel, self.tpl, level)?;
        let region = plan_search_region(
            prev.point,
            scene.width(),
            scene.height(),
            tpl.width(),
            tpl.height(),
        )?;
        let window = scene.view().region(&region)?;
        let local = best_match(self.kernel, window, tpl.view(), self.cfg.method, level)?;
        let candidate = MatchCandidate {
            point: local.point.offset_by(region.origin()),
            ..local
        };
        self.record(level, Some(region), candidate);

        if candidate.score < self.cfg.weak_threshold {
            trace_event!("track_lost", level = level, score = candidate.score);
            return Ok(SearchState::Lost {
                level,
                reason: LostReason::BelowWeak {
                    score: candidate.score,
                },
            });
        }
        if candidate.score >= self.cfg.strict_threshold {
            let point = to_full_resolution(candidate.point, level);
            trace_event!(
                "escalated",
                level = level,
                x = point.x,
                y = point.y,
                score = candidate.score
            );
            return Ok(SearchState::Escalated {
                point,
                score: candidate.score,
                level,
            });
        }
        Ok(SearchState::Tracking { candidate })
    }

    fn record(&mut self, level: usize, region: Option<SearchRegion>, candidate: MatchCandidate) {
        let elapsed = self.timer.split();
        trace_event!("level_done", level = level, micros = elapsed.as_micros() as u64);
        self.steps.push(LevelStep {
            level,
            region,
            candidate,
            elapsed,
        });
    }

    fn decide(&self, state: &SearchState) -> Option<Match> {
        match *state {
            SearchState::Escalated {
                point,
                score,
                level,
            } => Some(Match {
                x: point.x,
                y: point.y,
                score,
                level,
            }),
            SearchState::Exhausted { candidate } if candidate.score >= self.cfg.strict_threshold => {
                // Exhaustion only happens after level 0, which is full resolution.
                debug_assert_eq!(candidate.level, 0);
                Some(Match {
                    x: candidate.point.x,
                    y: candidate.point.y,
                    score: candidate.score,
                    level: candidate.level,
                })
            }
            _ => None,
        }
    }
}
