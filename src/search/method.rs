//! Scoring methods and their sign convention.

use crate::geom::Point;
use crate::kernel::Extremes;

/// Closed set of template-matching scores.
///
/// The raw response of the squared-difference methods is "lower is better";
/// all other methods are "higher is better". [`MatchMethod::score_from_extremes`]
/// folds both into a single "higher is better" score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchMethod {
    /// `sum (T - I)^2`
    SumSquaredDifference,
    /// `sum (T - I)^2 / sqrt(sum T^2 * sum I^2)`
    SumSquaredDifferenceNormalized,
    /// `sum T * I`
    CrossCorrelation,
    /// `sum T * I / sqrt(sum T^2 * sum I^2)`
    CrossCorrelationNormalized,
    /// `sum T' * I'` with both sides made zero-mean.
    CorrelationCoefficient,
    /// Zero-mean normalized cross-correlation, in `[-1, 1]`.
    #[default]
    CorrelationCoefficientNormalized,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 6] = [
        MatchMethod::SumSquaredDifference,
        MatchMethod::SumSquaredDifferenceNormalized,
        MatchMethod::CrossCorrelation,
        MatchMethod::CrossCorrelationNormalized,
        MatchMethod::CorrelationCoefficient,
        MatchMethod::CorrelationCoefficientNormalized,
    ];

    /// Returns true if a smaller raw response means a better match.
    pub fn is_lower_better(self) -> bool {
        matches!(
            self,
            MatchMethod::SumSquaredDifference | MatchMethod::SumSquaredDifferenceNormalized
        )
    }

    /// Returns true if the raw response is divided by the window energy.
    pub fn is_normalized(self) -> bool {
        matches!(
            self,
            MatchMethod::SumSquaredDifferenceNormalized
                | MatchMethod::CrossCorrelationNormalized
                | MatchMethod::CorrelationCoefficientNormalized
        )
    }

    /// Returns true if both template and window are made zero-mean.
    pub(crate) fn is_mean_centered(self) -> bool {
        matches!(
            self,
            MatchMethod::CorrelationCoefficient | MatchMethod::CorrelationCoefficientNormalized
        )
    }

    /// Maps a raw response value to a "higher is better" score.
    pub fn normalize_score(self, raw: f32) -> f32 {
        if self.is_lower_better() {
            -raw
        } else {
            raw
        }
    }

    /// Picks the best location from response extremes and its normalized score.
    pub fn score_from_extremes(self, extremes: &Extremes) -> (Point, f32) {
        if self.is_lower_better() {
            (extremes.min_loc, self.normalize_score(extremes.min_value))
        } else {
            (extremes.max_loc, self.normalize_score(extremes.max_value))
        }
    }

    /// Stable snake_case name, used in diagnostics and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            MatchMethod::SumSquaredDifference => "sqdiff",
            MatchMethod::SumSquaredDifferenceNormalized => "sqdiff_normed",
            MatchMethod::CrossCorrelation => "ccorr",
            MatchMethod::CrossCorrelationNormalized => "ccorr_normed",
            MatchMethod::CorrelationCoefficient => "ccoeff",
            MatchMethod::CorrelationCoefficientNormalized => "ccoeff_normed",
        }
    }
}
