//! Acceptance criteria and final ranking.

use crate::ScoreResult;
use serde::{Deserialize, Serialize};

/// Acceptance policy over historical matches.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// No historical constraint.
    #[default]
    Random,
    /// Only candidates with a historical match.
    Popular,
    /// Only candidates without a historical match.
    Unique,
}

impl core::str::FromStr for Style {
    type Err = core::convert::Infallible;

    /// Unrecognized styles fall back to [`Style::Random`] rather than
    /// erroring, matching the permissive request surface.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "popular" => Self::Popular,
            "unique" => Self::Unique,
            _ => Self::Random,
        })
    }
}

/// Caller-supplied acceptance criteria for one session.
///
/// The score window arrives on the caller's 0-100 scale and is normalized
/// to the model's native range at construction.
#[derive(Clone, Copy, Debug)]
pub struct Criteria {
    pub style: Style,
    min_score: f64,
    max_score: f64,
}

impl Criteria {
    /// Builds criteria from a style and a 0-100 scaled score window.
    pub fn new(style: Style, min_percent: f64, max_percent: f64) -> Self {
        Self {
            style,
            min_score: min_percent / 100.0,
            max_score: max_percent / 100.0,
        }
    }

    /// Whether a scored candidate qualifies.
    ///
    /// The style constraint applies first, then the score window. A
    /// degraded result (no raw score) carries nothing to compare against
    /// and is treated as inside any window.
    pub fn accept(&self, result: &ScoreResult) -> bool {
        let style_ok = match self.style {
            Style::Random => true,
            Style::Popular => result.historical_match(),
            Style::Unique => !result.historical_match(),
        };
        if !style_ok {
            return false;
        }

        match result.raw_score {
            Some(score) => self.min_score <= score && score <= self.max_score,
            None => true,
        }
    }
}

/// Stable sort by raw display score, descending. Degraded results without
/// a score sink to the end.
pub fn rank(results: &mut [ScoreResult]) {
    results.sort_by(|a, b| {
        let a = a.raw_score.unwrap_or(f64::NEG_INFINITY);
        let b = b.raw_score.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
}
