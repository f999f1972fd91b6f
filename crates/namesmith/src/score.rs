//! Scoring of candidate names.
//!
//! The [`Scorer`] combines two read-only collaborators behind trait seams:
//! an opaque [`PredictiveModel`] producing a scalar for any feature vector,
//! and a [`HistoricalTable`] of precomputed ranks where negative entries
//! mark flagged words. A negative historical entry always overrides the
//! model's opinion.

use crate::{FeatureVector, Gender, encode, generate::title_case};
use serde::Serialize;
use std::sync::Arc;

/// Single-sample inference over a feature vector. Shared read-only across
/// all sessions; implementations must be internally immutable.
pub trait PredictiveModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Exact-key lookup of a precomputed rank. Negative values denote flagged
/// entries.
pub trait HistoricalTable: Send + Sync {
    fn lookup(&self, features: &FeatureVector) -> Option<f64>;
}

/// Human-readable bucket derived from a display score via fixed thresholds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum QualityTier {
    Inappropriate,
    Poor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Excellent,
    /// No score available (predictive model missing).
    Unknown,
}

impl QualityTier {
    pub fn from_score(score: f64) -> Self {
        if score < 0.0 {
            Self::Inappropriate
        } else if score < 0.2 {
            Self::Poor
        } else if score < 0.4 {
            Self::Fair
        } else if score < 0.6 {
            Self::Good
        } else if score < 0.8 {
            Self::VeryGood
        } else {
            Self::Excellent
        }
    }
}

/// Immutable outcome of scoring one candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Title-cased display form of the candidate.
    pub name: String,
    /// The score shown to callers: the historical penalty for flagged
    /// words, otherwise the model's prediction. `None` in degraded mode.
    pub raw_score: Option<f64>,
    pub predicted_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_score: Option<f64>,
    pub appropriate: bool,
    pub quality_tier: QualityTier,
    /// Set when the predictive model was unavailable and the result is a
    /// degraded placeholder rather than a real grade.
    pub model_missing: bool,
}

impl ScoreResult {
    /// Whether the candidate's vector matched a historical entry.
    pub fn historical_match(&self) -> bool {
        self.historical_score.is_some()
    }
}

/// Wraps the two scoring collaborators. Purely functional: scoring has no
/// side effects and the same inputs always grade identically.
pub struct Scorer {
    model: Option<Arc<dyn PredictiveModel>>,
    table: Arc<dyn HistoricalTable>,
}

impl Scorer {
    pub fn new(model: Option<Arc<dyn PredictiveModel>>, table: Arc<dyn HistoricalTable>) -> Self {
        if model.is_none() {
            tracing::warn!("predictive model unavailable, scoring runs degraded");
        }
        Self { model, table }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Grades a single candidate.
    ///
    /// Never fails: with no model loaded it returns a degraded result
    /// (`appropriate = true`, no scores, `model_missing` set) so the
    /// pipeline needs no special casing beyond reading the flag.
    pub fn score(&self, name: &str, gender: Gender) -> ScoreResult {
        let display_name = title_case(name);
        let Some(model) = &self.model else {
            return ScoreResult {
                name: display_name,
                raw_score: None,
                predicted_score: None,
                historical_score: None,
                appropriate: true,
                quality_tier: QualityTier::Unknown,
                model_missing: true,
            };
        };

        let features = encode(name, gender);
        let predicted = model.predict(&features);
        let historical = self.table.lookup(&features);

        // A flagged historical entry overrides the model outright.
        let (appropriate, display) = match historical {
            Some(rank) if rank < 0.0 => (false, rank),
            _ => (predicted >= 0.0, predicted),
        };

        ScoreResult {
            name: display_name,
            raw_score: Some(display),
            predicted_score: Some(predicted),
            historical_score: historical,
            appropriate,
            quality_tier: QualityTier::from_score(display),
            model_missing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RankTable;

    struct ConstModel(f64);

    impl PredictiveModel for ConstModel {
        fn predict(&self, _features: &FeatureVector) -> f64 {
            self.0
        }
    }

    fn scorer_with(model: f64, table: RankTable) -> Scorer {
        Scorer::new(Some(Arc::new(ConstModel(model))), Arc::new(table))
    }

    #[test]
    fn negative_historical_entry_overrides_model() {
        let mut table = RankTable::new();
        table.insert_flagged("damn", -0.5);

        let result = scorer_with(0.9, table).score("damn", Gender::Female);
        assert!(!result.appropriate);
        assert_eq!(result.raw_score, Some(-0.5));
        assert_eq!(result.quality_tier, QualityTier::Inappropriate);
    }

    #[test]
    fn positive_historical_entry_keeps_model_score() {
        let mut table = RankTable::new();
        table.insert("emma", Gender::Female, 0.95);

        let result = scorer_with(0.42, table).score("emma", Gender::Female);
        assert!(result.appropriate);
        assert_eq!(result.raw_score, Some(0.42));
        assert_eq!(result.historical_score, Some(0.95));
        assert!(result.historical_match());
    }

    #[test]
    fn unknown_name_has_no_historical_match() {
        let result = scorer_with(0.1, RankTable::new()).score("zyx", Gender::Male);
        assert!(!result.historical_match());
        assert_eq!(result.quality_tier, QualityTier::Poor);
    }

    #[test]
    fn negative_prediction_is_inappropriate() {
        let result = scorer_with(-0.2, RankTable::new()).score("zyx", Gender::Male);
        assert!(!result.appropriate);
        assert_eq!(result.quality_tier, QualityTier::Inappropriate);
    }

    #[test]
    fn missing_model_degrades_instead_of_failing() {
        let scorer = Scorer::new(None, Arc::new(RankTable::new()));
        let result = scorer.score("emma", Gender::Female);
        assert!(result.model_missing);
        assert!(result.appropriate);
        assert_eq!(result.raw_score, None);
        assert_eq!(result.quality_tier, QualityTier::Unknown);
    }

    #[test]
    fn result_names_are_title_cased() {
        let result = scorer_with(0.5, RankTable::new()).score("eMMa", Gender::Female);
        assert_eq!(result.name, "Emma");
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(QualityTier::from_score(-0.01), QualityTier::Inappropriate);
        assert_eq!(QualityTier::from_score(0.0), QualityTier::Poor);
        assert_eq!(QualityTier::from_score(0.2), QualityTier::Fair);
        assert_eq!(QualityTier::from_score(0.4), QualityTier::Good);
        assert_eq!(QualityTier::from_score(0.6), QualityTier::VeryGood);
        assert_eq!(QualityTier::from_score(0.8), QualityTier::Excellent);
        assert_eq!(QualityTier::from_score(3.0), QualityTier::Excellent);
    }
}
