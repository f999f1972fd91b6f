//! A linear predictive model loaded from a JSON artifact.
//!
//! The engine only depends on the [`PredictiveModel`] trait; this is the
//! shipped implementation for deployments without an external inference
//! service. The artifact is `{"bias": f64, "weights": [f64; FEATURE_LEN]}`.

use crate::{ArtifactError, FeatureVector, PredictiveModel, encode::FEATURE_LEN};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// `bias + Σ weightᵢ · slotᵢ` over the raw feature slots.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    bias: f64,
    weights: Vec<f64>,
}

impl LinearModel {
    pub fn new(bias: f64, weights: Vec<f64>) -> Self {
        Self { bias, weights }
    }

    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let raw = fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))?;
        let model: Self = serde_json::from_str(&raw).map_err(|e| ArtifactError::InvalidModel {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if model.weights.len() != FEATURE_LEN {
            return Err(ArtifactError::InvalidModel {
                path: path.display().to_string(),
                reason: format!(
                    "expected {FEATURE_LEN} weights, got {}",
                    model.weights.len()
                ),
            });
        }
        tracing::info!(path = %path.display(), "loaded linear model");
        Ok(model)
    }
}

impl PredictiveModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.bias
            + features
                .as_bytes()
                .iter()
                .zip(&self.weights)
                .map(|(&slot, weight)| f64::from(slot) * weight)
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gender, encode};

    #[test]
    fn predicts_bias_plus_dot_product() {
        // Weight 1.0 on the gender bit only.
        let mut weights = vec![0.0; FEATURE_LEN];
        weights[0] = 1.0;
        let model = LinearModel::new(0.25, weights);

        assert_eq!(model.predict(&encode("emma", Gender::Female)), 0.25);
        assert_eq!(model.predict(&encode("emma", Gender::Male)), 1.25);
    }

    #[test]
    fn deserializes_from_json() {
        let raw = format!(
            "{{\"bias\": 0.1, \"weights\": {}}}",
            serde_json::to_string(&vec![0.0; FEATURE_LEN]).unwrap()
        );
        let model: LinearModel = serde_json::from_str(&raw).unwrap();
        assert_eq!(model.predict(&encode("a", Gender::Female)), 0.1);
    }
}
