use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::models::{ClassLabel, ClassificationOutcome};

use super::preprocess::FeatureVector;

/// Inference capability loaded once at start-up.
///
/// Returns the raw label; the adapter below decides what it means.
pub trait Classifier: Send + Sync {
    fn width(&self) -> usize;
    fn predict(&self, features: &FeatureVector) -> Result<i64, PipelineError>;
}

/// Logistic model over the scaled features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

impl LinearModel {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {}", path.display()))?;
        let model: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse model in {}", path.display()))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            bail!("model has no weights");
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            bail!("model parameters must be finite");
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            bail!("model threshold {} outside [0, 1]", self.threshold);
        }
        Ok(())
    }

    pub fn probability(&self, features: &[f64]) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for LinearModel {
    fn width(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, PipelineError> {
        if features.width() != self.weights.len() {
            return Err(PipelineError::ModelUnavailable(format!(
                "model expects {} features, got {}",
                self.weights.len(),
                features.width()
            )));
        }
        let p = self.probability(features.as_slice());
        Ok(if p >= self.threshold { 1 } else { 0 })
    }
}

pub fn classify(
    classifier: &dyn Classifier,
    features: &FeatureVector,
) -> Result<ClassificationOutcome, PipelineError> {
    let raw = classifier.predict(features)?;
    Ok(ClassificationOutcome {
        label: ClassLabel::from_raw(raw),
    })
}
