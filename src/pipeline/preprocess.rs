use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::source::RawSample;

/// One row of scaled features, ready for the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector(pub Vec<f64>);

impl FeatureVector {
    pub fn width(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// A transform fitted ahead of time against training recordings.
pub trait Scaler: Send + Sync {
    fn width(&self) -> usize;
    fn transform(&self, row: &[f64]) -> Vec<f64>;
}

/// Zero-mean / unit-variance scaling with stored per-feature parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler from {}", path.display()))?;
        let scaler: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scaler in {}", path.display()))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.mean.is_empty() {
            bail!("scaler has not been fitted (no parameters)");
        }
        if self.mean.len() != self.scale.len() {
            bail!(
                "scaler parameters disagree: {} means, {} scales",
                self.mean.len(),
                self.scale.len()
            );
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            bail!("scaler parameters must be finite");
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant features were fitted with zero spread.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect()
    }
}

pub fn prepare(sample: RawSample, scaler: &dyn Scaler) -> Result<FeatureVector, PipelineError> {
    if sample.len() != scaler.width() {
        return Err(PipelineError::Preprocess {
            expected: scaler.width(),
            actual: sample.len(),
        });
    }
    Ok(FeatureVector(scaler.transform(&sample.values)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> StandardScaler {
        StandardScaler::new(vec![1.0, 2.0, 0.0], vec![2.0, 0.5, 0.0]).unwrap()
    }

    #[test]
    fn scales_each_feature_with_its_own_parameters() {
        let sample = RawSample {
            values: vec![3.0, 1.0, 4.0],
        };
        let features = prepare(sample, &scaler()).unwrap();
        assert_eq!(features.as_slice(), &[1.0, -2.0, 4.0]);
    }

    #[test]
    fn width_mismatch_is_a_preprocess_error() {
        let scaler = StandardScaler::new(vec![0.0; 8], vec![1.0; 8]).unwrap();
        let sample = RawSample {
            values: vec![0.1, 0.2, 0.3, 0.4, 0.5],
        };
        match prepare(sample, &scaler) {
            Err(PipelineError::Preprocess { expected, actual }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 5);
            }
            other => panic!("expected preprocess error, got {other:?}"),
        }
    }

    #[test]
    fn unfitted_or_inconsistent_scalers_are_rejected() {
        assert!(StandardScaler::new(vec![], vec![]).is_err());
        assert!(StandardScaler::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn loads_fitted_parameters_from_json() {
        let path = std::env::temp_dir().join(format!("scaler-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"mean":[0.5,0.5],"scale":[0.25,1.0]}"#).unwrap();
        let scaler = StandardScaler::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(scaler.width(), 2);
        assert_eq!(scaler.transform(&[1.0, 1.5]), vec![2.0, 1.0]);
    }
}
