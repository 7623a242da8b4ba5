pub mod classifier;
pub mod evaluator;
pub mod preprocess;

pub use classifier::{classify, Classifier, LinearModel};
pub use evaluator::evaluate;
pub use preprocess::{prepare, FeatureVector, Scaler, StandardScaler};

use std::{
    io,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{bail, Result};
use log::{debug, info};
use tokio::time;

use crate::error::{PipelineError, SourceError};
use crate::models::{ClassificationOutcome, Trial, Verdict};
use crate::source::{RawSample, SampleSource};

/// Scaler and classifier, initialised once and shared read-only.
#[derive(Clone)]
pub struct Capabilities {
    pub scaler: Arc<dyn Scaler>,
    pub classifier: Arc<dyn Classifier>,
}

impl Capabilities {
    pub fn new(scaler: Arc<dyn Scaler>, classifier: Arc<dyn Classifier>) -> Result<Self> {
        if scaler.width() != classifier.width() {
            bail!(
                "scaler produces {} features but the model expects {}",
                scaler.width(),
                classifier.width()
            );
        }
        Ok(Self { scaler, classifier })
    }

    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self> {
        let scaler = StandardScaler::load(scaler_path)?;
        let model = LinearModel::load(model_path)?;
        info!(
            "Loaded scaler ({} features) and model from {}",
            scaler.width(),
            model_path.display()
        );
        Self::new(Arc::new(scaler), Arc::new(model))
    }
}

/// pull → prepare → classify → evaluate, for one trial.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<Mutex<Box<dyn SampleSource>>>,
    capabilities: Capabilities,
    read_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn SampleSource>,
        capabilities: Capabilities,
        read_timeout: Duration,
    ) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            capabilities,
            read_timeout,
        }
    }

    /// The only suspension point; bounded by the read timeout.
    pub async fn pull(&self) -> Result<RawSample, PipelineError> {
        let source = Arc::clone(&self.source);
        let read = tokio::task::spawn_blocking(move || {
            let mut guard = source.lock().map_err(|_| SourceError::Poisoned)?;
            guard.pull()
        });

        match time::timeout(self.read_timeout, read).await {
            Ok(Ok(result)) => Ok(result?),
            Ok(Err(join_err)) => Err(SourceError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("sample reader task failed: {join_err}"),
            ))
            .into()),
            Err(_) => Err(SourceError::Timeout(self.read_timeout.as_millis() as u64).into()),
        }
    }

    pub async fn run(&self, trial: &Trial) -> Result<(ClassificationOutcome, Verdict), PipelineError> {
        let sample = self.pull().await?;
        debug!("pulled record with {} values", sample.len());
        let features = prepare(sample, self.capabilities.scaler.as_ref())?;
        let outcome = classify(self.capabilities.classifier.as_ref(), &features)?;
        debug!("classified as {}", outcome.label.as_str());
        Ok((outcome, evaluate(trial, &outcome)))
    }
}
