//! One-vs-rest multi-label classification.
//!
//! One binary classifier is fitted per label column. Columns are independent,
//! so they are fitted concurrently on a dedicated rayon pool and each result
//! lands in its own slot, in column order.

use std::time::Instant;

use ndarray::Array2;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use sprs::CsMat;
use tracing::{debug, info, warn};

use crate::classifier::{BinaryClassifier, ConstantClassifier, build_classifier};
use crate::config::ClassifierConfig;
use crate::error::{InaworldError, Result};

/// Multi-label classifier made of one binary classifier per label.
pub struct OneVsRestClassifier {
    config: ClassifierConfig,
    thread_pool: ThreadPool,
    estimators: Vec<Box<dyn BinaryClassifier>>,
}

impl std::fmt::Debug for OneVsRestClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneVsRestClassifier")
            .field("kind", &self.config.kind)
            .field("threads", &self.thread_pool.current_num_threads())
            .field("n_labels", &self.estimators.len())
            .finish()
    }
}

impl OneVsRestClassifier {
    /// Create an unfitted classifier. The configuration is checked eagerly so
    /// that bad parameters fail before any fitting starts.
    pub fn new(config: ClassifierConfig, n_jobs: usize) -> Result<Self> {
        build_classifier(&config)?;

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(n_jobs.max(1))
            .thread_name(|i| format!("ovr-fit-{i}"))
            .build()
            .map_err(|e| InaworldError::ThreadPool(format!("Failed to create thread pool: {e}")))?;

        Ok(OneVsRestClassifier {
            config,
            thread_pool,
            estimators: Vec::new(),
        })
    }

    /// Fit one classifier per column of `y` on the rows of `x`.
    pub fn fit(&mut self, x: &CsMat<f64>, y: &CsMat<u8>) -> Result<()> {
        if x.rows() != y.rows() {
            return Err(InaworldError::shape_mismatch(x.rows(), y.rows()));
        }
        if x.rows() == 0 {
            return Err(InaworldError::EmptyCorpus);
        }

        let targets = label_columns(y);
        let config = &self.config;
        let start = Instant::now();

        let estimators: Vec<Box<dyn BinaryClassifier>> = self.thread_pool.install(|| {
            targets
                .par_iter()
                .enumerate()
                .map(|(label, target)| fit_column(config, x, label, target))
                .collect::<Result<Vec<_>>>()
        })?;

        info!(
            n_labels = estimators.len(),
            n_examples = x.rows(),
            n_features = x.cols(),
            classifier = %self.config.kind,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fitted one-vs-rest classifier"
        );

        self.estimators = estimators;
        Ok(())
    }

    /// Decision scores, examples x labels.
    pub fn decision_function(&self, x: &CsMat<f64>) -> Result<Array2<f64>> {
        let mut scores = Array2::zeros((x.rows(), self.estimators.len()));
        for (label, estimator) in self.estimators.iter().enumerate() {
            for (row, score) in estimator.decision_function(x)?.into_iter().enumerate() {
                scores[[row, label]] = score;
            }
        }
        Ok(scores)
    }

    /// Binary predictions, examples x labels.
    pub fn predict(&self, x: &CsMat<f64>) -> Result<Array2<u8>> {
        Ok(self
            .decision_function(x)?
            .mapv(|score| if score > 0.0 { 1 } else { 0 }))
    }

    /// Number of fitted label classifiers.
    pub fn n_labels(&self) -> usize {
        self.estimators.len()
    }

    /// Whether `fit` has completed.
    pub fn is_fitted(&self) -> bool {
        !self.estimators.is_empty()
    }

    /// The fitted classifier of each label, in column order.
    pub fn estimators(&self) -> &[Box<dyn BinaryClassifier>] {
        &self.estimators
    }
}

fn fit_column(
    config: &ClassifierConfig,
    x: &CsMat<f64>,
    label: usize,
    target: &[bool],
) -> Result<Box<dyn BinaryClassifier>> {
    let positives = target.iter().filter(|&&positive| positive).count();

    let mut estimator: Box<dyn BinaryClassifier> = if positives == 0 || positives == target.len() {
        warn!(
            label,
            positives,
            "label is constant in the training data, predicting it constantly"
        );
        Box::new(ConstantClassifier::default())
    } else {
        build_classifier(config)?
    };

    estimator.fit(x, target)?;
    debug!(label, positives, estimator = estimator.name(), "fitted label classifier");

    Ok(estimator)
}

/// Split an indicator matrix into one boolean target per column.
fn label_columns(y: &CsMat<u8>) -> Vec<Vec<bool>> {
    let mut columns = vec![vec![false; y.rows()]; y.cols()];
    for (row, view) in y.outer_iterator().enumerate() {
        for (col, &value) in view.iter() {
            if value > 0 {
                columns[col][row] = true;
            }
        }
    }
    columns
}
