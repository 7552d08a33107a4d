//! Binary classifiers and their one-vs-rest combination.

pub mod constant;
pub mod linear_svc;
pub mod logistic;
pub mod one_vs_rest;

pub use constant::ConstantClassifier;
pub use linear_svc::LinearSvc;
pub use logistic::LogisticRegression;
pub use one_vs_rest::OneVsRestClassifier;

use std::collections::BTreeMap;

use sprs::CsMat;

use crate::config::{ClassifierConfig, ClassifierKind};
use crate::error::{InaworldError, Result};

/// A classifier for one binary target over sparse feature rows.
pub trait BinaryClassifier: Send + Sync + std::fmt::Debug {
    /// Fit on the rows of `x` with one target per row.
    fn fit(&mut self, x: &CsMat<f64>, y: &[bool]) -> Result<()>;

    /// Signed distance to the decision boundary for every row of `x`.
    fn decision_function(&self, x: &CsMat<f64>) -> Result<Vec<f64>>;

    /// Positive-class prediction for every row of `x`.
    fn predict(&self, x: &CsMat<f64>) -> Result<Vec<bool>> {
        Ok(self
            .decision_function(x)?
            .into_iter()
            .map(|score| score > 0.0)
            .collect())
    }

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &'static str;
}

/// Build an unfitted classifier from its configuration.
pub fn build_classifier(config: &ClassifierConfig) -> Result<Box<dyn BinaryClassifier>> {
    Ok(match config.kind {
        ClassifierKind::LinearSvc => Box::new(LinearSvc::from_params(&config.params)?),
        ClassifierKind::LogisticRegression => {
            Box::new(LogisticRegression::from_params(&config.params)?)
        }
    })
}

/// Read keyword parameters, rejecting any key not in `known`.
pub(crate) struct Params<'a> {
    params: &'a BTreeMap<String, f64>,
    classifier: &'static str,
}

impl<'a> Params<'a> {
    pub(crate) fn new(
        params: &'a BTreeMap<String, f64>,
        classifier: &'static str,
        known: &[&str],
    ) -> Result<Self> {
        if let Some(unknown) = params.keys().find(|key| !known.contains(&key.as_str())) {
            return Err(InaworldError::invalid_config(format!(
                "{classifier} does not accept parameter '{unknown}' (expected one of: {})",
                known.join(", ")
            )));
        }
        Ok(Params { params, classifier })
    }

    /// A strictly positive real parameter.
    pub(crate) fn positive(&self, key: &str, default: f64) -> Result<f64> {
        let value = self.params.get(key).copied().unwrap_or(default);
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(InaworldError::invalid_config(format!(
                "{} parameter '{key}' must be positive, got {value}",
                self.classifier
            )))
        }
    }

    /// A positive whole-number parameter.
    pub(crate) fn count(&self, key: &str, default: usize) -> Result<usize> {
        match self.params.get(key) {
            None => Ok(default),
            Some(&value) if value >= 1.0 && value.fract() == 0.0 && value.is_finite() => {
                Ok(value as usize)
            }
            Some(value) => Err(InaworldError::invalid_config(format!(
                "{} parameter '{key}' must be a positive integer, got {value}",
                self.classifier
            ))),
        }
    }
}

/// Dot product of one sparse row with a dense weight vector.
pub(crate) fn sparse_dot(indices: &[usize], data: &[f64], weights: &[f64]) -> f64 {
    indices
        .iter()
        .zip(data)
        .map(|(&col, &value)| weights[col] * value)
        .sum()
}

/// Borrow the index and value slices of every row of a CSR matrix.
pub(crate) fn csr_rows(x: &CsMat<f64>) -> Vec<(&[usize], &[f64])> {
    let indptr = x.indptr();
    let (indices, data) = (x.indices(), x.data());
    (0..x.rows())
        .map(|row| {
            let range = indptr.outer_inds_sz(row);
            (&indices[range.clone()], &data[range])
        })
        .collect()
}

/// `w.x + b` for every row of `x`.
pub(crate) fn linear_scores(x: &CsMat<f64>, weights: &[f64], intercept: f64) -> Result<Vec<f64>> {
    if x.cols() != weights.len() {
        return Err(InaworldError::shape_mismatch(weights.len(), x.cols()));
    }
    Ok(csr_rows(x)
        .into_iter()
        .map(|(indices, data)| sparse_dot(indices, data, weights) + intercept)
        .collect())
}

pub(crate) fn check_fit_input(x: &CsMat<f64>, y: &[bool]) -> Result<()> {
    if x.rows() != y.len() {
        return Err(InaworldError::shape_mismatch(x.rows(), y.len()));
    }
    if y.is_empty() {
        return Err(InaworldError::EmptyCorpus);
    }
    if !x.is_csr() {
        return Err(InaworldError::invalid_config(
            "feature matrix must be in CSR layout",
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sprs::{CsMat, TriMat};

    /// Two separable clusters: rows with feature 0 are positive, rows with
    /// feature 1 negative, feature 2 is shared noise.
    pub fn separable() -> (CsMat<f64>, Vec<bool>) {
        let mut tri = TriMat::new((8, 3));
        let mut y = Vec::new();
        for row in 0..8 {
            let positive = row % 2 == 0;
            tri.add_triplet(row, if positive { 0 } else { 1 }, 1.0);
            tri.add_triplet(row, 2, 0.3);
            y.push(positive);
        }
        (tri.to_csr(), y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_classifier() {
        let svc = build_classifier(&ClassifierConfig::default()).unwrap();
        assert_eq!(svc.name(), "linear_svc");

        let logistic = build_classifier(
            &ClassifierConfig::new(ClassifierKind::LogisticRegression).with_param("c", 2.0),
        )
        .unwrap();
        assert_eq!(logistic.name(), "logistic_regression");
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let config = ClassifierConfig::default().with_param("gamma", 0.1);

        match build_classifier(&config) {
            Err(InaworldError::InvalidConfig(message)) => assert!(message.contains("gamma")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_parameter_values() {
        assert!(build_classifier(&ClassifierConfig::default().with_param("c", 0.0)).is_err());
        assert!(
            build_classifier(
                &ClassifierConfig::new(ClassifierKind::LogisticRegression)
                    .with_param("max_iter", 2.5)
            )
            .is_err()
        );
    }

    #[test]
    fn test_linear_scores_checks_width() {
        let (x, _) = test_support::separable();

        let scores = linear_scores(&x, &[1.0, -1.0, 0.0], 0.5).unwrap();
        assert_eq!(scores[0], 1.5);
        assert_eq!(scores[1], -0.5);
        assert!(matches!(
            linear_scores(&x, &[1.0], 0.0),
            Err(InaworldError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_sparse_dot() {
        assert_eq!(sparse_dot(&[0, 2], &[2.0, 3.0], &[1.0, 5.0, -1.0]), -1.0);
    }
}
