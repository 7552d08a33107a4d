//! Linear support vector classifier backed by `linfa-svm`.
//!
//! The solver runs on a dense copy of the training rows. After fitting, the
//! support-vector expansion is collapsed into one weight vector
//! `w = sum(alpha_i * x_i)`, so prediction stays a sparse dot product
//! `w.x - rho`.

use std::collections::BTreeMap;

use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::Array1;
use sprs::CsMat;
use tracing::debug;

use crate::classifier::{BinaryClassifier, Params, check_fit_input, csr_rows, linear_scores};
use crate::error::{InaworldError, Result};

const PARAMS: &[&str] = &["c", "tol"];

/// Soft-margin linear SVM.
#[derive(Debug, Clone)]
pub struct LinearSvc {
    c: f64,
    tol: f64,
    weights: Vec<f64>,
    intercept: f64,
    n_support: usize,
}

impl LinearSvc {
    /// Create a classifier with penalty `c` on both classes.
    pub fn new(c: f64) -> Self {
        LinearSvc {
            c,
            tol: 1e-3,
            weights: Vec::new(),
            intercept: 0.0,
            n_support: 0,
        }
    }

    /// Build from keyword parameters `c` and `tol`.
    pub fn from_params(params: &BTreeMap<String, f64>) -> Result<Self> {
        let params = Params::new(params, "linear_svc", PARAMS)?;
        Ok(LinearSvc {
            c: params.positive("c", 1.0)?,
            tol: params.positive("tol", 1e-3)?,
            ..Self::new(1.0)
        })
    }

    /// Learned feature weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Learned intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Support vectors found by the last fit.
    pub fn n_support(&self) -> usize {
        self.n_support
    }
}

impl Default for LinearSvc {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl BinaryClassifier for LinearSvc {
    fn fit(&mut self, x: &CsMat<f64>, y: &[bool]) -> Result<()> {
        check_fit_input(x, y)?;

        let dataset = Dataset::new(x.to_dense(), Array1::from(y.to_vec()));
        let model = Svm::<f64, bool>::params()
            .pos_neg_weights(self.c, self.c)
            .eps(self.tol)
            .linear_kernel()
            .fit(&dataset)
            .map_err(|e| InaworldError::training(format!("linear svc: {e}")))?;

        // alpha carries the target sign
        let mut weights = vec![0.0; x.cols()];
        for ((indices, data), &alpha) in csr_rows(x).into_iter().zip(&model.alpha) {
            for (&col, &value) in indices.iter().zip(data) {
                weights[col] += alpha * value;
            }
        }

        self.weights = weights;
        self.intercept = -model.rho;
        self.n_support = model.nsupport();
        debug!(n_support = self.n_support, "fitted linear svc");

        Ok(())
    }

    fn decision_function(&self, x: &CsMat<f64>) -> Result<Vec<f64>> {
        linear_scores(x, &self.weights, self.intercept)
    }

    fn name(&self) -> &'static str {
        "linear_svc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::test_support::separable;

    #[test]
    fn test_linear_svc_separates_clusters() {
        let (x, y) = separable();
        let mut classifier = LinearSvc::default();

        classifier.fit(&x, &y).unwrap();

        assert_eq!(classifier.predict(&x).unwrap(), y);
        assert!(classifier.weights()[0] > classifier.weights()[1]);
        assert!(classifier.n_support() >= 2);
    }

    #[test]
    fn test_linear_svc_from_params() {
        let params = BTreeMap::from([("c".to_string(), 0.5), ("tol".to_string(), 1e-4)]);

        let classifier = LinearSvc::from_params(&params).unwrap();

        assert_eq!(classifier.c, 0.5);
        assert_eq!(classifier.tol, 1e-4);
        assert!(
            LinearSvc::from_params(&BTreeMap::from([("max_iter".to_string(), 10.0)])).is_err()
        );
    }

    #[test]
    fn test_linear_svc_rejects_mismatched_targets() {
        let (x, _) = separable();

        assert!(LinearSvc::default().fit(&x, &[true, false]).is_err());
    }
}
