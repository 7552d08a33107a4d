//! Logistic regression backed by `linfa-logistic`.

use std::collections::BTreeMap;

use linfa::prelude::*;
use linfa_logistic::LogisticRegression as LogisticParams;
use ndarray::Array1;
use sprs::CsMat;
use tracing::debug;

use crate::classifier::{BinaryClassifier, Params, check_fit_input, linear_scores};
use crate::error::{InaworldError, Result};

const PARAMS: &[&str] = &["c", "max_iter", "tol"];

/// L2-regularized logistic regression with an unregularized intercept.
///
/// `c` is the inverse regularization strength; the solver is given
/// `alpha = 1 / c`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    c: f64,
    max_iter: usize,
    tol: f64,
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Create a classifier with regularization strength `c` and default
    /// solver settings.
    pub fn new(c: f64) -> Self {
        LogisticRegression {
            c,
            max_iter: 100,
            tol: 1e-4,
            weights: Vec::new(),
            intercept: 0.0,
        }
    }

    /// Build from keyword parameters `c`, `max_iter` and `tol`.
    pub fn from_params(params: &BTreeMap<String, f64>) -> Result<Self> {
        let params = Params::new(params, "logistic_regression", PARAMS)?;
        Ok(LogisticRegression {
            c: params.positive("c", 1.0)?,
            max_iter: params.count("max_iter", 100)?,
            tol: params.positive("tol", 1e-4)?,
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

    /// Probability of the positive class for every row of `x`.
    pub fn predict_proba(&self, x: &CsMat<f64>) -> Result<Vec<f64>> {
        Ok(self.decision_function(x)?.into_iter().map(sigmoid).collect())
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl BinaryClassifier for LogisticRegression {
    fn fit(&mut self, x: &CsMat<f64>, y: &[bool]) -> Result<()> {
        check_fit_input(x, y)?;

        // `true` sorts after `false`, so it is the solver's positive class
        let dataset = Dataset::new(x.to_dense(), Array1::from(y.to_vec()));
        let model = LogisticParams::<f64>::default()
            .alpha(1.0 / self.c)
            .with_intercept(true)
            .max_iterations(self.max_iter as u64)
            .gradient_tolerance(self.tol)
            .fit(&dataset)
            .map_err(|e| InaworldError::training(format!("logistic regression: {e}")))?;

        self.weights = model.params().to_vec();
        self.intercept = model.intercept();
        debug!(intercept = self.intercept, "fitted logistic regression");

        Ok(())
    }

    fn decision_function(&self, x: &CsMat<f64>) -> Result<Vec<f64>> {
        linear_scores(x, &self.weights, self.intercept)
    }

    fn name(&self) -> &'static str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::test_support::separable;

    #[test]
    fn test_logistic_regression_separates_clusters() {
        let (x, y) = separable();
        let mut classifier = LogisticRegression::new(10.0);

        classifier.fit(&x, &y).unwrap();

        assert_eq!(classifier.predict(&x).unwrap(), y);
        assert!(classifier.weights()[0] > classifier.weights()[1]);
        let probabilities = classifier.predict_proba(&x).unwrap();
        assert!(probabilities[0] > 0.5);
        assert!(probabilities[1] < 0.5);
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
    }

    #[test]
    fn test_logistic_from_params() {
        let params = BTreeMap::from([("c".to_string(), 2.0), ("max_iter".to_string(), 50.0)]);
        let classifier = LogisticRegression::from_params(&params).unwrap();
        assert_eq!(classifier.max_iter, 50);
        assert_eq!(classifier.c, 2.0);

        let params = BTreeMap::from([("learning_rate".to_string(), 1.0)]);
        assert!(LogisticRegression::from_params(&params).is_err());
    }
}
