//! Classifier for a target that never changes.

use sprs::CsMat;

use crate::classifier::{BinaryClassifier, check_fit_input};
use crate::error::Result;

/// Always predicts the single class seen at fit time.
///
/// One-vs-rest uses it for genres that are all-positive or all-negative in
/// the training split, where a margin classifier has nothing to separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstantClassifier {
    value: bool,
}

impl ConstantClassifier {
    /// Create a classifier that always answers `value`.
    pub fn new(value: bool) -> Self {
        ConstantClassifier { value }
    }

    /// The constant answer.
    pub fn value(&self) -> bool {
        self.value
    }
}

impl BinaryClassifier for ConstantClassifier {
    fn fit(&mut self, x: &CsMat<f64>, y: &[bool]) -> Result<()> {
        check_fit_input(x, y)?;
        self.value = y[0];
        Ok(())
    }

    fn decision_function(&self, x: &CsMat<f64>) -> Result<Vec<f64>> {
        let score = if self.value { 1.0 } else { -1.0 };
        Ok(vec![score; x.rows()])
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::test_support::separable;

    #[test]
    fn test_constant_classifier() {
        let (x, _) = separable();
        let mut classifier = ConstantClassifier::default();

        classifier.fit(&x, &[true; 8]).unwrap();

        assert!(classifier.value());
        assert_eq!(classifier.predict(&x).unwrap(), vec![true; 8]);
    }
}
