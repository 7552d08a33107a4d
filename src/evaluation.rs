//! Multi-label classification metrics.
//!
//! Per-label precision, recall, F1 and support, plus micro, macro, weighted
//! and samples averages. Any ratio with a zero denominator is reported as 0.

use std::fmt;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{InaworldError, Result};

/// Precision, recall, F1 and support for one label or one average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

impl Metrics {
    fn from_counts(true_positives: usize, predicted: usize, actual: usize) -> Self {
        let precision = ratio(true_positives, predicted);
        let recall = ratio(true_positives, actual);
        Metrics {
            precision,
            recall,
            f1_score: f1(precision, recall),
            support: actual,
        }
    }
}

/// Metrics for one named label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelReport {
    pub label: String,
    #[serde(flatten)]
    pub metrics: Metrics,
}

/// Evaluation of multi-label predictions against ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One entry per label, in label-column order.
    pub labels: Vec<LabelReport>,
    /// Counts pooled over every label.
    pub micro_avg: Metrics,
    /// Unweighted mean over labels.
    pub macro_avg: Metrics,
    /// Mean over labels weighted by support.
    pub weighted_avg: Metrics,
    /// Mean over examples of per-example scores.
    pub samples_avg: Metrics,
}

impl ClassificationReport {
    /// Compare predictions with ground truth. Both matrices are examples x
    /// labels and `label_names[j]` names column `j`.
    pub fn compute(
        y_true: &Array2<u8>,
        y_pred: &Array2<u8>,
        label_names: &[String],
    ) -> Result<Self> {
        if y_true.dim() != y_pred.dim() {
            return Err(InaworldError::shape_mismatch(y_true.len(), y_pred.len()));
        }
        if y_true.ncols() != label_names.len() {
            return Err(InaworldError::shape_mismatch(
                y_true.ncols(),
                label_names.len(),
            ));
        }

        let labels: Vec<LabelReport> = label_names
            .iter()
            .zip(y_true.columns().into_iter().zip(y_pred.columns()))
            .map(|(name, (truth, prediction))| {
                let (tp, predicted, actual) = counts(truth, prediction);
                LabelReport {
                    label: name.clone(),
                    metrics: Metrics::from_counts(tp, predicted, actual),
                }
            })
            .collect();

        let total_support: usize = labels.iter().map(|l| l.metrics.support).sum();

        let (tp, predicted, actual) = counts_all(y_true, y_pred);
        let micro_avg = Metrics::from_counts(tp, predicted, actual);

        let n_labels = labels.len() as f64;
        let mean = |select: fn(&Metrics) -> f64| {
            if labels.is_empty() {
                0.0
            } else {
                labels.iter().map(|l| select(&l.metrics)).sum::<f64>() / n_labels
            }
        };
        let macro_avg = Metrics {
            precision: mean(|m| m.precision),
            recall: mean(|m| m.recall),
            f1_score: mean(|m| m.f1_score),
            support: total_support,
        };

        let weighted = |select: fn(&Metrics) -> f64| {
            if total_support == 0 {
                0.0
            } else {
                labels
                    .iter()
                    .map(|l| select(&l.metrics) * l.metrics.support as f64)
                    .sum::<f64>()
                    / total_support as f64
            }
        };
        let weighted_avg = Metrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1_score: weighted(|m| m.f1_score),
            support: total_support,
        };

        let samples_avg = samples_average(y_true, y_pred, total_support);

        Ok(ClassificationReport {
            labels,
            micro_avg,
            macro_avg,
            weighted_avg,
            samples_avg,
        })
    }

    /// Metrics of one label by name.
    pub fn label(&self, name: &str) -> Option<&Metrics> {
        self.labels
            .iter()
            .find(|report| report.label == name)
            .map(|report| &report.metrics)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const AVERAGES: [&str; 4] = ["micro avg", "macro avg", "weighted avg", "samples avg"];

        let width = self
            .labels
            .iter()
            .map(|l| l.label.chars().count())
            .chain(AVERAGES.iter().map(|name| name.len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;

        for label in &self.labels {
            write_row(f, width, &label.label, &label.metrics)?;
        }
        writeln!(f)?;

        let averages = [
            &self.micro_avg,
            &self.macro_avg,
            &self.weighted_avg,
            &self.samples_avg,
        ];
        for (name, metrics) in AVERAGES.iter().zip(averages) {
            write_row(f, width, name, metrics)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, width: usize, name: &str, m: &Metrics) -> fmt::Result {
    writeln!(
        f,
        "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name, m.precision, m.recall, m.f1_score, m.support
    )
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// (true positives, predicted positives, actual positives) of one lane.
fn counts(truth: ArrayView1<u8>, prediction: ArrayView1<u8>) -> (usize, usize, usize) {
    truth
        .iter()
        .zip(prediction.iter())
        .fold((0, 0, 0), |(tp, predicted, actual), (&t, &p)| {
            let (t, p) = (t > 0, p > 0);
            (
                tp + usize::from(t && p),
                predicted + usize::from(p),
                actual + usize::from(t),
            )
        })
}

fn counts_all(y_true: &Array2<u8>, y_pred: &Array2<u8>) -> (usize, usize, usize) {
    y_true
        .rows()
        .into_iter()
        .zip(y_pred.rows())
        .map(|(truth, prediction)| counts(truth, prediction))
        .fold((0, 0, 0), |acc, c| (acc.0 + c.0, acc.1 + c.1, acc.2 + c.2))
}

fn samples_average(y_true: &Array2<u8>, y_pred: &Array2<u8>, support: usize) -> Metrics {
    let n_samples = y_true.nrows();
    if n_samples == 0 {
        return Metrics {
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
            support,
        };
    }

    let (precision, recall, f1_score) = y_true
        .rows()
        .into_iter()
        .zip(y_pred.rows())
        .map(|(truth, prediction)| {
            let (tp, predicted, actual) = counts(truth, prediction);
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, actual);
            (precision, recall, f1(precision, recall))
        })
        .fold((0.0, 0.0, 0.0), |acc, s| (acc.0 + s.0, acc.1 + s.1, acc.2 + s.2));

    let n = n_samples as f64;
    Metrics {
        precision: precision / n,
        recall: recall / n,
        f1_score: f1_score / n,
        support,
    }
}
