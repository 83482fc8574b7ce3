//! Evaluation metrics for the binary classifier.

use std::fmt;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::dataset::Diagnosis;
use crate::utils::AnalysisError;

/// Confusion matrix for the two diagnosis classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Row-major `2x2` counts (`truth * 2 + predicted`).
    pub counts: [u32; 4],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally paired truth/prediction labels; anything outside {0, 1} is an error.
    pub fn from_labels(
        truth: ArrayView1<'_, usize>,
        predicted: ArrayView1<'_, usize>,
    ) -> Result<Self, AnalysisError> {
        if truth.len() != predicted.len() {
            return Err(AnalysisError::ValidationError(format!(
                "truth length ({}) must match predicted length ({})",
                truth.len(),
                predicted.len()
            )));
        }
        let mut cm = Self::new();
        for (i, (&t, &p)) in truth.iter().zip(predicted.iter()).enumerate() {
            let (Some(t), Some(p)) = (Diagnosis::from_index(t), Diagnosis::from_index(p)) else {
                return Err(AnalysisError::ValidationError(format!(
                    "pair {}: labels must be 0 or 1, got truth={} predicted={}",
                    i, t, p
                )));
            };
            cm.add(t, p);
        }
        Ok(cm)
    }

    fn cell(truth: Diagnosis, predicted: Diagnosis) -> usize {
        truth.as_index() * 2 + predicted.as_index()
    }

    pub fn add(&mut self, truth: Diagnosis, predicted: Diagnosis) {
        let idx = Self::cell(truth, predicted);
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: Diagnosis, predicted: Diagnosis) -> u32 {
        self.counts[Self::cell(truth, predicted)]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Fraction of correct predictions.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct = self.get(Diagnosis::Benign, Diagnosis::Benign)
            + self.get(Diagnosis::Malignant, Diagnosis::Malignant);
        f64::from(correct) / f64::from(total)
    }

    /// Precision/recall/F1 treating `class` as the positive label.
    pub fn class_metrics(&self, class: Diagnosis) -> ClassMetrics {
        let other = match class {
            Diagnosis::Benign => Diagnosis::Malignant,
            Diagnosis::Malignant => Diagnosis::Benign,
        };
        let tp = f64::from(self.get(class, class));
        let fp = f64::from(self.get(other, class));
        let fn_ = f64::from(self.get(class, other));
        let support = self.get(class, class) + self.get(class, other);

        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        ClassMetrics {
            precision,
            recall,
            f1: f1_score(precision, recall),
            support,
        }
    }
}

/// Precision/recall statistics for a single class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    pub f1: f64,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Harmonic mean of precision and recall.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Held-out evaluation summary printed after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub benign: ClassMetrics,
    pub malignant: ClassMetrics,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(confusion: ConfusionMatrix) -> Self {
        let benign = confusion.class_metrics(Diagnosis::Benign);
        let malignant = confusion.class_metrics(Diagnosis::Malignant);
        let total = benign.support + malignant.support;

        let macro_avg = ClassMetrics {
            precision: (benign.precision + malignant.precision) / 2.0,
            recall: (benign.recall + malignant.recall) / 2.0,
            f1: (benign.f1 + malignant.f1) / 2.0,
            support: total,
        };

        let weighted = |pick: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                (pick(&benign) * f64::from(benign.support)
                    + pick(&malignant) * f64::from(malignant.support))
                    / f64::from(total)
            }
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Self {
            accuracy: confusion.accuracy(),
            confusion,
            benign,
            malignant,
            macro_avg,
            weighted_avg,
        }
    }

    pub fn from_labels(
        truth: ArrayView1<'_, usize>,
        predicted: ArrayView1<'_, usize>,
    ) -> Result<Self, AnalysisError> {
        Ok(Self::from_confusion(ConfusionMatrix::from_labels(truth, predicted)?))
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, m) in [
            (Diagnosis::Benign.as_index().to_string(), &self.benign),
            (Diagnosis::Malignant.as_index().to_string(), &self.malignant),
        ] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion.total()
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "confusion matrix (rows=true, cols=pred):")?;
        for truth in [Diagnosis::Benign, Diagnosis::Malignant] {
            writeln!(
                f,
                "{:6}{:6}",
                self.confusion.get(truth, Diagnosis::Benign),
                self.confusion.get(truth, Diagnosis::Malignant)
            )?;
        }
        Ok(())
    }
}
