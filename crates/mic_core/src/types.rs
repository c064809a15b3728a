use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary classification outcome. The probability threshold is fixed at
/// 0.5 and 0.5 itself maps to `Medical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "medical")]
    Medical,
    #[serde(rename = "non-medical")]
    NonMedical,
}

impl Label {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.5 {
            Label::Medical
        } else {
            Label::NonMedical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Medical => "medical",
            Label::NonMedical => "non-medical",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a classified image came from: a resolved image URL, or a 1-based
/// PDF page number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageOrigin {
    Url(String),
    PdfPage(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Sequence index (URL path) or page number (PDF path), 1-based.
    pub identifier: u32,
    pub source: ImageOrigin,
    pub label: Label,
    pub probability: f64,
    pub filename: String,
}

/// `(medical, non_medical)` counts over a run's results.
pub fn label_counts(results: &[ClassificationResult]) -> (usize, usize) {
    let medical = results
        .iter()
        .filter(|r| r.label == Label::Medical)
        .count();
    (medical, results.len() - medical)
}
