use crate::ImageClassifier;
use image::DynamicImage;
use mic_core::{Error, Label, Result};
use std::sync::Mutex;

/// Scripted classifier that cycles through a fixed probability sequence.
/// Stands in for a real checkpoint in tests and dry runs.
#[derive(Debug)]
pub struct FixedClassifier {
    probabilities: Vec<f64>,
    cursor: Mutex<usize>,
}

impl FixedClassifier {
    pub fn new(probabilities: Vec<f64>) -> Result<Self> {
        if probabilities.is_empty() {
            return Err(Error::Config(
                "fixed classifier requires at least one probability".to_string(),
            ));
        }
        Ok(Self {
            probabilities,
            cursor: Mutex::new(0),
        })
    }
}

impl ImageClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn classify(&self, _image: &DynamicImage) -> Result<(Label, f64)> {
        let mut cursor = self
            .cursor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let probability = self.probabilities[*cursor % self.probabilities.len()];
        *cursor += 1;
        Ok((Label::from_probability(probability), probability))
    }
}
