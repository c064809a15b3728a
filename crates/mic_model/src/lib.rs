use image::DynamicImage;
use mic_core::{Config, Device, Label, ModelType, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;
pub mod preprocess;

pub use backends::dummy::FixedClassifier;
pub use backends::onnx::OnnxClassifier;

/// A loaded, ready-for-inference binary classifier. Loaded once per
/// process and shared read-only across all classifications.
pub trait ImageClassifier: Send + Sync {
    /// Short backend name ("cnn", "vit", ...).
    fn name(&self) -> &str;

    /// One forward pass; probability is the sigmoid of the single output
    /// logit, label is the 0.5 threshold over it.
    fn classify(&self, image: &DynamicImage) -> Result<(Label, f64)>;
}

/// Builds the configured backend. Selection happens exactly once, before
/// any image is processed; a missing checkpoint fails here.
pub fn create_classifier(
    config: &Config,
    model_type: Option<ModelType>,
    device: Device,
) -> Result<Arc<dyn ImageClassifier>> {
    let model_type = model_type.unwrap_or(config.model_type);
    let path = config.model_path(model_type);
    info!("🤖 Loading {} model from: {}", model_type, path.display());
    let classifier = OnnxClassifier::load(model_type, path, device, config)?;
    Ok(Arc::new(classifier))
}

pub mod prelude {
    pub use crate::{create_classifier, ImageClassifier};
    pub use mic_core::{Config, Device, Label, ModelType, Result};
}
