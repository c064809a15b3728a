use crate::backends::sigmoid;
use crate::preprocess::preprocess;
use crate::ImageClassifier;
use image::DynamicImage;
use mic_core::{Config, Device, Error, Label, ModelType, Result};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// ONNX-backed binary classifier. Both supported checkpoints (the
/// ResNet18-derived CNN and the small-patch ViT) emit a single logit, so
/// one session wrapper covers both; they differ only in checkpoint path.
pub struct OnnxClassifier {
    backend: ModelType,
    // ort's Session::run takes &mut self.
    session: Mutex<Session>,
    input_size: u32,
}

impl OnnxClassifier {
    pub fn load(
        backend: ModelType,
        path: &Path,
        device: Device,
        config: &Config,
    ) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "model checkpoint not found: {}",
                path.display()
            )));
        }

        let _ = ort::init().with_name("mic").commit();

        let builder = Session::builder()
            .map_err(|e| Error::Inference(format!("failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| Error::Inference(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(4)
            .map_err(|e| Error::Inference(format!("failed to set intra threads: {e}")))?;

        let providers = match device {
            Device::Cpu => vec![CPUExecutionProvider::default().build()],
            Device::Cuda => vec![CUDAExecutionProvider::default().build()],
            Device::Auto => vec![
                CUDAExecutionProvider::default().build(),
                CPUExecutionProvider::default().build(),
            ],
        };
        let builder = builder
            .with_execution_providers(providers)
            .map_err(|e| Error::Inference(format!("failed to register execution providers: {e}")))?;

        let session = builder
            .commit_from_file(path)
            .map_err(|e| Error::Inference(format!("failed to load ONNX model: {e}")))?;

        debug!("Loaded {} session from {}", backend, path.display());
        Ok(Self {
            backend,
            session: Mutex::new(session),
            input_size: config.image_size,
        })
    }
}

impl ImageClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        match self.backend {
            ModelType::Cnn => "cnn",
            ModelType::Vit => "vit",
        }
    }

    fn classify(&self, image: &DynamicImage) -> Result<(Label, f64)> {
        let tensor = preprocess(image, self.input_size);

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("classifier session lock poisoned".to_string()))?;

        let input_name = session.inputs()[0].name().to_string();
        let input_tensor = Value::from_array(tensor)
            .map_err(|e| Error::Inference(format!("failed to create input tensor: {e}")))?;

        let outputs = session
            .run(ort::inputs![input_name.as_str() => input_tensor])
            .map_err(|e| Error::Inference(format!("inference failed: {e}")))?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::Inference("model produced no outputs".to_string()))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(format!("failed to extract output tensor: {e}")))?;
        let logit = data
            .first()
            .copied()
            .ok_or_else(|| Error::Inference("model output tensor is empty".to_string()))?;

        let probability = sigmoid(logit as f64);
        Ok((Label::from_probability(probability), probability))
    }
}
