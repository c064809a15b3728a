use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which classification backend to load. Selected once at startup; an
/// unrecognized value fails before any image is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum ModelType {
    Cnn,
    Vit,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Cnn => f.write_str("cnn"),
            ModelType::Vit => f.write_str("vit"),
        }
    }
}

impl FromStr for ModelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cnn" => Ok(ModelType::Cnn),
            "vit" => Ok(ModelType::Vit),
            other => Err(Error::Config(format!(
                "unknown model type: {other}. Choose 'cnn' or 'vit'"
            ))),
        }
    }
}

/// Compute device for inference. `Auto` prefers an accelerator and falls
/// back to CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Device {
    Cpu,
    Cuda,
    Auto,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Cuda => f.write_str("cuda"),
            Device::Auto => f.write_str("auto"),
        }
    }
}

/// Deployment-time constants. Fixed per process, not runtime-negotiable.
#[derive(Debug, Clone)]
pub struct Config {
    pub cnn_model_path: PathBuf,
    pub vit_model_path: PathBuf,
    pub model_type: ModelType,

    /// Square input edge both backends expect.
    pub image_size: u32,
    pub imagenet_mean: [f32; 3],
    pub imagenet_std: [f32; 3],

    pub pdf_dpi: u32,

    /// Initial page fetch timeout in the CLI path.
    pub page_timeout: Duration,
    /// Per-image download timeout.
    pub image_timeout: Duration,
    /// Uniform timeout in the service path.
    pub service_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cnn_model_path: PathBuf::from("checkpoints/cnn_model.onnx"),
            vit_model_path: PathBuf::from("checkpoints/vit_model.onnx"),
            model_type: ModelType::Cnn,
            image_size: 224,
            imagenet_mean: [0.485, 0.456, 0.406],
            imagenet_std: [0.229, 0.224, 0.225],
            pdf_dpi: 200,
            page_timeout: Duration::from_secs(30),
            image_timeout: Duration::from_secs(10),
            service_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn model_path(&self, model_type: ModelType) -> &PathBuf {
        match model_type {
            ModelType::Cnn => &self.cnn_model_path,
            ModelType::Vit => &self.vit_model_path,
        }
    }
}
