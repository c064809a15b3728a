use crate::types::Label;
use crate::Result;
use chrono::Local;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Per-run output directory. Both label subdirectories are created up
/// front so an all-medical run still leaves an empty `non-medical/`.
#[derive(Debug, Clone)]
pub struct RunRecorder {
    root: PathBuf,
}

impl RunRecorder {
    /// Creates `classification_output_<YYYYMMDD_HHMMSS>/{medical,non-medical}/`
    /// under `base` before any classification begins.
    pub fn create(base: &Path) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let root = base.join(format!("classification_output_{timestamp}"));
        for label in [Label::Medical, Label::NonMedical] {
            fs::create_dir_all(root.join(label.as_str()))?;
        }
        info!("📁 Output directory: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the image under the label-named subdirectory and returns the
    /// full path.
    pub fn save(&self, image: &DynamicImage, label: Label, filename: &str) -> Result<PathBuf> {
        let path = self.root.join(label.as_str()).join(filename);
        image.save(&path)?;
        Ok(path)
    }
}

/// `pdf_page_001_medical_0.90.png`
pub fn pdf_filename(page: u32, label: Label, probability: f64) -> String {
    format!("pdf_page_{page:03}_{label}_{probability:.2}.png")
}

/// `url_img_001_non-medical_0.30.png`
pub fn url_filename(index: u32, label: Label, probability: f64) -> String {
    format!("url_img_{index:03}_{label}_{probability:.2}.png")
}
