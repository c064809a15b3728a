use image::DynamicImage;
use mic_core::{Error, Result};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::info;

// pdfium's native page space is 72 points per inch.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Rasterizes every page of the PDF at the given DPI, one image per page
/// in document order. An unreadable document is a run-level failure; a
/// zero-page document returns an empty vec.
///
/// pdfium keeps thread-local state internally, so the work runs on the
/// blocking pool rather than a Tokio worker thread.
pub async fn rasterize_pdf(path: &Path, dpi: u32) -> Result<Vec<DynamicImage>> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || rasterize_blocking(&path, dpi))
        .await
        .map_err(|e| Error::Pdf(format!("render task panicked: {e}")))?
}

pub fn render_scale(dpi: u32) -> f32 {
    dpi as f32 / PDF_POINTS_PER_INCH
}

fn rasterize_blocking(path: &Path, dpi: u32) -> Result<Vec<DynamicImage>> {
    let pdfium = Pdfium::default();
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| Error::Pdf(format!("failed to open {}: {e:?}", path.display())))?;

    let pages = document.pages();
    info!("📄 Extracted {} pages from PDF", pages.len());

    let render_config = PdfRenderConfig::new().scale_page_by_factor(render_scale(dpi));

    let mut images = Vec::with_capacity(pages.len() as usize);
    for (index, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Error::Pdf(format!("rasterization failed for page {}: {e:?}", index + 1))
        })?;
        images.push(bitmap.as_image());
    }
    Ok(images)
}
