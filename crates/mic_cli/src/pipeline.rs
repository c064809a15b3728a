use image::DynamicImage;
use mic_core::output::{pdf_filename, url_filename};
use mic_core::{label_counts, ClassificationResult, ImageOrigin, Result, RunRecorder};
use mic_model::ImageClassifier;
use mic_sources::{extract_image_urls, rasterize_pdf, PageScraper};
use std::path::Path;
use tracing::{info, warn};

/// Rasterizes and classifies every page. An N-page PDF always yields N
/// records in page order.
pub async fn process_pdf(
    path: &Path,
    classifier: &dyn ImageClassifier,
    recorder: &RunRecorder,
    dpi: u32,
) -> Result<Vec<ClassificationResult>> {
    info!("🔍 Processing PDF: {}", path.display());
    let pages = rasterize_pdf(path, dpi).await?;
    classify_pages(&pages, classifier, recorder)
}

/// Classifies pages sequentially. A classification error here aborts the
/// run rather than silently dropping a page.
pub fn classify_pages(
    pages: &[DynamicImage],
    classifier: &dyn ImageClassifier,
    recorder: &RunRecorder,
) -> Result<Vec<ClassificationResult>> {
    let mut results = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let page_number = index as u32 + 1;
        let (label, probability) = classifier.classify(page)?;
        let filename = pdf_filename(page_number, label, probability);
        recorder.save(page, label, &filename)?;
        info!(
            "🧾 Page {}: {} ({:.2}) → {}",
            page_number, label, probability, filename
        );
        results.push(ClassificationResult {
            identifier: page_number,
            source: ImageOrigin::PdfPage(page_number),
            label,
            probability,
            filename,
        });
    }

    let (medical, non_medical) = label_counts(&results);
    info!("📊 PDF Processing Summary:");
    info!("   Total pages: {}", results.len());
    info!("   Medical: {}", medical);
    info!("   Non-medical: {}", non_medical);
    Ok(results)
}

/// Fetches the page, then for each image element: download, classify,
/// save. Any per-item failure is logged and that image is skipped; it
/// never aborts the batch. A page with no usable images returns an empty
/// collection.
pub async fn process_url(
    url: &str,
    classifier: &dyn ImageClassifier,
    scraper: &PageScraper,
    recorder: &RunRecorder,
) -> Result<Vec<ClassificationResult>> {
    info!("🌐 Processing URL: {}", url);
    let html = scraper.fetch_page(url).await?;
    info!("✅ Webpage fetched successfully");

    let candidates = extract_image_urls(&html, url);
    if candidates.is_empty() {
        info!("No images found at URL");
        return Ok(Vec::new());
    }
    let images_found = candidates.len();
    info!("🖼️ Found {} images to process", images_found);

    let mut results = Vec::new();
    for (_, image_url) in candidates {
        let image = match scraper.fetch_image(&image_url).await {
            Ok(image) => image,
            Err(e) => {
                warn!("⚠️ Failed to fetch {}: {}", image_url, e);
                continue;
            }
        };
        let (label, probability) = match classifier.classify(&image) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("⚠️ Failed to classify {}: {}", image_url, e);
                continue;
            }
        };

        let sequence = results.len() as u32 + 1;
        let filename = url_filename(sequence, label, probability);
        if let Err(e) = recorder.save(&image, label, &filename) {
            warn!("⚠️ Failed to save {}: {}", filename, e);
            continue;
        }

        info!(
            "🌍 Image {}: {} ({:.2}) → {}",
            sequence, label, probability, filename
        );
        results.push(ClassificationResult {
            identifier: sequence,
            source: ImageOrigin::Url(image_url),
            label,
            probability,
            filename,
        });
    }

    // Found vs processed is the only surface reporting skipped images.
    let (medical, non_medical) = label_counts(&results);
    info!("📊 URL Processing Summary:");
    info!("   Images found: {}", images_found);
    info!("   Successfully processed: {}", results.len());
    info!("   Medical: {}", medical);
    info!("   Non-medical: {}", non_medical);
    Ok(results)
}
