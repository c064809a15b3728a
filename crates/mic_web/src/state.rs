use mic_core::RunRecorder;
use mic_model::ImageClassifier;
use mic_sources::PageScraper;
use std::sync::Arc;

pub struct AppState {
    /// `None` when the startup model load failed; the service stays up and
    /// reports it through `/api/health`.
    pub classifier: Option<Arc<dyn ImageClassifier>>,
    pub scraper: PageScraper,
    /// When set, classified images are also persisted like the CLI path.
    pub recorder: Option<RunRecorder>,
}
