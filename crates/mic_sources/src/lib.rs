pub mod pdf;
pub mod web;

pub use pdf::rasterize_pdf;
pub use web::{extract_image_urls, resolve_image_url, PageScraper};

pub mod prelude {
    pub use crate::pdf::rasterize_pdf;
    pub use crate::web::PageScraper;
    pub use mic_core::{Error, Result};
}
