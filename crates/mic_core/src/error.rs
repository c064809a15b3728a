use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    // Display must stay exactly "Status code {n}": the service returns it
    // verbatim as the 400 body for a non-success page fetch.
    #[error("Status code {0}")]
    Status(u16),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
