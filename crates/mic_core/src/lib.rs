pub mod config;
pub mod error;
pub mod output;
pub mod types;

pub use config::{Config, Device, ModelType};
pub use error::Error;
pub use output::RunRecorder;
pub use types::{label_counts, ClassificationResult, ImageOrigin, Label};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::config::{Config, Device, ModelType};
    pub use crate::types::{ClassificationResult, ImageOrigin, Label};
    pub use crate::{Error, Result};
}
