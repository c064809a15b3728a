use clap::Parser;
use mic_core::{Config, Device, ModelType, Result, RunRecorder};
use mic_sources::PageScraper;
use mic_web::{create_app, AppState};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Medical image classification HTTP service")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: String,

    /// Model backend override (defaults to the configured model type).
    #[arg(long, value_enum)]
    model_type: Option<ModelType>,

    /// Compute device for inference.
    #[arg(long, value_enum, default_value_t = Device::Auto)]
    device: Device,

    /// Also persist classified images under a per-run directory here, like
    /// the CLI path. Without it the service is response-only.
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = Config::default();

    // A failed load keeps the service up; /api/health reports it.
    let classifier = match mic_model::create_classifier(&config, args.model_type, args.device) {
        Ok(classifier) => {
            info!("✅ Model loaded successfully ({})", classifier.name());
            Some(classifier)
        }
        Err(e) => {
            error!("❌ Failed to load model: {}", e);
            None
        }
    };

    let recorder = match &args.save_dir {
        Some(dir) => Some(RunRecorder::create(dir)?),
        None => None,
    };

    let scraper = PageScraper::new(config.service_timeout, config.service_timeout)?;
    let app = create_app(AppState {
        classifier,
        scraper,
        recorder,
    })
    .await;

    info!("🌐 Listening on {}", args.listen);
    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
