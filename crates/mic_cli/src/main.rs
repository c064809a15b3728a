use clap::{ArgGroup, Parser};
use mic_core::{label_counts, ClassificationResult, Config, Device, ModelType, Result, RunRecorder};
use mic_sources::PageScraper;
use std::path::{Path, PathBuf};
use tracing::info;

mod pipeline;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Medical Image Classifier - Classify images from PDFs or URLs"
)]
#[command(group(ArgGroup::new("input").required(true).args(["pdf", "url"])))]
struct Cli {
    /// Path to PDF file with images.
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Website URL containing images.
    #[arg(long)]
    url: Option<String>,

    /// Model type to use (overrides the configured default).
    #[arg(long, value_enum)]
    model_type: Option<ModelType>,

    /// Device to use for inference.
    #[arg(long, value_enum, default_value_t = Device::Auto)]
    device: Device,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = Config::default();

    info!("🔧 Using device: {}", cli.device);

    let classifier = match mic_model::create_classifier(&config, cli.model_type, cli.device) {
        Ok(classifier) => {
            info!("✅ Model loaded successfully ({})", classifier.name());
            classifier
        }
        Err(e) => {
            eprintln!("❌ Error loading model: {e}");
            return Ok(());
        }
    };

    let recorder = RunRecorder::create(Path::new("."))?;

    let run = match (&cli.pdf, &cli.url) {
        (Some(pdf), None) => {
            pipeline::process_pdf(pdf, classifier.as_ref(), &recorder, config.pdf_dpi).await
        }
        (None, Some(url)) => {
            let scraper = PageScraper::new(config.page_timeout, config.image_timeout)?;
            pipeline::process_url(url, classifier.as_ref(), &scraper, &recorder).await
        }
        // clap's arg group guarantees exactly one input.
        _ => unreachable!(),
    };

    match run {
        Ok(results) => print_summary(&results, &recorder),
        Err(e) => eprintln!("❌ Error processing input: {e}"),
    }
    Ok(())
}

fn print_summary(results: &[ClassificationResult], recorder: &RunRecorder) {
    if results.is_empty() {
        println!("\n❌ No items were processed");
        return;
    }

    let total = results.len();
    let (medical, non_medical) = label_counts(results);

    println!("\n🎉 Processing Complete!");
    println!("📊 Final Summary:");
    println!("   Total processed: {total}");
    println!(
        "   Medical: {} ({:.1}%)",
        medical,
        medical as f64 / total as f64 * 100.0
    );
    println!(
        "   Non-medical: {} ({:.1}%)",
        non_medical,
        non_medical as f64 / total as f64 * 100.0
    );
    println!("   Results saved in: {}", recorder.root().display());
}
