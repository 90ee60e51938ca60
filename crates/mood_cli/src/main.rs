use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mood_inference::{create_model, emotion_labels, load_labels, parse_input_size, preprocess, Backend, Config};
use mood_web::handlers::{DetectionResponse, ModelInfoResponse};
use mood_web::{AppState, ServerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Facial emotion recognition over HTTP", long_about = None)]
pub struct Cli {
    /// Path to the ONNX model artifact
    #[arg(long, env = "MOOD_MODEL_PATH", default_value = mood_inference::DEFAULT_MODEL_PATH)]
    model_path: PathBuf,
    #[arg(long, env = "MOOD_BACKEND", value_enum, default_value_t = Backend::Onnx)]
    backend: Backend,
    /// Comma separated class labels, in model output order
    #[arg(long, env = "MOOD_LABELS", value_delimiter = ',')]
    labels: Option<Vec<String>>,
    /// File with one label per line; takes precedence over --labels
    #[arg(long, env = "MOOD_LABELS_FILE")]
    labels_file: Option<PathBuf>,
    /// Preprocessing size as HEIGHTxWIDTH, overriding the model's declared size
    #[arg(long, env = "MOOD_INPUT_SIZE", value_parser = parse_input_size)]
    input_size: Option<(u32, u32)>,
    #[arg(long, env = "MOOD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "MOOD_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "MOOD_PORT", default_value_t = 8000)]
        port: u16,
        /// Directory served under /static
        #[arg(long, env = "MOOD_STATIC_DIR", default_value = "static")]
        static_dir: PathBuf,
        /// Maximum request body size in bytes
        #[arg(long, env = "MOOD_MAX_BODY_SIZE", default_value_t = 10 * 1024 * 1024)]
        max_body_size: usize,
    },
    /// Classify one image file and print the ranking as JSON
    Predict { image: PathBuf },
    /// Print the model's input shape and labels
    Info,
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn inference_config(cli: &Cli) -> anyhow::Result<Config> {
    let labels = match (&cli.labels_file, &cli.labels) {
        (Some(path), _) => load_labels(path)
            .with_context(|| format!("reading labels from {}", path.display()))?,
        (None, Some(labels)) => labels.clone(),
        (None, None) => emotion_labels(),
    };

    Ok(Config {
        backend: cli.backend,
        model_path: cli.model_path.clone(),
        labels: Some(labels),
        input_size: cli.input_size,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);
    let config = inference_config(&cli)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
            max_body_size,
        } => {
            let model = match create_model(&config) {
                Ok(model) => {
                    info!("🧠 Inference model initialized (using {})", model.name());
                    Some(model)
                }
                Err(e) => {
                    error!(error = %e, "Failed to load model, inference endpoints disabled");
                    None
                }
            };
            let server = ServerConfig {
                host,
                port,
                static_dir,
                max_body_size,
            };
            mood_web::serve(AppState::new(model), server).await?;
        }
        Commands::Predict { image } => {
            let model = create_model(&config)?;
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("reading {}", image.display()))?;
            let decoded = mood_web::decode::decode_image(&bytes)?;
            let tensor = preprocess(&decoded, model.target_size()?);
            let results = model.predict(tensor.into_dyn()).await?;
            let response = DetectionResponse {
                success: true,
                results,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Info => {
            let info = match create_model(&config) {
                Ok(model) => Some(model.info()),
                Err(e) => {
                    error!(error = %e, "Failed to load model");
                    None
                }
            };
            let response = ModelInfoResponse {
                model_loaded: info.is_some(),
                info,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
