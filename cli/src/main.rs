mod http;
mod report;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use client::{ClientConfig, ConfigRegistry, FileMeta, Outcome, Session, Upload, policy_for};
use http::HttpBackend;
use serde::Serialize;
use shared::{ConfigId, Disease, ModelId};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

/// Command-line client for the chest X-ray classification service
#[derive(Parser, Debug)]
#[command(name = "xray-client")]
#[command(version)]
struct Args {
    /// Base URL of the inference service
    #[arg(long, env = "API_BASE_URL")]
    api_url: Option<String>,

    /// YAML catalog replacing the built-in configurations and models
    #[arg(long, env = "CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Behaviour when the service is unreachable: surface or synthetic
    #[arg(long, env = "UNAVAILABLE_BACKEND")]
    unavailable_backend: Option<String>,

    /// Seconds before a request to the service is abandoned
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = http::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one radiograph
    Predict {
        image: PathBuf,
        /// Configuration id; defaults to the first in the catalog
        #[arg(short, long)]
        config: Option<String>,
        /// Model id; defaults to the configuration's first model
        #[arg(short, long)]
        model: Option<String>,
        /// Per-disease override, e.g. `Edema=0.5`
        #[arg(short, long = "threshold")]
        thresholds: Vec<String>,
    },
    /// Service health
    Health,
    /// Trained models per configuration, as reported by the service
    Models,
    /// Configuration parameters, as reported by the service
    Configs,
    /// Which model/config combinations are ready for inference
    Status,
    /// Which configurations each model was trained under
    Compatibility,
    /// Unload the models cached by the service
    ClearCache,
    /// Print the local catalog
    Catalog,
}

fn load_registry(path: Option<&Path>) -> Result<ConfigRegistry> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog {}", path.display()))?;
            let registry = ConfigRegistry::from_yaml_str(&source)?;
            log::info!("Loaded catalog from {}", path.display());
            Ok(registry)
        }
        None => Ok(ConfigRegistry::reference()),
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn parse_threshold_arg(arg: &str) -> Result<(Disease, &str)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Threshold '{}' must look like Disease=value", arg))?;
    let disease = Disease::from_str(name.trim()).map_err(|_| anyhow!("Unknown disease '{}'", name))?;
    Ok((disease, value))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn predict(
    backend: &HttpBackend,
    mut session: Session<()>,
    image: &Path,
    config: Option<String>,
    model: Option<String>,
    thresholds: &[String],
) -> Result<()> {
    if let Some(config) = config {
        let config = ConfigId::new(config);
        if session.registry().config(&config).is_none() {
            bail!("Unknown config '{}'", config);
        }
        session.select_config(config);
    }
    if let Some(model) = model {
        let model = ModelId::new(model);
        let config = session.selection().config().clone();
        if !session.registry().is_compatible(&model, &config) {
            let offered: Vec<String> = session
                .registry()
                .models_for(&config)
                .iter()
                .map(|m| m.id.to_string())
                .collect();
            bail!("Model '{}' is not offered by {}. Choose one of: {}", model, config, offered.join(", "));
        }
        session.select_model(model);
    }
    for arg in thresholds {
        let (disease, value) = parse_threshold_arg(arg)?;
        session.set_threshold(disease, value);
    }

    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let size = std::fs::metadata(image)
        .with_context(|| format!("Failed to stat {}", image.display()))?
        .len();
    let meta = FileMeta {
        name: name.clone(),
        mime: mime_for(image).to_string(),
        size,
    };
    session.check_file(&meta)?;

    let bytes = std::fs::read(image).with_context(|| format!("Failed to read {}", image.display()))?;
    session.upload_image(Upload::new(name, meta.mime, bytes), |_| ())?;

    match session.run(backend).await {
        Some(Outcome::Failed) | None => {
            bail!(session.error().unwrap_or_else(|| "Prediction did not complete".to_string()))
        }
        Some(_) => {
            if let Some(error) = session.error() {
                log::warn!("{}", error);
            }
            let classification = session
                .classification()
                .ok_or_else(|| anyhow!("Prediction produced no results"))?;
            report::print_classification(&classification, session.meta(), session.is_synthetic());
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    let config = ClientConfig::new(args.api_url.as_deref(), args.unavailable_backend.as_deref());
    log::info!("Using inference service at {}", config.api_base_url);

    let registry = Rc::new(load_registry(args.catalog.as_deref())?);
    let backend = HttpBackend::new(config.clone(), Duration::from_secs(args.timeout))?;

    match args.command {
        Command::Predict {
            image,
            config: config_id,
            model,
            thresholds,
        } => {
            let fallback = policy_for(config.unavailable_backend, rand::random());
            let session = Session::new(registry, fallback);
            predict(&backend, session, &image, config_id, model, &thresholds).await
        }
        Command::Health => print_json(&backend.health().await?),
        Command::Models => print_json(&backend.models().await?),
        Command::Configs => print_json(&backend.configs().await?),
        Command::Status => print_json(&backend.implementation_status().await?),
        Command::Compatibility => print_json(&backend.compatibility().await?),
        Command::ClearCache => {
            let reply = backend.clear_cache().await?;
            log::info!("{}", reply.message);
            Ok(())
        }
        Command::Catalog => {
            report::print_catalog(&registry);
            Ok(())
        }
    }
}
