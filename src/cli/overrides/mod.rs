//! Override commands - one-shot operations against the configured store

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{GenerationParams, OverridePatch};
use crate::infrastructure::logging;
use crate::infrastructure::services::ModelKit;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Feature identifier
    pub feature_id: String,

    /// Model ID to use when neither an override nor a definition exists
    #[arg(long)]
    pub fallback: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Feature identifier
    pub feature_id: String,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Feature identifier
    pub feature_id: String,

    /// Model ID; may be omitted for registered features
    #[arg(long)]
    pub model_id: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub top_p: Option<f64>,

    #[arg(long)]
    pub top_k: Option<u32>,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Feature identifier
    pub feature_id: String,
}

impl SetArgs {
    fn into_patch(self) -> OverridePatch {
        OverridePatch {
            model_id: self.model_id,
            params: GenerationParams {
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                top_p: self.top_p,
                top_k: self.top_k,
            },
        }
    }
}

async fn load_model_kit() -> anyhow::Result<ModelKit> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&logging_config(&config));

    crate::create_model_kit(&config).await
}

/// Command output goes to stdout, so logs go to stderr
fn logging_config(config: &AppConfig) -> logging::LoggingConfig {
    logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
        debug: config.logging.debug,
        stderr: true,
    }
}

pub async fn resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let model_kit = load_model_kit().await?;

    let model_id = match args.fallback.as_deref() {
        Some(fallback) => model_kit.get_model_or(&args.feature_id, fallback).await?,
        None => model_kit.get_model(&args.feature_id).await?,
    };

    println!("{}", model_id);
    Ok(())
}

pub async fn list() -> anyhow::Result<()> {
    let model_kit = load_model_kit().await?;
    let overrides = model_kit.list_overrides().await?;

    println!("{}", serde_json::to_string_pretty(&overrides)?);
    Ok(())
}

pub async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let model_kit = load_model_kit().await?;
    let config = model_kit.get_config(&args.feature_id).await?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub async fn set(args: SetArgs) -> anyhow::Result<()> {
    let model_kit = load_model_kit().await?;
    let feature_id = args.feature_id.clone();

    model_kit.set_override(&feature_id, args.into_patch()).await?;

    println!("Override set for '{}'", feature_id);
    Ok(())
}

pub async fn clear(args: ClearArgs) -> anyhow::Result<()> {
    let model_kit = load_model_kit().await?;
    model_kit.clear_override(&args.feature_id).await?;

    println!("Override cleared for '{}'", args.feature_id);
    Ok(())
}
