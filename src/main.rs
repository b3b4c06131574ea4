//! promptpress is a CLI tool that generates a small static site with an LLM.
//!
//! Every prompt definition in the prompts directory names a template and one or
//! more variable sets. Each set is rendered into the template, answered by the
//! model, wrapped into an HTML page and uploaded to the bucket of the selected
//! environment under `<environment>/outputs/`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Builder;
use log::{LevelFilter, info};

use promptpress::{
    DeployOptions, DirectoryPublisher, ModelSpec, S3Publisher, Settings,
    constants::{
        DEFAULT_ENVIRONMENT, DEFAULT_MODEL_URL, DEFAULT_PROMPTS_DIR, DEFAULT_TEMPLATES_DIR,
        MODEL_API_KEY_ENV_NAME,
    },
    deploy,
    generate::build_rate_limiter,
};

/// A CLI tool to generate static pages with an LLM and publish them
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Deployment environment, selects the S3_BUCKET_<ENVIRONMENT> bucket
    #[arg(default_value = DEFAULT_ENVIRONMENT)]
    environment: String,

    /// Directory with prompt definitions (*.json)
    #[arg(long, default_value = DEFAULT_PROMPTS_DIR)]
    prompts_dir: PathBuf,

    /// Directory with prompt templates
    #[arg(long, default_value = DEFAULT_TEMPLATES_DIR)]
    templates_dir: PathBuf,

    /// URL of the LLM model to use, as backend://model
    #[arg(long, short, default_value = DEFAULT_MODEL_URL)]
    model: String,

    /// Rate limit: requests per minute (default: no limit)
    #[arg(long, short = 'r')]
    rpm: Option<u32>,

    /// Write pages below this directory instead of uploading them
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", default_value_t = 2)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let settings = Settings::from_env(&cli.environment)?;
    info!(
        "Running {} deployment to {}",
        settings.environment, settings.bucket
    );

    let api_key = match std::env::var(MODEL_API_KEY_ENV_NAME) {
        Ok(model_key) => {
            info!("API key is provided");
            Some(model_key)
        }
        Err(err) => {
            info!("{err} while providing api key");
            None
        }
    };
    let model = ModelSpec::parse(&cli.model, api_key)?;
    let rate_limiter = cli.rpm.map(build_rate_limiter).transpose()?;

    let hosting_url = settings.hosting_url();
    let options = DeployOptions {
        settings,
        prompts_dir: cli.prompts_dir,
        templates_dir: cli.templates_dir,
    };

    let report = match cli.output_dir {
        Some(output_dir) => {
            let publisher = DirectoryPublisher::new(output_dir);
            deploy(&options, &model, &publisher, rate_limiter.as_ref()).await?
        }
        None => {
            let publisher = S3Publisher::new(&options.settings).await;
            deploy(&options, &model, &publisher, rate_limiter.as_ref()).await?
        }
    };

    info!(
        "Published {} pages from {} definitions",
        report.keys.len(),
        report.definitions
    );
    info!("Done!");
    println!("View at: {hosting_url}");

    Ok(())
}
