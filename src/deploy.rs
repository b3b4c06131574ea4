//! The deploy module runs the whole pipeline: every variable set of every prompt
//! definition is rendered, sent to the model, wrapped into a page and published.

use anyhow::Result;
use log::{debug, info};
use rate_guard::StdTokenBucket;
use std::path::{Path, PathBuf};

use crate::definition::{PromptDefinition, discover_definitions, load_template};
use crate::generate::{GenerateContext, ModelFactory, generate_page_text};
use crate::page::{assemble_html, destination_key, output_name, page_filename};
use crate::publish::Publisher;
use crate::render::render_template;
use crate::settings::Settings;

/// Inputs of a deployment run
pub struct DeployOptions {
    /// Resolved deployment settings
    pub settings: Settings,
    /// Directory holding `*.json` prompt definitions
    pub prompts_dir: PathBuf,
    /// Directory holding the templates the definitions reference
    pub templates_dir: PathBuf,
}

/// Summary of a finished run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// Number of definition files processed
    pub definitions: usize,
    /// Keys of the published pages, in publishing order
    pub keys: Vec<String>,
}

/// Processes every prompt definition in `options.prompts_dir` and publishes one
/// page per variable set.
///
/// Processing is sequential and stops at the first error. Pages published
/// before the failure stay in place.
///
/// # Errors
///
/// Returns an error if:
/// * A definition or template can't be read or parsed
/// * The model can't be built or the LLM call fails
/// * Publishing fails
pub async fn deploy<P: Publisher>(
    options: &DeployOptions,
    factory: &dyn ModelFactory,
    publisher: &P,
    rate_limiter: Option<&StdTokenBucket>,
) -> Result<DeployReport> {
    let mut report = DeployReport::default();

    for path in discover_definitions(&options.prompts_dir)? {
        let keys = deploy_definition(options, &path, factory, publisher, rate_limiter).await?;
        report.definitions += 1;
        report.keys.extend(keys);
    }

    Ok(report)
}

/// Publishes the pages of a single definition file and returns their keys.
async fn deploy_definition<P: Publisher>(
    options: &DeployOptions,
    path: &Path,
    factory: &dyn ModelFactory,
    publisher: &P,
    rate_limiter: Option<&StdTokenBucket>,
) -> Result<Vec<String>> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("Processing {file_name}");

    let definition = PromptDefinition::load(path)?;
    let template = load_template(&options.templates_dir, &definition)?;

    let model = factory.build(definition.max_tokens())?;
    let ctx = GenerateContext {
        model: model.as_ref(),
        rate_limiter,
    };

    let mut keys = Vec::new();
    for (index, variables) in definition.variable_sets().iter().enumerate() {
        let prompt = render_template(&template, variables);
        let content = generate_page_text(&prompt, &ctx).await?;

        let filename = page_filename(&output_name(variables, &definition.stem, index));
        let html = assemble_html(&content, &filename);
        let key = destination_key(&options.settings.environment, &filename);

        publisher.publish(&key, &html).await?;
        debug!("Published {key}");
        info!("Created: {filename}");

        keys.push(key);
    }

    Ok(keys)
}
