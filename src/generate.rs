//! The generate module turns a rendered prompt into page content using an LLM model.

use anyhow::{Context, Result};
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatProvider};
use log::debug;
use rate_guard::{RateLimit, StdTokenBucket, TokenBucketBuilder};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::constants::PROMPT_PREFIX;

/// Builds chat models for a given token ceiling.
pub trait ModelFactory {
    /// Builds a model that answers with at most `max_tokens` tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the model can't be built.
    fn build(&self, max_tokens: u32) -> Result<Box<dyn ChatProvider>>;
}

/// Model selection parsed from a model URL such as `anthropic://claude-3-sonnet-20240229`.
///
/// The scheme names the backend and the host the model. A username part is
/// appended as a tag, so `ollama://latest@llama3` selects `llama3:latest`.
#[derive(Clone, Debug)]
pub struct ModelSpec {
    pub backend: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl ModelSpec {
    /// Parses a model URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, names an unknown backend or no model.
    pub fn parse(model_url: &str, api_key: Option<String>) -> Result<Self> {
        let model_url =
            Url::parse(model_url).map_err(|e| anyhow::anyhow!("Invalid model URL: {}", e))?;

        LLMBackend::from_str(model_url.scheme())
            .map_err(|e| anyhow::anyhow!("Invalid LLM backend: {}", e))?;

        let model = [
            model_url
                .host_str()
                .context("Specify model name as host URL.")?,
            model_url.username(),
        ]
        .iter()
        .filter(|x| !x.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(":");

        Ok(Self {
            backend: model_url.scheme().to_owned(),
            model,
            api_key,
        })
    }
}

impl ModelFactory for ModelSpec {
    fn build(&self, max_tokens: u32) -> Result<Box<dyn ChatProvider>> {
        let llm_builder = LLMBuilder::new()
            .backend(
                LLMBackend::from_str(&self.backend)
                    .map_err(|e| anyhow::anyhow!("Invalid LLM backend: {}", e))?,
            )
            .model(&self.model)
            .max_tokens(max_tokens);

        let llm_builder = match &self.api_key {
            Some(api_key) => llm_builder.api_key(api_key),
            None => llm_builder,
        };

        let model: Box<dyn ChatProvider> = llm_builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build LLM model: {}", e))?;

        Ok(model)
    }
}

/// Shared data for generation calls
pub struct GenerateContext<'a> {
    /// LLM model to call
    pub model: &'a dyn ChatProvider,
    /// Rate limiter for controlling request frequency
    pub rate_limiter: Option<&'a StdTokenBucket>,
}

/// Creates a token bucket admitting `rpm` requests per minute.
///
/// # Errors
///
/// Returns an error if the token bucket can't be built.
pub fn build_rate_limiter(rpm: u32) -> Result<StdTokenBucket> {
    let capacity = u64::from(rpm.max(1));
    let refill_interval = Duration::from_secs_f64(60.0 / capacity as f64);

    TokenBucketBuilder::builder()
        .capacity(capacity)
        .refill_amount(1_u64)
        .refill_every(refill_interval)
        .with_time(rate_guard::StdTimeSource::new())
        .with_precision::<rate_guard::Nanos>()
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid rate limit of {rpm} requests per minute: {e:?}"))
}

/// Sends `prompt` as a single user message and returns the text of the answer.
///
/// The answer is returned untouched, without trimming.
///
/// # Errors
///
/// Returns an error if:
/// * The LLM chat operation fails
/// * The response carries no text
pub async fn generate_page_text(prompt: &str, ctx: &GenerateContext<'_>) -> Result<String> {
    let messages = vec![
        ChatMessage::user()
            .content(format!("{PROMPT_PREFIX}{prompt}"))
            .build(),
    ];

    if let Some(limiter) = ctx.rate_limiter {
        while limiter.try_acquire(1).is_err() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    debug!("Sending prompt: {prompt}");

    let response = ctx
        .model
        .chat(&messages)
        .await
        .map_err(|err| anyhow::anyhow!("LLM error: {err}."))?;

    response
        .text()
        .context("Malformed LLM response: no text content")
}
