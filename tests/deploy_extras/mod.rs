use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use llm::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool},
    error::LLMError,
};
use promptpress::{DeployOptions, ModelFactory, Publisher, Settings};
use tempfile::TempDir;

/// Answers every chat with the same text and remembers what it was asked.
pub(crate) struct StubLlmProvider {
    response_content: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubLlmProvider {
    pub fn new(response_content: Option<String>, prompts: Arc<Mutex<Vec<String>>>) -> Self {
        StubLlmProvider {
            response_content,
            prompts,
        }
    }
}

impl ChatProvider for StubLlmProvider {
    fn chat<'life0, 'life1, 'async_trait>(
        &'life0 self,
        messages: &'life1 [ChatMessage],
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        self.prompts
            .lock()
            .expect("Prompt log mutex poisoned")
            .extend(messages.iter().map(|message| message.content.clone()));

        Box::pin(async move {
            #[derive(Debug)]
            struct StringResponse(Option<String>);

            impl ChatResponse for StringResponse {
                fn text(&self) -> Option<String> {
                    self.0.clone()
                }

                fn tool_calls(&self) -> Option<Vec<llm::ToolCall>> {
                    panic!()
                }

                fn thinking(&self) -> Option<String> {
                    None
                }

                fn usage(&self) -> Option<llm::chat::Usage> {
                    None
                }
            }

            impl std::fmt::Display for StringResponse {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(formatter, "{}", self.0.as_deref().unwrap_or_default())
                }
            }

            Ok(Box::new(StringResponse(self.response_content.clone())) as Box<dyn ChatResponse>)
        })
    }

    fn chat_with_tools<'life0, 'life1, 'life2, 'async_trait>(
        &'life0 self,
        _messages: &'life1 [ChatMessage],
        _tools: Option<&'life2 [Tool]>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        'life2: 'async_trait,
        Self: 'async_trait,
    {
        panic!()
    }
}

/// Hands out [`StubLlmProvider`]s sharing one prompt log.
#[derive(Default)]
pub(crate) struct StubModelFactory {
    response_content: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
    max_tokens: Mutex<Vec<u32>>,
}

impl StubModelFactory {
    pub fn answering(response_content: &str) -> Self {
        StubModelFactory {
            response_content: Some(response_content.to_owned()),
            ..Default::default()
        }
    }

    pub fn without_text() -> Self {
        StubModelFactory::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .expect("Prompt log mutex poisoned")
            .clone()
    }

    pub fn max_tokens(&self) -> Vec<u32> {
        self.max_tokens
            .lock()
            .expect("Token log mutex poisoned")
            .clone()
    }
}

impl ModelFactory for StubModelFactory {
    fn build(&self, max_tokens: u32) -> Result<Box<dyn ChatProvider>> {
        self.max_tokens
            .lock()
            .expect("Token log mutex poisoned")
            .push(max_tokens);

        Ok(Box::new(StubLlmProvider::new(
            self.response_content.clone(),
            Arc::clone(&self.prompts),
        )))
    }
}

/// Keeps published pages in memory, in publishing order.
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    pages: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    pub fn pages(&self) -> Vec<(String, String)> {
        self.pages
            .lock()
            .expect("Publisher mutex poisoned")
            .clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.pages().into_iter().map(|(key, _)| key).collect()
    }
}

impl Publisher for RecordingPublisher {
    async fn publish(&self, key: &str, html: &str) -> Result<()> {
        self.pages
            .lock()
            .expect("Publisher mutex poisoned")
            .push((key.to_owned(), html.to_owned()));
        Ok(())
    }
}

/// Prompts and templates directories inside a temporary site root.
pub(crate) struct SiteFixture {
    root: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir(root.path().join("prompts")).expect("Failed to create prompts dir");
        fs::create_dir(root.path().join("templates")).expect("Failed to create templates dir");
        SiteFixture { root }
    }

    pub fn prompt(&self, name: &str, content: &str) -> &Self {
        fs::write(self.prompts_dir().join(name), content).expect("Failed to write prompt");
        self
    }

    pub fn template(&self, name: &str, content: &str) -> &Self {
        fs::write(self.templates_dir().join(name), content).expect("Failed to write template");
        self
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.path().join("prompts")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.path().join("templates")
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn options(&self, environment: &str) -> DeployOptions {
        DeployOptions {
            settings: Settings {
                environment: environment.to_owned(),
                region: "us-east-1".to_owned(),
                bucket: "pages-bucket".to_owned(),
            },
            prompts_dir: self.prompts_dir(),
            templates_dir: self.templates_dir(),
        }
    }
}
