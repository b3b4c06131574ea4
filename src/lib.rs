//! The promptpress library renders prompt templates with sets of variables,
//! sends them to an LLM model and publishes the answers as static HTML pages.

pub mod constants;
pub mod definition;
pub mod deploy;
pub mod generate;
pub mod page;
pub mod publish;
pub mod render;
pub mod settings;

pub use deploy::{DeployOptions, DeployReport, deploy};
pub use generate::{ModelFactory, ModelSpec, generate_page_text};
pub use publish::{DirectoryPublisher, Publisher, S3Publisher};
pub use render::render_template;
pub use settings::Settings;
