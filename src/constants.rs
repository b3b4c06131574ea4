pub const MODEL_API_KEY_ENV_NAME: &str = "PROMPTPRESS_MODEL_API_KEY";

pub const REGION_ENV_NAME: &str = "AWS_REGION";

/// Prefix of the per-environment bucket variable, e.g. `S3_BUCKET_BETA`.
pub const BUCKET_ENV_PREFIX: &str = "S3_BUCKET_";

pub const DEFAULT_ENVIRONMENT: &str = "beta";

pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

pub const DEFAULT_MODEL_URL: &str = "anthropic://claude-3-sonnet-20240229";

pub const DEFAULT_MAX_TOKENS: u32 = 2048;

pub const DEFINITION_EXTENSION: &str = "json";

pub const TEMPLATE_EXTENSION: &str = "txt";

/// Variable naming the output page instead of `<stem>_<index>`.
pub const OUTPUT_NAME_KEY: &str = "output_name";

pub(crate) const PROMPT_PREFIX: &str = "Human: ";

pub(crate) const PAGE_STYLE: &str =
    "body { max-width: 800px; margin: 40px auto; padding: 20px; font-family: Arial; }";

pub(crate) const HTML_CONTENT_TYPE: &str = "text/html";
