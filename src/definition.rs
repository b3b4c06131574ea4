//! The definition module discovers prompt definition files and loads them
//! together with the templates they reference.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_MAX_TOKENS, DEFINITION_EXTENSION, TEMPLATE_EXTENSION};

/// Placeholder names mapped to their values, in the order they appear in the file.
pub type Variables = Map<String, Value>;

/// A prompt definition read from one JSON file.
#[derive(Debug, Default, Deserialize)]
pub struct PromptDefinition {
    /// File stem the definition was loaded from, used for fallback names
    #[serde(skip)]
    pub stem: String,
    /// Template filename inside the templates directory
    pub template: Option<String>,
    /// Token ceiling for each model call
    pub max_tokens: Option<u32>,
    /// A single variable set
    pub variables: Option<Variables>,
    /// Several variable sets, preferred over `variables` when present
    pub variable_sets: Option<Vec<Variables>>,
}

impl PromptDefinition {
    /// Reads and parses the definition at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or isn't a valid definition.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt definition: {}", path.display()))?;

        let mut definition = Self::parse(&content)
            .with_context(|| format!("Invalid prompt definition: {}", path.display()))?;
        definition.stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(definition)
    }

    /// Parses a definition from JSON text. The stem is left empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` isn't a JSON object of the expected shape.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Template filename, `<stem>.txt` unless named explicitly.
    pub fn template_name(&self) -> String {
        self.template
            .clone()
            .unwrap_or_else(|| format!("{}.{TEMPLATE_EXTENSION}", self.stem))
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Variable sets to render. `variable_sets` wins over `variables`;
    /// with neither, a single empty set is returned.
    pub fn variable_sets(&self) -> Vec<Variables> {
        match (&self.variable_sets, &self.variables) {
            (Some(sets), _) => sets.clone(),
            (None, Some(variables)) => vec![variables.clone()],
            (None, None) => vec![Variables::new()],
        }
    }
}

/// Lists definition files in `dir`, sorted by filename.
///
/// # Errors
///
/// Returns an error if the directory can't be read.
pub fn discover_definitions(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read prompts directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_definition = path.is_file()
            && path
                .extension()
                .is_some_and(|extension| extension == DEFINITION_EXTENSION);
        if is_definition {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

/// Reads the template referenced by `definition` from `templates_dir`.
///
/// # Errors
///
/// Returns an error if the template file doesn't exist or can't be read.
pub fn load_template(templates_dir: &Path, definition: &PromptDefinition) -> Result<String> {
    let path = templates_dir.join(definition.template_name());
    fs::read_to_string(&path)
        .with_context(|| format!("Failed to read template: {}", path.display()))
}
