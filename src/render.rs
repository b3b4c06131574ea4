//! Literal placeholder substitution.
//!
//! Keys are applied one at a time in mapping order, each against the output of
//! the previous one, so a value containing `{other}` is itself substituted when
//! `other` comes later. Placeholders without a variable are left as they are.

use serde_json::Value;

use crate::definition::Variables;

/// Replaces every `{key}` in `template` with the string form of its value.
pub fn render_template(template: &str, variables: &Variables) -> String {
    variables
        .iter()
        .fold(template.to_owned(), |prompt, (key, value)| {
            prompt.replace(&placeholder(key), &stringify(value))
        })
}

/// Strings are inserted as is; any other value in its compact JSON form
/// (`true`, `null`, `[1,"a"]`).
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn placeholder(key: &str) -> String {
    format!("{{{key}}}")
}
