//! The page module wraps generated text into the site's HTML shell and derives
//! where each page is stored.

use crate::constants::{OUTPUT_NAME_KEY, PAGE_STYLE};
use crate::definition::Variables;
use crate::render::stringify;

/// Wraps `content` in the fixed HTML document, titled with `filename`.
/// The content is embedded verbatim.
pub fn assemble_html(content: &str, filename: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{filename}</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body>\n{content}\n</body>\n</html>"
    )
}

/// Base name of the page: the `output_name` variable if present,
/// otherwise `<stem>_<index>`.
pub fn output_name(variables: &Variables, stem: &str, index: usize) -> String {
    variables
        .get(OUTPUT_NAME_KEY)
        .map(stringify)
        .unwrap_or_else(|| format!("{stem}_{index}"))
}

pub fn page_filename(output_name: &str) -> String {
    format!("{output_name}.html")
}

/// Storage key of a page, `<environment>/outputs/<filename>`.
pub fn destination_key(environment: &str, filename: &str) -> String {
    format!("{environment}/outputs/{filename}")
}
