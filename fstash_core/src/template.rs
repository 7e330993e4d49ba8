//! Template rendering applied while expanding a stash.
//!
//! A restored file is rendered when the template data has an entry for its
//! base name without extension (`file2.txt` is looked up as `file2`). The
//! entry's values fill `{{ .Key }}` placeholders; a placeholder naming a
//! missing key is an error. Files without an entry are copied untouched.
//!
//! Only `{{ }}` is template syntax. Block and comment tags are moved to
//! delimiters that cannot appear in ordinary text, so `{%`, `{#` and
//! `${#array[@]}` in a rendered file come through verbatim.

use crate::error::{Error, Result};
use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Values for one template file.
pub type TemplateVars = BTreeMap<String, String>;

/// Matches the opening of a `{{ .Key }}` placeholder.
static DOT_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(-?)\s*\.").expect("valid placeholder pattern"));

/// Variable tags keep `{{ }}`; block and comment tags use private-use
/// code points.
static STASH_SYNTAX: LazyLock<SyntaxConfig> = LazyLock::new(|| {
    SyntaxConfig::builder()
        .block_delimiters("\u{F8F0}%", "%\u{F8F0}")
        .comment_delimiters("\u{F8F0}#", "#\u{F8F0}")
        .build()
        .expect("valid template delimiters")
});

/// Template values keyed by file base name (without extension).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateData(BTreeMap<String, TemplateVars>);

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values for files whose base name is `key`.
    pub fn insert(&mut self, key: impl Into<String>, vars: TemplateVars) -> Option<TemplateVars> {
        self.0.insert(key.into(), vars)
    }

    pub fn get(&self, key: &str) -> Option<&TemplateVars> {
        self.0.get(key)
    }

    /// Values for a restored file, looked up by [`template_key`].
    pub fn for_file(&self, file_name: &str) -> Option<&TemplateVars> {
        self.get(template_key(file_name))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<BTreeMap<String, TemplateVars>> for TemplateData {
    fn from(map: BTreeMap<String, TemplateVars>) -> Self {
        TemplateData(map)
    }
}

impl<K: Into<String>> FromIterator<(K, TemplateVars)> for TemplateData {
    fn from_iter<I: IntoIterator<Item = (K, TemplateVars)>>(iter: I) -> Self {
        TemplateData(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The lookup key for a file: its name without the last extension.
pub fn template_key(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

/// Renders stash files as templates.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_syntax(STASH_SYNTAX.clone());
        // Undefined keys are errors, not empty strings
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // Stash files are arbitrary text, not HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        Self { env }
    }

    /// Render `source` with `vars`.
    ///
    /// Both `{{ .Key }}` and `{{ Key }}` placeholders are accepted.
    pub fn render(&self, file_name: &str, source: &[u8], vars: &TemplateVars) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(source)
            .map_err(|e| Error::template(file_name, format!("not valid UTF-8: {}", e)))?;
        let text = strip_placeholder_dots(text);

        let rendered = self
            .env
            .render_str(&text, vars)
            .map_err(|e| Error::template(file_name, e.to_string()))?;

        Ok(rendered.into_bytes())
    }

    /// Render `bytes` if `data` has an entry for `file_name`, otherwise
    /// return them unchanged.
    pub fn apply(&self, data: &TemplateData, file_name: &str, bytes: Vec<u8>) -> Result<Vec<u8>> {
        match data.for_file(file_name) {
            Some(vars) => {
                tracing::debug!(file = file_name, "rendering template");
                self.render(file_name, &bytes, vars)
            }
            None => Ok(bytes),
        }
    }
}

fn strip_placeholder_dots(text: &str) -> Cow<'_, str> {
    DOT_PLACEHOLDER.replace_all(text, "{{${1} ")
}
