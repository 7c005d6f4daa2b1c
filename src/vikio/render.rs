//! Server-side template rendering.
//!
//! Templates are plain HTML files loaded once at startup from the
//! configured directory; there is no runtime reloading. Interpolation is
//! `{{name}}` substitution and every interpolated value is HTML-escaped
//! unconditionally. There is no raw-output escape hatch, so escaping cannot
//! be bypassed by accident.

use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
}

#[derive(Debug)]
pub struct Renderer {
    templates: HashMap<String, String>,
    placeholder: Regex,
}

impl Renderer {
    /// Load every `*.html` file under `dir`. Called once at startup.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be read or a template is
    /// not valid UTF-8.
    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut templates = HashMap::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "html") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    templates.insert(name.to_string(), fs::read_to_string(&path)?);
                }
            }
        }

        Ok(Self::from_templates(templates))
    }

    /// Build a renderer from already-loaded templates. Used by tests.
    #[must_use]
    pub fn from_templates(templates: HashMap<String, String>) -> Self {
        let placeholder = Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}")
            .unwrap_or_else(|_| unreachable!("placeholder pattern is valid"));

        Self {
            templates,
            placeholder,
        }
    }

    /// Render `template` with the given named values.
    ///
    /// Placeholders without a matching value render empty; values without a
    /// matching placeholder are ignored.
    ///
    /// # Errors
    /// Returns [`RenderError::UnknownTemplate`] when `template` was not
    /// loaded at startup.
    pub fn render(&self, template: &str, params: &[(&str, &str)]) -> Result<String, RenderError> {
        let body = self
            .templates
            .get(template)
            .ok_or_else(|| RenderError::UnknownTemplate(template.to_string()))?;

        let rendered = self.placeholder.replace_all(body, |caps: &regex::Captures| {
            let key = &caps[1];
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map_or_else(String::new, |(_, v)| escape_html(v))
        });

        Ok(rendered.into_owned())
    }
}

/// Escape a value for interpolation into HTML text or attributes.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
