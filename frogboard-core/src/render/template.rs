//! Template binding
//!
//! Templates are HTML with `{{ name }}` placeholders. A trailing `?`
//! (`{{ name? }}`) marks a slot optional; it renders as nothing when unbound.
//! Every other slot must be bound or rendering fails.
//!
//! Slot values are typed: [`Slot::Text`] is escaped when bound, [`Slot::Html`]
//! is markup produced by this crate and inserted as-is.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::markup::{escape, Markup};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateBindingError {
    #[error("template '{template}' requires variable '{variable}'")]
    MissingVariable { template: String, variable: String },

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("invalid syntax in template '{template}': {reason}")]
    InvalidSyntax {
        template: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, TemplateBindingError>;

/// A value bound to a template slot
#[derive(Debug, Clone)]
pub enum Slot {
    /// Plain text, escaped on output
    Text(String),
    /// Trusted markup
    Html(Markup),
}

#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    slots: HashMap<String, Slot>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, slot: Slot) {
        self.slots.insert(key.into(), slot);
    }

    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Slot::Text(value.into()));
        self
    }

    pub fn html(mut self, key: impl Into<String>, value: Markup) -> Self {
        self.insert(key, Slot::Html(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }
}

enum Part<'a> {
    Literal(&'a str),
    Slot { name: &'a str, optional: bool },
}

#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Bind `context` into the template.
    pub fn render(&self, context: &TemplateContext) -> Result<Markup> {
        let mut out = String::with_capacity(self.source.len());

        for part in self.parse()? {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Slot { name, optional } => match context.get(name) {
                    Some(Slot::Text(text)) => out.push_str(&escape(text)),
                    Some(Slot::Html(markup)) => out.push_str(markup.as_str()),
                    None if optional => {}
                    None => {
                        return Err(TemplateBindingError::MissingVariable {
                            template: self.name.clone(),
                            variable: name.to_owned(),
                        })
                    }
                },
            }
        }

        Ok(Markup::trusted(out))
    }

    /// Slot names in order of appearance, each with whether it is optional.
    pub fn variables(&self) -> Result<Vec<(&str, bool)>> {
        Ok(self
            .parse()?
            .into_iter()
            .filter_map(|part| match part {
                Part::Slot { name, optional } => Some((name, optional)),
                Part::Literal(_) => None,
            })
            .collect())
    }

    fn parse(&self) -> Result<Vec<Part<'_>>> {
        let mut parts = Vec::new();
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find("{{") {
            parts.push(Part::Literal(&rest[..open]));
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| self.syntax("unclosed {{ delimiter"))?;

            let raw = after[..close].trim();
            let (name, optional) = match raw.strip_suffix('?') {
                Some(stripped) => (stripped.trim_end(), true),
                None => (raw, false),
            };

            if name.is_empty() {
                return Err(self.syntax("empty placeholder"));
            }

            parts.push(Part::Slot { name, optional });
            rest = &after[close + 2..];
        }

        parts.push(Part::Literal(rest));
        Ok(parts)
    }

    fn syntax(&self, reason: &'static str) -> TemplateBindingError {
        TemplateBindingError::InvalidSyntax {
            template: self.name.clone(),
            reason,
        }
    }
}

/// A template file compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedTemplate {
    /// Path relative to the templates directory, e.g. `required/base.tmpl.html`
    pub path: &'static str,
    pub name: &'static str,
    pub source: &'static str,
}

macro_rules! embed {
    ($path:literal, $name:literal) => {
        EmbeddedTemplate {
            path: $path,
            name: $name,
            source: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $path)),
        }
    };
}

/// Templates shipped with the crate. `required/` holds the layout and the
/// post fragment every page uses.
pub const BUILTIN_TEMPLATES: &[EmbeddedTemplate] = &[
    embed!("required/base.tmpl.html", "base"),
    embed!("required/post.tmpl.html", "post"),
    embed!("feed.tmpl.html", "feed"),
    embed!("index.tmpl.html", "index"),
    embed!("board.tmpl.html", "board"),
    embed!("preview.tmpl.html", "preview"),
    embed!("thread.tmpl.html", "thread"),
    embed!("banned.tmpl.html", "banned"),
];

/// Named templates
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Registry holding [`BUILTIN_TEMPLATES`].
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for embedded in BUILTIN_TEMPLATES {
            registry.register(Template::new(embedded.name, embedded.source));
        }
        registry
    }

    /// Add or replace a template.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<Markup> {
        self.get(name)
            .ok_or_else(|| TemplateBindingError::NotFound(name.to_owned()))?
            .render(context)
    }

    /// Template names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for EmbeddedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}
