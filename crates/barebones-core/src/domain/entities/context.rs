//! Render context and placeholder substitution.
//!
//! Templates reference variables as `{{name}}` (whitespace inside the braces
//! is allowed). Rendering is strict: a placeholder naming a variable that is
//! not in the context is an error, never left behind in the output.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};
use regex::{Captures, Regex};

use crate::domain::error::DomainError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
});

/// Context for template rendering.
///
/// A **Value Object** mapping variable names to values. Built-in variables
/// derived by [`RenderContext::for_app`]:
///
/// | Variable | Example |
/// |----------|---------|
/// | `app_name` | "Demo App" |
/// | `app_name_parameterized` | "demo-app" |
/// | `app_name_underscored` | "demo_app" |
/// | `app_const` | "DemoApp" |
///
/// A `BTreeMap` keeps iteration stable, so listing a context is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with the application name in every casing templates use.
    pub fn for_app(app_name: impl Into<String>) -> Self {
        let name = app_name.into();
        Self::new()
            .with_variable("app_name_parameterized", name.to_kebab_case())
            .with_variable("app_name_underscored", name.to_snake_case())
            .with_variable("app_const", name.to_upper_camel_case())
            .with_variable("app_name", name)
    }

    /// Add a variable, consuming self and returning the extended context.
    ///
    /// Later values override earlier ones, including built-ins.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Insert a variable in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Get a variable value if it exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Iterate variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render `source` (the raw text of `template`) by replacing every
    /// placeholder.
    ///
    /// Single pass: substituted values are never scanned again, so a value
    /// that itself looks like `{{x}}` is emitted verbatim.
    ///
    /// # Errors
    /// [`DomainError::MissingContextKey`] for the first placeholder whose
    /// variable is absent.
    pub fn render(&self, template: &str, source: &str) -> Result<String, DomainError> {
        if let Some(key) = self.first_missing(source) {
            return Err(DomainError::MissingContextKey {
                template: template.to_string(),
                key,
            });
        }

        let rendered = PLACEHOLDER.replace_all(source, |caps: &Captures<'_>| {
            // Presence was checked above.
            self.get(&caps[1]).unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }

    fn first_missing(&self, source: &str) -> Option<String> {
        PLACEHOLDER
            .captures_iter(source)
            .map(|caps| caps[1].to_string())
            .find(|key| !self.variables.contains_key(key))
    }
}
