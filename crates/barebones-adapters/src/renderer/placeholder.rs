//! `{{key}}` substitution renderer.

use tracing::instrument;

use barebones_core::{
    application::ports::TemplateRenderer, domain::RenderContext, error::BarebonesResult,
};

/// Renderer for `{{key}}` placeholders.
///
/// Strict: every placeholder must name a context variable. Substitution is a
/// single pass, so values containing `{{...}}` are emitted verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    #[instrument(skip(self, source, context))]
    fn render(&self, name: &str, source: &str, context: &RenderContext) -> BarebonesResult<String> {
        Ok(context.render(name, source)?)
    }
}
