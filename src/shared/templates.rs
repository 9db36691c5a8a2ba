//! Template engine for server-rendered pages using Jinja2 syntax.
//!
//! Templates are read lazily from a directory on disk, so editing a template
//! only needs a restart and never a rebuild.

use minijinja::{path_loader, Environment, ErrorKind, Value};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine that loads templates from `template_dir`
    pub fn from_dir(template_dir: &str) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(template_dir));
        tracing::debug!("Template loader rooted at {}", template_dir);
        Self { env }
    }

    /// Create an engine from in-memory templates
    #[cfg(test)]
    pub fn from_sources(templates: &[(&'static str, &'static str)]) -> Self {
        let mut env = Environment::new();
        for &(name, source) in templates {
            env.add_template(name, source)
                .expect("test template should parse");
        }
        Self { env }
    }

    /// Render `template_name` with a serializable context
    pub fn render<S: Serialize>(
        &self,
        template_name: &str,
        ctx: S,
    ) -> Result<String, TemplateError> {
        let template = self.env.get_template(template_name).map_err(|e| {
            if matches!(e.kind(), ErrorKind::TemplateNotFound) {
                TemplateError::NotFound(template_name.to_string())
            } else {
                TemplateError::RenderError(e.to_string())
            }
        })?;

        template
            .render(Value::from_serialize(&ctx))
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }

    /// Check if a template exists
    pub fn template_exists(&self, template_name: &str) -> bool {
        self.env.get_template(template_name).is_ok()
    }
}
