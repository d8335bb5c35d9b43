//! Pre-loaded handlebars template rendering for the HTML representation of
//! the stream collection.

use handlebars::Handlebars;

use crate::error::{AppError, Result};
use crate::models::StreamCollection;

const STREAMERS_TEMPLATE: &str = "streamers";

/// Template registry loaded once at startup. A missing or invalid template
/// file is a startup error, not a per-request one.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Register the streamers template from a file path.
    pub fn from_file(path: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_file(STREAMERS_TEMPLATE, path)
            .map_err(|e| {
                AppError::TemplateError(format!(
                    "Failed to register streamers template from {}: {}",
                    path, e
                ))
            })?;
        Ok(Self { handlebars })
    }

    /// Register the streamers template from an in-memory string.
    pub fn from_template_str(source: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(STREAMERS_TEMPLATE, source)
            .map_err(|e| {
                AppError::TemplateError(format!("Failed to register streamers template: {}", e))
            })?;
        Ok(Self { handlebars })
    }

    /// Render the collection through the registered template.
    pub fn render(&self, collection: &StreamCollection) -> Result<String> {
        self.handlebars
            .render(STREAMERS_TEMPLATE, collection)
            .map_err(|e| AppError::TemplateError(format!("Template execution failed: {}", e)))
    }
}
