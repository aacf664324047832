//! Server-rendered HTML pages.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlebars HTML-escapes `{{...}}` output, so product names are safe to
//! render as-is.

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

pub const PRODUCT_LIST: &str = "index";
pub const INVENTORY_REPORT: &str = "report";

const TEMPLATES: [(&str, &str); 2] = [
    (PRODUCT_LIST, include_str!("../../templates/index.hbs")),
    (INVENTORY_REPORT, include_str!("../../templates/report.hbs")),
];

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("template failed to compile: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("template failed to render: {0}")]
    Render(#[from] handlebars::RenderError),
}

pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, ViewError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, ViewError> {
        Ok(self.registry.render(template, data)?)
    }
}
