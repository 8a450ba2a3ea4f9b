//! Handlebars rendering for filename and block templates
//!
//! Templates are rendered in strict mode: referencing an attribute the
//! question does not provide is an error rather than an empty string.

use handlebars::{handlebars_helper, no_escape, Handlebars};
use heck::ToSnakeCase;
use once_cell::sync::Lazy;
use serde::Serialize;

handlebars_helper!(pad_with_zero: |value: Json, width: u64| {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!("{:0>width$}", text, width = width as usize)
});
handlebars_helper!(lower: |s: str| s.to_lowercase());
handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(trim: |s: str| s.trim().to_string());
handlebars_helper!(to_underscore: |s: str| s.to_snake_case());

static ENGINE: Lazy<TemplateEngine> = Lazy::new(TemplateEngine::new);

/// Shared template engine with the filename helpers registered
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry.register_helper("pad_with_zero", Box::new(pad_with_zero));
        registry.register_helper("lower", Box::new(lower));
        registry.register_helper("upper", Box::new(upper));
        registry.register_helper("trim", Box::new(trim));
        registry.register_helper("to_underscore", Box::new(to_underscore));
        Self { registry }
    }

    /// Process-wide engine
    pub fn global() -> &'static TemplateEngine {
        &ENGINE
    }

    /// Render `template` against `data`, returning the error message on failure
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, String> {
        self.registry
            .render_template(template, data)
            .map_err(|e| e.to_string())
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
