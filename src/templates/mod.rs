//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary so rendering never touches the
//! filesystem.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded post templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is applied per value with `html_escape`; section bodies
        // are already HTML
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("space/layout.html")),
            ("post.html", include_str!("space/post.html")),
            ("loading.html", include_str!("space/loading.html")),
            ("not_found.html", include_str!("space/not_found.html")),
            // Partials
            (
                "partials/icon_calendar.html",
                include_str!("space/partials/icon_calendar.html"),
            ),
            (
                "partials/icon_user.html",
                include_str!("space/partials/icon_user.html"),
            ),
            (
                "partials/icon_clock.html",
                include_str!("space/partials/icon_clock.html"),
            ),
        ])?;

        tera.register_filter("html_escape", html_escape_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape HTML special characters, leaving `/` intact so
/// URLs stay readable
fn html_escape_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("html_escape", "value", String, value);
    Ok(tera::Value::String(html_escape(&s)))
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
