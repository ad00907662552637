use anyhow::{anyhow, Result};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use handlebars::Handlebars;
use include_dir::{include_dir, Dir};
use serde::Serialize;

static TEMPLATE_DIR: Dir = include_dir!("templates");

/// Renders the lab HTML pages from templates embedded at compile time.
///
/// Templates whose file name starts with `_` are registered as partials
/// under the name without the underscore (`_solved_popup.hbs` becomes the
/// `solved_popup` partial).
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();

        for file in TEMPLATE_DIR.files() {
            let path = file.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("hbs") {
                continue;
            }
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| anyhow!("Unreadable template name: {:?}", path))?;
            let source = std::str::from_utf8(file.contents())
                .map_err(|e| anyhow!("Template {} is not UTF-8: {}", name, e))?;

            if let Some(partial) = name.strip_prefix('_') {
                registry.register_partial(partial, source)?;
            } else {
                registry.register_template_string(name, source)?;
            }
        }

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        Ok(self.registry.render(name, data)?)
    }

    /// Render a page, or log the failure and answer 500.
    pub fn render_response<T: Serialize>(&self, name: &str, data: &T) -> Response {
        match self.render(name, data) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Failed to render {}: {}", name, e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_register() {
        let pages = Pages::new().unwrap();
        let html = pages
            .render("posts_home", &json!({ "title": "GraphQL Security Lab" }))
            .unwrap();
        assert!(html.contains("GraphQL Security Lab"));
    }

    #[test]
    fn test_solved_popup_partial() {
        let pages = Pages::new().unwrap();
        let html = pages
            .render(
                "fields_solved",
                &json!({
                    "title": "Lab Solved",
                    "lab": "Accidental exposure of private GraphQL fields"
                }),
            )
            .unwrap();
        assert!(html.contains("LAB SOLVED!"));
        assert!(html.contains("Accidental exposure of private GraphQL fields"));
    }
}
