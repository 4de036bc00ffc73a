//! HTML rendering.
//!
//! Templates are embedded in the binary and auto-escaped by file extension.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::errors::AppError;

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("feed.html", include_str!("../../templates/feed.html")),
    ("post.html", include_str!("../../templates/post.html")),
    ("recipes.html", include_str!("../../templates/recipes.html")),
    ("admin.html", include_str!("../../templates/admin.html")),
    ("admin_edit.html", include_str!("../../templates/admin_edit.html")),
    ("admin_login.html", include_str!("../../templates/admin_login.html")),
    ("maintenance.html", include_str!("../../templates/maintenance.html")),
];

/// Compiled template set shared by all handlers.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Load all templates; `base_url` is exposed to every page for link building.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        env.add_global("base_url", base_url.to_string());
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteSettings;
    use minijinja::context;

    #[test]
    fn test_all_templates_compile() {
        let views = Views::new("").unwrap();
        for (name, _) in TEMPLATES {
            assert!(views.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_output_is_escaped() {
        let views = Views::new("").unwrap();
        let html = views
            .render(
                "post.html",
                context! {
                    settings => SiteSettings::default(),
                    post => context! {
                        id => 1,
                        title => "<script>alert(1)</script>",
                        content => "body",
                        created_at => "2024-01-01 00:00:00",
                    },
                },
            )
            .unwrap();
        assert!(!html.0.contains("<script>alert(1)</script>"));
        assert!(html.0.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_links_use_base_url() {
        let views = Views::new("/blog").unwrap();
        let html = views
            .render("maintenance.html", context! { settings => SiteSettings::default() })
            .unwrap();
        assert!(html.0.contains("href=\"/blog/feed\""));
    }
}
