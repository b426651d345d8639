//! HTML pages.
//!
//! Templates are plain HTML files with `{{name}}` placeholders. Every
//! `*.html` file in the templates directory is read once at startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Pages the storefront routes render. Loading fails if one is missing.
pub const PAGES: [&str; 2] = ["index.html", "about.html"];

const TEMPLATE_EXTENSION: &str = "html";

/// Errors raised while loading templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A template could not be read.
    #[error("failed to read template {path}: {source}")]
    Read {
        /// The template path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A page the routes render has no template file.
    #[error("template {name} not found in {dir}")]
    Missing {
        /// The page file name.
        name: &'static str,
        /// The templates directory.
        dir: PathBuf,
    },
}

/// Loaded page templates.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    pages: HashMap<String, String>,
}

impl Templates {
    /// Reads every `*.html` file in `dir`, keyed by file name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Read`] if the directory or a template cannot
    /// be read, and [`TemplateError::Missing`] for the first entry of
    /// [`PAGES`] without a file.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let mut pages = HashMap::new();
        for entry in std::fs::read_dir(dir).map_err(read_error(dir))? {
            let path = entry.map_err(read_error(dir))?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let source = std::fs::read_to_string(&path).map_err(read_error(&path))?;
            pages.insert(name.to_string(), source);
        }

        if let Some(name) = PAGES.into_iter().find(|name| !pages.contains_key(*name)) {
            return Err(TemplateError::Missing {
                name,
                dir: dir.to_path_buf(),
            });
        }

        tracing::debug!(dir = %dir.display(), pages = pages.len(), "templates loaded");
        Ok(Self { pages })
    }

    /// Returns true if a template named `name` is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Adds a template from a string.
    #[must_use]
    pub fn with_page(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.pages.insert(name.into(), source.into());
        self
    }

    /// Renders `name`, substituting each `{{key}}` with its HTML-escaped
    /// value. Unknown placeholders are left as written.
    #[must_use]
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Option<String> {
        let mut html = self.pages.get(name)?.clone();
        for (key, value) in vars {
            html = html.replace(&format!("{{{{{key}}}}}"), &escape(value));
        }
        Some(html)
    }
}

fn read_error(path: &Path) -> impl FnOnce(std::io::Error) -> TemplateError {
    let path = path.to_path_buf();
    move |source| TemplateError::Read { path, source }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_and_escapes() {
        let templates = Templates::default().with_page("t.html", "<h1>{{title}}</h1><p>{{other}}</p>");
        let html = templates.render("t.html", &[("title", "Fish & <Chips>")]).unwrap();
        assert_eq!(html, "<h1>Fish &amp; &lt;Chips&gt;</h1><p>{{other}}</p>");
        assert!(templates.render("missing.html", &[]).is_none());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "{{title}}").unwrap();

        let err = Templates::load(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::Missing { name: "about.html", .. }));
        assert!(err.to_string().contains("about.html"));
    }

    #[test]
    fn test_load_reads_whole_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["index.html", "about.html", "contact.html"] {
            std::fs::write(dir.path().join(name), "<p>{{title}}</p>").unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "draft").unwrap();
        std::fs::create_dir(dir.path().join("partials.html")).unwrap();

        let templates = Templates::load(dir.path()).unwrap();
        assert!(templates.contains("contact.html"));
        assert!(!templates.contains("notes.txt"));
        assert!(!templates.contains("partials.html"));
        assert_eq!(
            templates.render("contact.html", &[("title", "Contact")]).unwrap(),
            "<p>Contact</p>"
        );
    }

    #[test]
    fn test_load_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Templates::load(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }

    #[test]
    fn test_load_bundled_templates() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let templates = Templates::load(&dir).unwrap();
        let html = templates
            .render("index.html", &[("title", "Home"), ("description", "This is home page.")])
            .unwrap();
        assert!(html.contains("This is home page."));
    }
}
