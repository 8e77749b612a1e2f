//! View rendering
//!
//! The template set is parsed once, before the server starts listening, and
//! is read-only afterwards. Anything wrong with the set itself is a startup
//! error; anything that goes wrong rendering one view is returned to the
//! caller as [`Error::Render`].

use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::job::View;

mod escape;

pub use escape::escape_html;

include!(concat!(env!("OUT_DIR"), "/embedded_templates.rs"));

/// Templates every renderer must have before it may serve.
pub const REQUIRED_TEMPLATES: &[&str] = &[
    "base.html",
    "index.html",
    "create.html",
    "server.html",
    "client.html",
];

/// Where the template set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The templates compiled into the binary.
    Embedded,
    /// Every `*.html` file directly inside a directory.
    Directory(PathBuf),
}

impl TemplateSource {
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or(TemplateSource::Embedded, TemplateSource::Directory)
    }
}

#[derive(Debug)]
pub struct ViewRenderer {
    tera: Tera,
}

impl ViewRenderer {
    /// Load and validate the complete template set.
    pub fn load(source: &TemplateSource) -> Result<Self> {
        let templates = match source {
            TemplateSource::Embedded => EMBEDDED_TEMPLATES
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_string()))
                .collect(),
            TemplateSource::Directory(dir) => read_template_dir(dir)?,
        };

        let renderer = Self::from_templates(templates)?;
        info!("Loaded {} templates from {:?}", renderer.template_count(), source);
        Ok(renderer)
    }

    /// Build a renderer from `(name, source)` pairs.
    pub fn from_templates(templates: Vec<(String, String)>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.set_escape_fn(escape_html);
        tera.add_raw_templates(templates)?;

        for required in REQUIRED_TEMPLATES {
            if !tera.get_template_names().any(|name| name == *required) {
                return Err(Error::MissingTemplate((*required).to_string()));
            }
        }

        Ok(Self { tera })
    }

    pub fn render(&self, view: &View) -> Result<String> {
        let template = view.template_name();
        debug!("Rendering {} for job {}", template, view.job_id());

        self.tera
            .render(template, &view.context())
            .map_err(|source| Error::Render { template, source })
    }

    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    fn template_count(&self) -> usize {
        self.tera.get_template_names().count()
    }
}

fn read_template_dir(dir: &Path) -> Result<Vec<(String, String)>> {
    let mut templates = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("html") {
            continue;
        }

        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        let body = fs::read_to_string(&path)?;
        templates.push((name.to_string(), body));
    }

    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobDefinition, JobId};
    use tempfile::TempDir;

    fn id(raw: &str) -> JobId {
        JobId::parse(raw).unwrap()
    }

    fn minimal_templates() -> Vec<(String, String)> {
        REQUIRED_TEMPLATES
            .iter()
            .map(|name| (name.to_string(), format!("{name}:{{{{ id }}}}")))
            .collect()
    }

    #[test]
    fn test_embedded_set_is_complete() {
        let renderer = ViewRenderer::load(&TemplateSource::Embedded).unwrap();
        let names = renderer.template_names();
        for required in REQUIRED_TEMPLATES {
            assert!(names.contains(required), "missing {required}");
        }
    }

    #[test]
    fn test_every_view_renders_its_id() {
        let renderer = ViewRenderer::load(&TemplateSource::Embedded).unwrap();
        let views = [
            View::Landing(id("a1")),
            View::Creation(id("a1")),
            View::Coordinator(JobDefinition::new(id("a1"), "m1", "r1", "http://d")),
            View::Worker(id("a1")),
        ];

        for view in views {
            let html = renderer.render(&view).unwrap();
            assert!(html.contains("a1"), "{} lacks the id", view.template_name());
        }
    }

    #[test]
    fn test_landing_links_to_creation() {
        let renderer = ViewRenderer::load(&TemplateSource::Embedded).unwrap();
        let html = renderer.render(&View::Landing(id("q7"))).unwrap();
        assert!(html.contains(r#"href="/create/q7""#));
    }

    #[test]
    fn test_coordinator_escapes_markup_but_keeps_urls() {
        let renderer = ViewRenderer::load(&TemplateSource::Embedded).unwrap();
        let def = JobDefinition::new(
            id("a1"),
            "emit(k, v); // </textarea><script>alert(1)</script>",
            "return a < b && b > c;",
            "http://example.com/data?x=1",
        );
        let html = renderer.render(&View::Coordinator(def)).unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
        assert!(html.contains("return a &lt; b &amp;&amp; b &gt; c;"));
        assert!(html.contains("http://example.com/data?x=1"));
    }

    #[test]
    fn test_missing_template_is_a_load_error() {
        let templates: Vec<_> = minimal_templates()
            .into_iter()
            .filter(|(name, _)| name != "client.html")
            .collect();

        let err = ViewRenderer::from_templates(templates).unwrap_err();
        assert!(matches!(err, Error::MissingTemplate(ref name) if name == "client.html"));
    }

    #[test]
    fn test_unparsable_template_is_a_load_error() {
        let mut templates = minimal_templates();
        templates[1].1 = "{% if %}".to_string();

        let err = ViewRenderer::from_templates(templates).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_render_failure_is_returned_not_raised() {
        let mut templates = minimal_templates();
        for (name, body) in templates.iter_mut() {
            if name == "client.html" {
                *body = "{{ mapper_code }}".to_string();
            }
        }
        let renderer = ViewRenderer::from_templates(templates).unwrap();

        let err = renderer.render(&View::Worker(id("a1"))).unwrap_err();
        assert!(matches!(err, Error::Render { template: "client.html", .. }));

        // Other views are unaffected
        assert_eq!(
            renderer.render(&View::Creation(id("a1"))).unwrap(),
            "create.html:a1"
        );
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        for (name, body) in minimal_templates() {
            fs::write(dir.path().join(name), body).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let renderer =
            ViewRenderer::load(&TemplateSource::Directory(dir.path().to_path_buf())).unwrap();
        assert_eq!(renderer.template_names().len(), REQUIRED_TEMPLATES.len());
        assert_eq!(
            renderer.render(&View::Worker(id("b2"))).unwrap(),
            "client.html:b2"
        );
    }

    #[test]
    fn test_load_from_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = ViewRenderer::load(&TemplateSource::Directory(missing)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_from_empty_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err =
            ViewRenderer::load(&TemplateSource::Directory(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::MissingTemplate(_)));
    }
}
