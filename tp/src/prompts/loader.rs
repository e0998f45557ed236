//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory holding `{name}.pmt` files
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates found in `override_dir`
    ///
    /// A directory that does not exist is ignored.
    pub fn new(override_dir: Option<&Path>) -> Self {
        debug!(?override_dir, "PromptLoader::new: called");
        let override_dir = override_dir.filter(|d| d.is_dir()).map(Path::to_path_buf);
        if override_dir.is_none() {
            debug!("PromptLoader::new: no override directory, using embedded prompts");
        }

        Self {
            hbs: Self::engine(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    /// Prompts are plain text sent to a model; HTML escaping would mangle
    /// answers such as "B&B" and previous plans.
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{override_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in override directory");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in override directory");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_render_embedded_refine_unescaped() {
        let loader = PromptLoader::embedded_only();
        let out = loader
            .render(
                "refine",
                &json!({"previous_plan": "Stay at a B&B <near> the \"Duomo\"", "instruction": "cheaper"}),
            )
            .unwrap();
        assert!(out.contains("Stay at a B&B <near> the \"Duomo\""));
        assert!(out.contains("cheaper"));
    }

    #[test]
    fn test_override_directory_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("refine.pmt"), "REVISE {{previous_plan}} WITH {{instruction}}").unwrap();

        let loader = PromptLoader::new(Some(temp.path()));
        let out = loader
            .render("refine", &json!({"previous_plan": "plan", "instruction": "more museums"}))
            .unwrap();
        assert_eq!(out, "REVISE plan WITH more museums");

        // Templates missing from the override directory still come from the embedded set
        let out = loader
            .render("travel-plan", &json!({"sections": []}))
            .unwrap();
        assert!(out.contains("expert travel planner"));
    }

    #[test]
    fn test_missing_override_directory_ignored() {
        let temp = TempDir::new().unwrap();
        let loader = PromptLoader::new(Some(&temp.path().join("nope")));
        assert!(loader.override_dir.is_none());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
