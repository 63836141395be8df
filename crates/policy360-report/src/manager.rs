//! Report manager implementation using minijinja.

use crate::{
    engine::ReportEngine,
    error::{ReportError, Result},
};
use serde::Serialize;
use std::path::PathBuf;

/// Templates compiled into the binary, by name.
const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    ("final_report", include_str!("../templates/final_report.j2")),
    ("stage", include_str!("../templates/stage.j2")),
];

/// Loads and renders report templates.
///
/// Either serves the built-in templates or every `*.j2` file in a directory.
///
/// # Examples
///
/// ```no_run
/// use policy360_report::ReportManager;
/// use std::path::PathBuf;
///
/// let manager = ReportManager::new(PathBuf::from("./templates"))?;
/// # Ok::<(), policy360_report::ReportError>(())
/// ```
#[derive(Debug)]
pub struct ReportManager {
    /// Directory the templates are loaded from, `None` for the built-ins.
    pub templates_dir: Option<PathBuf>,
    env: minijinja::Environment<'static>,
}

impl ReportManager {
    /// Manager serving the embedded `stage` and `final_report` templates.
    pub fn builtin() -> Self {
        let mut env = minijinja::Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            // A broken embedded template surfaces as TemplateNotFound on render.
            if let Err(e) = env.add_template(name, source) {
                tracing::warn!(template = name, error = %e, "built-in template failed to compile");
            }
        }
        Self {
            templates_dir: None,
            env,
        }
    }

    /// Manager loading `<name>.j2` files from `templates_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::TemplateDirectoryNotFound` if the directory does
    /// not exist or is not a directory.
    pub fn new(templates_dir: PathBuf) -> Result<Self> {
        if !templates_dir.is_dir() {
            return Err(ReportError::TemplateDirectoryNotFound(templates_dir));
        }

        let mut env = minijinja::Environment::new();
        env.set_loader(minijinja::path_loader(&templates_dir));

        Ok(Self {
            templates_dir: Some(templates_dir),
            env,
        })
    }

    /// Uses `templates_dir` when given, otherwise the built-ins.
    pub fn from_dir_or_builtin(templates_dir: Option<PathBuf>) -> Result<Self> {
        match templates_dir {
            Some(dir) => Self::new(dir),
            None => Ok(Self::builtin()),
        }
    }

    fn load_template(&self, name: &str) -> Result<minijinja::Template<'_, '_>> {
        let template_name = match self.templates_dir {
            Some(_) => format!("{name}.j2"),
            None => name.to_string(),
        };
        self.env
            .get_template(&template_name)
            .map_err(|e| ReportError::TemplateNotFound(format!("{name}: {e}")))
    }
}

impl ReportEngine for ReportManager {
    fn render<T: Serialize>(&self, template: &str, ctx: &T) -> Result<String> {
        let tmpl = self.load_template(template)?;
        tmpl.render(ctx)
            .map_err(|e| ReportError::TemplateRenderError(format!("{template}: {e}")))
    }

    fn list_templates(&self) -> Result<Vec<String>> {
        let Some(dir) = &self.templates_dir else {
            return Ok(BUILTIN_TEMPLATES
                .iter()
                .map(|(name, _)| (*name).to_string())
                .collect());
        };

        let entries = std::fs::read_dir(dir).map_err(|source| ReportError::TemplateListError {
            path: dir.clone(),
            source,
        })?;

        let mut templates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ReportError::TemplateListError {
                path: dir.clone(),
                source,
            })?;

            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == "j2"
                && let Some(name) = path.file_stem()
                && let Some(name_str) = name.to_str()
            {
                templates.push(name_str.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ReportContext;
    use policy360_core::WorkflowTracker;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_template_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let templates_path = temp_dir.path().join("templates");
        fs::create_dir(&templates_path).expect("failed to create templates dir");

        fs::write(
            templates_path.join("brief.j2"),
            "{{ active.label }}: {{ active.completion }}%",
        )
        .expect("failed to write brief template");
        fs::write(templates_path.join("notes.txt"), "not a template")
            .expect("failed to write notes");

        (temp_dir, templates_path)
    }

    #[test]
    fn test_should_render_builtin_stage_report() {
        let manager = ReportManager::builtin();
        let ctx = ReportContext::from_tracker(&WorkflowTracker::detached());

        let rendered = manager.render("stage", &ctx).unwrap();

        assert!(rendered.contains("Ideation (1/6)"));
        assert!(rendered.contains("Policy Ideation & Planning"));
        assert!(rendered.contains("Completion: 75%"));
        assert!(rendered.contains("Stakeholders: 8"));
        assert!(rendered.contains("[x] Define policy objectives"));
    }

    #[test]
    fn test_should_render_builtin_final_report() {
        let mut tracker = WorkflowTracker::detached();
        tracker.advance();
        let manager = ReportManager::builtin();
        let ctx = ReportContext::from_tracker(&tracker).with_policy_title("Clean water access");

        let rendered = manager.render("final_report", &ctx).unwrap();

        assert!(rendered.contains("Policy: Clean water access"));
        assert!(rendered.contains("Completed: 1/5"));
        assert!(rendered.contains("1. 💡 Ideation [completed]"));
        assert!(rendered.contains("2. 📊 Analysis [active]"));
        assert!(rendered.contains("3. 🚀 Implementation [pending]"));
        assert!(rendered.contains("4 stage(s) remaining"));
    }

    #[test]
    fn test_should_announce_success_when_lifecycle_complete() {
        let mut tracker = WorkflowTracker::detached();
        while tracker.advance() {}

        let rendered = ReportManager::builtin()
            .render("final_report", &ReportContext::from_tracker(&tracker))
            .unwrap();

        assert!(rendered.contains("achieved its objectives"));
        assert!(!rendered.contains("Policy:"));
    }

    #[test]
    fn test_should_compile_every_builtin_template() {
        let mut env = minijinja::Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            if let Err(e) = env.add_template(name, source) {
                panic!("built-in template {name} does not compile: {e}");
            }
        }

        let manager = ReportManager::builtin();
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(manager.load_template(name).is_ok(), "{name} not registered");
        }
    }

    #[test]
    fn test_should_list_builtin_templates() {
        let templates = ReportManager::builtin().list_templates().unwrap();
        assert_eq!(templates, vec!["final_report", "stage"]);
    }

    #[test]
    fn test_should_render_from_directory() {
        let (_temp, templates_path) = create_test_template_dir();
        let manager = ReportManager::new(templates_path.clone()).unwrap();
        assert_eq!(manager.templates_dir, Some(templates_path));

        let ctx = ReportContext::from_tracker(&WorkflowTracker::detached());
        assert_eq!(manager.render("brief", &ctx).unwrap(), "Ideation: 75%");
        assert_eq!(manager.list_templates().unwrap(), vec!["brief"]);
    }

    #[test]
    fn test_should_render_arbitrary_serializable_context() {
        let (_temp, templates_path) = create_test_template_dir();
        let manager = ReportManager::new(templates_path).unwrap();

        let ctx = serde_json::json!({ "active": { "label": "Custom", "completion": 5 } });
        assert_eq!(manager.render("brief", &ctx).unwrap(), "Custom: 5%");
    }

    #[test]
    fn test_should_reject_missing_directory() {
        let result = ReportManager::new(PathBuf::from("/nonexistent/path"));
        assert!(matches!(
            result,
            Err(ReportError::TemplateDirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_should_report_unknown_template() {
        let ctx = ReportContext::from_tracker(&WorkflowTracker::detached());
        let result = ReportManager::builtin().render("nonexistent", &ctx);
        assert!(matches!(result, Err(ReportError::TemplateNotFound(_))));
    }
}
