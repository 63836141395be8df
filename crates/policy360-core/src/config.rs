//! Configuration types for Policy360.
//!
//! Configuration lives in `.policy360/config.toml` under a workspace root.
//! Every field is optional in the file; missing values fall back to the
//! defaults from [`Policy360Config::new`]. Paths are always derived from the
//! root and cannot be overridden.

use crate::error::{Policy360Error, Result};
use crate::tools::fs::FsAdapter;
use crate::tools::fs_impl::StdFsAdapter;
use crate::validate::{DESCRIPTION_MIN_LENGTH, MAX_UPLOAD_MB, PASSWORD_MIN_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the workspace data directory.
pub const DATA_DIR: &str = ".policy360";

/// Main Policy360 configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy360Config {
    /// Workspace root directory.
    pub root: PathBuf,

    /// Data directory (`<root>/.policy360`).
    pub data_dir: PathBuf,

    /// Path to the configuration file.
    pub config_file: PathBuf,

    /// Saved workflow snapshot.
    pub state_file: PathBuf,

    /// Stage update journal.
    pub journal_file: PathBuf,

    pub workflow: WorkflowConfig,

    pub validation: ValidationConfig,

    pub report: ReportConfig,
}

/// How the host drives the workflow tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Resume from the saved snapshot instead of starting at ideation.
    pub resume: bool,

    /// Append stage notifications to the journal file.
    pub journal: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            resume: true,
            journal: true,
        }
    }
}

/// Limits used by form and upload validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub password_min_length: usize,
    pub description_min_length: usize,
    pub max_upload_mb: u64,
    pub allowed_file_types: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            password_min_length: PASSWORD_MIN_LENGTH,
            description_min_length: DESCRIPTION_MIN_LENGTH,
            max_upload_mb: MAX_UPLOAD_MB,
            allowed_file_types: ["pdf", "xlsx", "csv", "docx"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory with `*.j2` templates overriding the built-in ones.
    pub template_dir: Option<PathBuf>,
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    workflow: Option<WorkflowConfig>,
    #[serde(default)]
    validation: Option<ValidationConfig>,
    #[serde(default)]
    report: Option<ReportConfig>,
}

impl Policy360Config {
    /// Creates a configuration with defaults for the given root.
    pub fn new(root: PathBuf) -> Self {
        let data_dir = root.join(DATA_DIR);
        Self {
            config_file: data_dir.join("config.toml"),
            state_file: data_dir.join("state.toml"),
            journal_file: data_dir.join("journal.toml"),
            data_dir,
            root,
            workflow: WorkflowConfig::default(),
            validation: ValidationConfig::default(),
            report: ReportConfig::default(),
        }
    }

    /// Loads `<root>/.policy360/config.toml`, falling back to defaults when
    /// the file does not exist.
    pub fn load(root: PathBuf) -> Result<Self> {
        Self::load_with(root, &StdFsAdapter::new())
    }

    /// Like [`Policy360Config::load`] but reading through `fs`.
    ///
    /// # Errors
    ///
    /// Returns `Policy360Error::ConfigParseError` if the file is not valid
    /// TOML or has wrongly typed fields, and `Policy360Error::InvalidConfig`
    /// for out-of-range values.
    #[tracing::instrument(skip(fs), fields(root = %root.display()))]
    pub fn load_with(root: PathBuf, fs: &dyn FsAdapter) -> Result<Self> {
        let mut config = Self::new(root);

        if !fs.exists(&config.config_file) {
            tracing::debug!("no config file, using defaults");
            return Ok(config);
        }

        let content = fs.read_to_string(&config.config_file)?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            Policy360Error::ConfigParseError(format!("{}: {}", config.config_file.display(), e))
        })?;

        if let Some(workflow) = file.workflow {
            config.workflow = workflow;
        }
        if let Some(validation) = file.validation {
            config.validation = validation;
        }
        if let Some(report) = file.report {
            config.report = report;
        }

        config.validate()?;
        tracing::debug!(path = %config.config_file.display(), "config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.validation.password_min_length == 0 {
            return Err(Policy360Error::InvalidConfig(
                "validation.password_min_length must be at least 1".to_string(),
            ));
        }
        if self.validation.max_upload_mb == 0 {
            return Err(Policy360Error::InvalidConfig(
                "validation.max_upload_mb must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Renders the configurable sections as TOML.
    pub fn to_toml(&self) -> Result<String> {
        let file = ConfigFile {
            workflow: Some(self.workflow.clone()),
            validation: Some(self.validation.clone()),
            report: Some(self.report.clone()),
        };
        let body =
            toml::to_string(&file).map_err(|e| Policy360Error::Serialization(e.to_string()))?;
        Ok(format!("# Policy360 workspace configuration\n{body}"))
    }

    pub fn is_initialized(&self, fs: &dyn FsAdapter) -> bool {
        fs.exists(&self.config_file)
    }

    /// Creates the data directory and writes the default config file.
    ///
    /// # Errors
    ///
    /// Returns `Policy360Error::AlreadyInitialized` if a config file already
    /// exists.
    #[tracing::instrument(skip(self, fs), fields(root = %self.root.display()))]
    pub fn init_workspace(&self, fs: &dyn FsAdapter) -> Result<()> {
        if self.is_initialized(fs) {
            return Err(Policy360Error::AlreadyInitialized(self.data_dir.clone()));
        }

        fs.create_dir_all(&self.data_dir)?;
        fs.write(&self.config_file, &self.to_toml()?)?;

        tracing::info!(data_dir = %self.data_dir.display(), "workspace initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fs_mock::MockFsAdapter;
    use std::path::Path;

    #[test]
    fn test_should_derive_paths_from_root() {
        let config = Policy360Config::new(PathBuf::from("/ws"));
        assert_eq!(config.data_dir, Path::new("/ws/.policy360"));
        assert_eq!(config.config_file, Path::new("/ws/.policy360/config.toml"));
        assert_eq!(config.state_file, Path::new("/ws/.policy360/state.toml"));
        assert_eq!(config.journal_file, Path::new("/ws/.policy360/journal.toml"));
        assert!(config.workflow.resume);
        assert_eq!(config.validation.password_min_length, 8);
    }

    #[test]
    fn test_should_init_once() {
        let fs = MockFsAdapter::new();
        let config = Policy360Config::new(PathBuf::from("/ws"));

        config.init_workspace(&fs).unwrap();
        assert!(config.is_initialized(&fs));

        assert!(matches!(
            config.init_workspace(&fs),
            Err(Policy360Error::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_should_reload_written_defaults() {
        let fs = MockFsAdapter::new();
        let config = Policy360Config::new(PathBuf::from("/ws"));
        config.init_workspace(&fs).unwrap();

        let loaded = Policy360Config::load_with(PathBuf::from("/ws"), &fs).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_should_reject_zero_upload_limit() {
        let fs = MockFsAdapter::new();
        fs.write(
            Path::new("/ws/.policy360/config.toml"),
            "[validation]\nmax_upload_mb = 0\n",
        )
        .unwrap();

        assert!(matches!(
            Policy360Config::load_with(PathBuf::from("/ws"), &fs),
            Err(Policy360Error::InvalidConfig(_))
        ));
    }
}
