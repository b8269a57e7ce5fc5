//! Lifecycle stage probing
//!
//! The project directory is the state: the stage is derived each run from
//! which marker artifacts exist, never stored.

use std::path::Path;

use serde::Serialize;

use crate::core::config::ProjectConfig;

/// Lifecycle stage of a project directory, in order of progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    /// No config file
    Uninitialized,
    /// Config present, library not fetched
    Initialized,
    /// Library fetched, no dependency manifest
    ToolsReady,
    /// Dependency manifest present
    DepsReady,
}

impl ProjectStage {
    /// Command that advances a project out of this stage
    pub fn next_command(self) -> Option<&'static str> {
        match self {
            Self::Uninitialized => Some("init"),
            Self::Initialized => Some("setup"),
            Self::ToolsReady => Some("ready"),
            Self::DepsReady => None,
        }
    }
}

impl std::fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initialized => write!(f, "initialized"),
            Self::ToolsReady => write!(f, "tools ready"),
            Self::DepsReady => write!(f, "dependencies ready"),
        }
    }
}

/// Detect the stage of a project directory
///
/// `config` supplies the layout; pass the defaults for a directory that
/// has no config file yet.
pub fn detect_stage(project_dir: &Path, config: &ProjectConfig) -> ProjectStage {
    if !ProjectConfig::path_in(project_dir).is_file() {
        ProjectStage::Uninitialized
    } else if !project_dir.join(config.paths.base_js()).is_file() {
        ProjectStage::Initialized
    } else if !project_dir.join(config.paths.deps_js()).is_file() {
        ProjectStage::ToolsReady
    } else {
        ProjectStage::DepsReady
    }
}

/// Stage plus presence of compiled output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStatus {
    /// Detected lifecycle stage
    pub stage: ProjectStage,
    /// Production bundle exists
    pub production_bundle: bool,
    /// Debug bundle exists
    pub debug_bundle: bool,
}

/// Detect stage and output artifacts
pub fn detect_status(project_dir: &Path, config: &ProjectConfig) -> ProjectStatus {
    let bundle = &config.build.compiled_output_path;
    ProjectStatus {
        stage: detect_stage(project_dir, config),
        production_bundle: project_dir
            .join(&config.paths.production_dir)
            .join(bundle)
            .is_file(),
        debug_bundle: project_dir
            .join(&config.paths.debug_dir)
            .join(bundle)
            .is_file(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: impl AsRef<Path>) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_stage_progression() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig::default();
        assert_eq!(detect_stage(dir.path(), &config), ProjectStage::Uninitialized);

        touch(dir.path(), "nskit.toml");
        assert_eq!(detect_stage(dir.path(), &config), ProjectStage::Initialized);

        touch(dir.path(), config.paths.base_js());
        assert_eq!(detect_stage(dir.path(), &config), ProjectStage::ToolsReady);

        touch(dir.path(), config.paths.deps_js());
        assert_eq!(detect_stage(dir.path(), &config), ProjectStage::DepsReady);
    }

    #[test]
    fn test_manifest_without_tools_is_initialized() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig::default();
        touch(dir.path(), "nskit.toml");
        touch(dir.path(), config.paths.deps_js());
        assert_eq!(detect_stage(dir.path(), &config), ProjectStage::Initialized);
    }

    #[test]
    fn test_stage_ordering() {
        assert!(ProjectStage::Uninitialized < ProjectStage::Initialized);
        assert!(ProjectStage::Initialized < ProjectStage::ToolsReady);
        assert!(ProjectStage::ToolsReady < ProjectStage::DepsReady);
        assert_eq!(ProjectStage::ToolsReady.next_command(), Some("ready"));
        assert_eq!(ProjectStage::DepsReady.next_command(), None);
    }

    #[test]
    fn test_status_reports_bundles() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig::default();
        touch(dir.path(), "production/js/script.min.js");
        let status = detect_status(dir.path(), &config);
        assert!(status.production_bundle);
        assert!(!status.debug_bundle);
        assert_eq!(status.stage, ProjectStage::Uninitialized);
    }
}
