//! Build orchestration logic
//!
//! Drives the project lifecycle (init, setup, ready, build). Each command
//! detects the stage from the filesystem, checks its precondition, and only
//! moves artifacts into place after every step before it succeeded.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::config::ProjectConfig;
use crate::core::deps::{relative_in, render_deps};
use crate::core::graph::DependencyGraph;
use crate::core::init::{self, InitResult};
use crate::core::resolver::{self, BuildPlan};
use crate::core::resources::stage_resources;
use crate::core::source_map::fix_source_root;
use crate::core::stage::{detect_stage, ProjectStage};
use crate::core::walker::scan_sources;
use crate::error::{Collaborator, CollaboratorError, NskitError, StageError};
use crate::infra::compiler::{CompileRequest, Compiler};
use crate::infra::filesystem::{copy_tree, create_dir_all, remove_dir_all, rename, replace_dir, write_file_atomic};
use crate::infra::git::{FetchedTool, ToolFetcher};

/// Options for a single build
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Produce the debug tree even when the config does not ask for it
    pub debug: bool,
    /// Start output trees empty instead of from their previous content
    pub clean: bool,
}

/// Result of `setup`
#[derive(Debug, Clone)]
pub enum SetupOutcome {
    /// The library was fetched
    Fetched(FetchedTool),
    /// The library was already present and `force` was not given
    AlreadyPresent,
}

/// Result of `ready`
#[derive(Debug, Clone)]
pub struct ReadyOutcome {
    /// Manifest path relative to the project root
    pub deps_path: PathBuf,
    /// Number of files in the plan
    pub file_count: usize,
}

/// Result of `build`
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Production bundle, relative to the project root
    pub production_bundle: PathBuf,
    /// Debug bundle and source map, relative to the project root
    pub debug: Option<(PathBuf, PathBuf)>,
    /// Number of files compiled, library bootstrap excluded
    pub file_count: usize,
}

/// Lifecycle driver for one project directory
pub struct BuildOrchestrator<'a> {
    project_dir: PathBuf,
    config: ProjectConfig,
    fetcher: &'a dyn ToolFetcher,
    compiler: &'a dyn Compiler,
}

impl<'a> BuildOrchestrator<'a> {
    /// Create an orchestrator
    pub fn new(
        project_dir: impl Into<PathBuf>,
        config: ProjectConfig,
        fetcher: &'a dyn ToolFetcher,
        compiler: &'a dyn Compiler,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            config,
            fetcher,
            compiler,
        }
    }

    /// Get the project directory
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Detect the current stage
    pub fn stage(&self) -> ProjectStage {
        detect_stage(&self.project_dir, &self.config)
    }

    fn staging_dir(&self) -> PathBuf {
        self.project_dir.join(defaults::STAGING_DIR)
    }

    /// Fail unless the project has reached `expected`
    fn require_stage(&self, command: &str, expected: ProjectStage) -> Result<ProjectStage, StageError> {
        let actual = self.stage();
        if actual >= expected {
            return Ok(actual);
        }
        let hint = match actual.next_command() {
            Some(next) => format!("Run 'nskit {next}' first."),
            None => String::new(),
        };
        Err(StageError::Precondition {
            command: command.to_string(),
            expected,
            actual,
            hint,
        })
    }

    /// Create the starter project tree
    pub async fn init(&self) -> Result<InitResult, NskitError> {
        let actual = self.stage();
        if actual != ProjectStage::Uninitialized {
            return Err(StageError::Precondition {
                command: "init".to_string(),
                expected: ProjectStage::Uninitialized,
                actual,
                hint: "The project is already initialized.".to_string(),
            }
            .into());
        }
        Ok(init::initialize(&self.project_dir)?)
    }

    /// Fetch the module library into `paths.library_root`
    ///
    /// The clone lands in a staging directory and replaces the library
    /// only once it is complete.
    pub async fn setup(&self, force: bool) -> Result<SetupOutcome, NskitError> {
        let stage = self.require_stage("setup", ProjectStage::Initialized)?;
        if stage >= ProjectStage::ToolsReady && !force {
            tracing::info!("Library already present, skipping fetch");
            return Ok(SetupOutcome::AlreadyPresent);
        }

        let staged = self.staging_dir().join("library");
        remove_dir_all(&staged)?;
        create_dir_all(&self.staging_dir())?;

        let result = self.fetch_library(&staged);
        if result.is_err() {
            let _ = remove_dir_all(&staged);
        }
        let mut fetched = result?;

        let target = self.project_dir.join(&self.config.paths.library_root);
        replace_dir(&staged, &target)?;
        fetched.path = target;

        tracing::info!("Stage: {}", self.stage());
        Ok(SetupOutcome::Fetched(fetched))
    }

    fn fetch_library(&self, staged: &Path) -> Result<FetchedTool, NskitError> {
        let fetched = self.fetcher.fetch(&self.config.tools.library_url, staged)?;
        let base_js = Path::new(defaults::BASE_JS);
        if !staged.join(base_js).is_file() {
            return Err(CollaboratorError::Failed {
                collaborator: Collaborator::ToolFetch,
                output: format!(
                    "{} does not contain {}",
                    self.config.tools.library_url,
                    base_js.display()
                ),
            }
            .into());
        }
        Ok(fetched)
    }

    /// Scan sources and compute the build plan
    pub async fn resolve(&self) -> Result<BuildPlan, NskitError> {
        let files = scan_sources(&self.project_dir, &self.config).await?;
        let graph = DependencyGraph::build(files, &self.config.build)?;
        tracing::debug!(
            "Graph: {} file(s), {} edge(s), {} symbol(s)",
            graph.len(),
            graph.edge_count(),
            graph.symbols().len()
        );
        Ok(resolver::resolve(graph)?)
    }

    /// Resolve and write the development manifest
    pub async fn ready(&self) -> Result<ReadyOutcome, NskitError> {
        self.require_stage("ready", ProjectStage::ToolsReady)?;

        let plan = self.resolve().await?;
        let deps_path = self.config.paths.deps_js();
        write_file_atomic(
            &self.project_dir.join(&deps_path),
            &render_deps(&plan, &self.config, &self.project_dir),
        )?;

        tracing::info!("Wrote {} ({} file(s))", deps_path.display(), plan.len());
        Ok(ReadyOutcome {
            deps_path,
            file_count: plan.len(),
        })
    }

    /// Compile the production bundle, plus the debug tree when enabled
    pub async fn build(&self, options: BuildOptions) -> Result<BuildOutcome, NskitError> {
        self.require_stage("build", ProjectStage::DepsReady)?;

        let plan = self.resolve().await?;
        let debug = options.debug || self.config.build.is_debug_enabled;

        let staging = self.staging_dir().join("staging");
        remove_dir_all(&staging)?;
        let result = self.build_in(&staging, &plan, debug, options.clean);
        let _ = remove_dir_all(&staging);
        result
    }

    fn build_in(
        &self,
        staging: &Path,
        plan: &BuildPlan,
        debug: bool,
        clean: bool,
    ) -> Result<BuildOutcome, NskitError> {
        let paths = &self.config.paths;
        let bundle = &self.config.build.compiled_output_path;
        let staged_production = staging.join("production");
        let staged_debug = staging.join("debug");

        self.stage_tree(&paths.production_dir, &staged_production, clean)?;
        self.compile_into(&staged_production, plan, None)?;

        let debug_artifacts = if debug {
            let map_name = format!(
                "{}.map",
                bundle.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
            );
            let map = bundle.with_file_name(map_name);

            self.stage_tree(&paths.debug_dir, &staged_debug, clean)?;
            self.compile_into(&staged_debug, plan, Some(&map))?;

            let map_dir = paths.debug_dir.join(&map).parent().map(Path::to_path_buf).unwrap_or_default();
            fix_source_root(
                &staged_debug.join(&map),
                &relative_in(&self.project_dir, &map_dir, Path::new("")),
            )?;
            Some((paths.debug_dir.join(bundle), paths.debug_dir.join(&map)))
        } else {
            None
        };

        // Every compile succeeded; publish
        let mut trees = vec![(staged_production, self.project_dir.join(&paths.production_dir))];
        if debug {
            trees.push((staged_debug, self.project_dir.join(&paths.debug_dir)));
        }
        publish(&staging.join("previous"), &trees)?;

        tracing::info!("Built {} file(s)", plan.len());
        Ok(BuildOutcome {
            production_bundle: paths.production_dir.join(bundle),
            debug: debug_artifacts,
            file_count: plan.len(),
        })
    }

    /// Fill a staging tree from the previous output and the development tree
    fn stage_tree(&self, output_dir: &Path, staged: &Path, clean: bool) -> Result<(), NskitError> {
        let previous = self.project_dir.join(output_dir);
        if clean || !previous.is_dir() {
            create_dir_all(staged)?;
        } else {
            copy_tree(&previous, staged, |_| false)?;
        }
        let copied = stage_resources(&self.project_dir, &self.config, staged)?;
        tracing::debug!("Staged {} resource(s) for {}", copied.len(), output_dir.display());
        Ok(())
    }

    /// Run the compiler with its output under `staged`
    fn compile_into(&self, staged: &Path, plan: &BuildPlan, source_map: Option<&Path>) -> Result<(), NskitError> {
        let debug = source_map.is_some();
        let output = staged.join(&self.config.build.compiled_output_path);
        if let Some(parent) = output.parent() {
            create_dir_all(parent)?;
        }

        let mut inputs = vec![self.config.paths.base_js()];
        inputs.extend(plan.paths().into_iter().map(PathBuf::from));

        let flagfile = self.config.paths.compiler_flagfile(debug);
        let request = CompileRequest {
            inputs,
            output: self.relative(&output),
            debug,
            source_map: source_map.map(|map| self.relative(&staged.join(map))),
            compilation_level: self.config.build.compilation_level.clone(),
            flagfile: self.project_dir.join(&flagfile).is_file().then_some(flagfile),
        };

        let flavor = if debug { "debug" } else { "production" };
        tracing::info!("Compiling {flavor} bundle from {} file(s)", plan.len());
        self.compiler.compile(&self.project_dir, &request)?;
        Ok(())
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.project_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Move staged trees over their targets, all or none
///
/// Current targets are moved under `backup` first. If any step fails, the
/// trees already installed are removed and the backups are put back.
fn publish(backup: &Path, trees: &[(PathBuf, PathBuf)]) -> Result<(), NskitError> {
    let mut moved_aside = Vec::new();
    let mut installed = Vec::new();
    let result = swap_trees(backup, trees, &mut moved_aside, &mut installed);
    if result.is_err() {
        for target in &installed {
            let _ = remove_dir_all(target);
        }
        for (saved, target) in &moved_aside {
            if let Err(e) = rename(saved, target) {
                tracing::warn!("Could not restore {}: {e}", target.display());
            }
        }
    }
    result
}

fn swap_trees(
    backup: &Path,
    trees: &[(PathBuf, PathBuf)],
    moved_aside: &mut Vec<(PathBuf, PathBuf)>,
    installed: &mut Vec<PathBuf>,
) -> Result<(), NskitError> {
    for (index, (_, target)) in trees.iter().enumerate() {
        if target.exists() {
            let saved = backup.join(index.to_string());
            rename(target, &saved)?;
            moved_aside.push((saved, target.clone()));
        }
    }
    for (staged, target) in trees {
        rename(staged, target)?;
        installed.push(target.clone());
    }
    Ok(())
}
