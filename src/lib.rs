mod macros;
mod data;
mod error;
mod filesystem;
mod builder;
mod reporter;
mod sysout;

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{error, info, warn};

pub use builder::{BuildRunner, Builder, CommandBuildRunner, DEFAULT_BUILD_TOOL, DEFAULT_CODE_EXTENSION, find_code_file};
pub use data::models::{game_dir::{GameDir, target_collisions}, manifest::{DEFAULT_MANIFEST_NAME, Manifest}, report::{BuildOutcome, DirectoryOutcome, DirectoryReport, RunReport}, strip_suffix_token};
pub use error::{GamepackError, GamepackIOError};
pub use filesystem::{CopyFlags, discover_game_dirs, ensure_directory, replace_with_copy};
pub use reporter::PipelineReporter;
pub use sysout::PipelineReporterSysOut;

pub const DEFAULT_MARKER: &str = "game";
pub const DEFAULT_SUFFIX: &str = "_game";

const MISSING_ARGUMENTS: &str = "A source and target directory must both be passed. One is missing.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub source: PathBuf,
    pub target: PathBuf,
    pub marker: String,
    pub suffix: String,
    pub extension: String,
    pub manifest_name: String,
    pub keep_going: bool,
    pub build: bool,
}

impl PipelineConfig {
    pub fn new(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            marker: DEFAULT_MARKER.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            extension: DEFAULT_CODE_EXTENSION.to_string(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            keep_going: false,
            build: true,
        }
    }

    /// Takes exactly the source and target directories, resolved against `cwd`.
    pub fn from_arguments(args: &[impl AsRef<Path>], cwd: &impl AsRef<Path>) -> Result<Self> {
        match args {
            [source, target] => {
                let cwd = cwd.as_ref();
                Ok(Self::new(cwd.join(source), cwd.join(target)))
            }
            _ => err!(GamepackError::InvalidArguments { message: MISSING_ARGUMENTS.to_string() }),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.target.join(&self.manifest_name)
    }
}

pub struct Gamepack<R: BuildRunner> {
    config: PipelineConfig,
    builder: Builder<R>,
    reporter: Option<Box<dyn PipelineReporter>>,
}

impl<R: BuildRunner> Gamepack<R> {
    pub fn new(config: PipelineConfig, runner: R) -> Self {
        let builder = Builder::new(runner, config.extension.clone());
        Self { config, builder, reporter: None }
    }

    pub fn add_reporter<P>(&mut self, reporter: P) where P: PipelineReporter + 'static {
        self.reporter = Some(Box::new(reporter));
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn builder(&self) -> &Builder<R> {
        &self.builder
    }

    /// Discovers the game directories and pairs each one with its target name in a single pass.
    pub fn collect_game_dirs(&self) -> Result<Vec<GameDir>> {
        let game_dirs = discover_game_dirs(&self.config.source, &self.config.marker)?
            .into_iter()
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().to_string();
                Some(GameDir::new(path, name, &self.config.suffix))
            })
            .collect::<Vec<GameDir>>();

        Ok(game_dirs)
    }

    pub fn run(&mut self) -> Result<RunReport> {
        let game_dirs = self.collect_game_dirs()?;
        info!("Found {} game directories in `{}`", game_dirs.len(), self.config.source.display());

        for (first, second) in target_collisions(&game_dirs) {
            warn!("`{}` and `{}` both map to `{}`, the second one replaces the first",
                first.source.display(), second.source.display(), second.target_name);
        }

        ensure_directory(&self.config.target)?;

        if let Some(reporter) = self.reporter.as_mut() {
            reporter.set_total_dirs(game_dirs.len());
        }

        let mut directories = Vec::with_capacity(game_dirs.len());
        let mut game_names = Vec::with_capacity(game_dirs.len());
        for game_dir in game_dirs {
            if let Some(reporter) = self.reporter.as_mut() {
                reporter.update_current_dir(&game_dir.name);
            }

            let target = game_dir.target_in(&self.config.target);
            match self.process_dir(&game_dir, &target) {
                Ok(outcome) => {
                    if let Some(reporter) = self.reporter.as_mut() {
                        reporter.update_dir_done(outcome.is_failure());
                    }
                    game_names.push(game_dir.target_name.clone());
                    directories.push(DirectoryReport::new(game_dir.target_name, target, DirectoryOutcome::Built(outcome)));
                }
                Err(e) if self.config.keep_going => {
                    error!("Error processing {}: {:#}", game_dir, e);
                    if let Some(reporter) = self.reporter.as_mut() {
                        reporter.update_dir_done(true);
                    }
                    directories.push(DirectoryReport::new(game_dir.target_name, target, DirectoryOutcome::Error(format!("{:#}", e))));
                }
                Err(e) => {
                    if let Some(reporter) = self.reporter.as_mut() {
                        reporter.finish();
                    }
                    return Err(e);
                }
            }
        }

        let manifest = Manifest::from_names(game_names);
        let manifest_path = self.config.manifest_path();
        manifest.write_to(&manifest_path)?;
        info!("Wrote manifest with {} games to `{}`", manifest.number_of_games(), manifest_path.display());

        if let Some(reporter) = self.reporter.as_mut() {
            reporter.finish();
        }

        Ok(RunReport::new(directories, manifest_path, manifest))
    }

    fn process_dir(&self, game_dir: &GameDir, target: &Path) -> Result<BuildOutcome> {
        info!("Copying {} into `{}`", game_dir, target.display());
        if target.exists() {
            warn!("Replacing existing `{}`", target.display());
        }
        replace_with_copy(&game_dir.source, &target, CopyFlags::ALL)?;

        if self.config.build {
            self.builder.build(&target)
        } else {
            Ok(BuildOutcome::Disabled)
        }
    }
}
