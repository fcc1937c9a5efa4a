use std::{path::{Path, PathBuf}, process::{Command, Stdio}};

use anyhow::Result;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::{data::models::report::BuildOutcome, err, error::GamepackError};

pub const DEFAULT_BUILD_TOOL: &str = "go";
pub const DEFAULT_CODE_EXTENSION: &str = ".go";

/// Runs the build for a single code file inside `dir`.
pub trait BuildRunner {
    fn run(&self, dir: &Path, file: &Path) -> Result<BuildOutcome>;
}

/// Invokes `<tool> build <file>` with `dir` as the working directory of the child process.
pub struct CommandBuildRunner {
    tool: String,
}

impl CommandBuildRunner {
    pub fn new(tool: impl Into<String>) -> Self { Self { tool: tool.into() } }
}

impl Default for CommandBuildRunner {
    fn default() -> Self {
        Self::new(DEFAULT_BUILD_TOOL)
    }
}

impl BuildRunner for CommandBuildRunner {
    fn run(&self, dir: &Path, file: &Path) -> Result<BuildOutcome> {
        let command_line = format!("{} build {}", self.tool, file.display());
        debug!("Running `{}` in `{}`", command_line, dir.display());

        let output = match Command::new(&self.tool)
            .arg("build")
            .arg(file)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output() {
                Ok(output) => output,
                Err(source) => {
                    return err!(GamepackError::ExternalCommand { command: command_line, source });
                }
            };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !stdout.is_empty() {
            debug!("{} stdout: {}", command_line, stdout.trim_end());
        }
        if !stderr.is_empty() {
            debug!("{} stderr: {}", command_line, stderr.trim_end());
        }

        if output.status.success() {
            Ok(BuildOutcome::Success { file: file.to_path_buf(), stdout })
        } else {
            warn!("`{}` in `{}` exited with {}", command_line, dir.display(), output.status);
            Ok(BuildOutcome::Failed { file: file.to_path_buf(), code: output.status.code(), stderr })
        }
    }
}

/// Depth-first search for the first file ending in `extension`, siblings in name order.
/// The returned path is relative to `dir`.
pub fn find_code_file(dir: &impl AsRef<Path>, extension: &str) -> Option<PathBuf> {
    let dir = dir.as_ref();
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            // path().is_file() follows links, so a linked code file still counts
            entry.path().is_file() && entry.file_name().to_string_lossy().ends_with(extension)
        })
        .and_then(|entry| entry.path().strip_prefix(dir).ok().map(|p| p.to_path_buf()))
}

pub struct Builder<R: BuildRunner> {
    runner: R,
    extension: String,
}

impl<R: BuildRunner> Builder<R> {
    pub fn new(runner: R, extension: impl Into<String>) -> Self { Self { runner, extension: extension.into() } }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn build(&self, dir: &impl AsRef<Path>) -> Result<BuildOutcome> {
        let dir = dir.as_ref();
        match find_code_file(&dir, &self.extension) {
            Some(file) => {
                info!("Building `{}` in `{}`", file.display(), dir.display());
                self.runner.run(dir, &file)
            }
            None => {
                debug!("No `{}` file in `{}`, skipping the build", self.extension, dir.display());
                Ok(BuildOutcome::Skipped)
            }
        }
    }
}
