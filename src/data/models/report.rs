use std::{fmt::{self, Display}, path::PathBuf};

use super::manifest::Manifest;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BuildOutcome {
    Success {
        file: PathBuf,
        stdout: String,
    },
    /// No code file in the directory, nothing was built.
    Skipped,
    /// The tool ran but didn't succeed. `code` is `None` when killed by a signal.
    Failed {
        file: PathBuf,
        code: Option<i32>,
        stderr: String,
    },
    /// Building was turned off for this run.
    Disabled,
}

impl BuildOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, BuildOutcome::Failed { .. })
    }
}

impl Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildOutcome::Success { file, .. } => write!(f, "built {}", file.display()),
            BuildOutcome::Skipped => write!(f, "no code file, build skipped"),
            BuildOutcome::Failed { file, code: Some(code), .. } => {
                write!(f, "build of {} failed with status {}", file.display(), code)
            }
            BuildOutcome::Failed { file, code: None, .. } => {
                write!(f, "build of {} was terminated", file.display())
            }
            BuildOutcome::Disabled => write!(f, "copied"),
        }
    }
}

#[derive(Debug)]
pub enum DirectoryOutcome {
    Built(BuildOutcome),
    Error(String),
}

#[derive(Debug)]
pub struct DirectoryReport {
    pub name: String,
    pub target: PathBuf,
    pub outcome: DirectoryOutcome,
}

impl DirectoryReport {
    pub fn new(name: String, target: PathBuf, outcome: DirectoryOutcome) -> Self { Self { name, target, outcome } }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, DirectoryOutcome::Error(_))
    }
}

impl Display for DirectoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            DirectoryOutcome::Built(build) => write!(f, "{} -> {}: {}", self.name, self.target.display(), build),
            DirectoryOutcome::Error(message) => write!(f, "{}: ERROR {}", self.name, message),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub directories: Vec<DirectoryReport>,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
}

impl RunReport {
    pub fn new(directories: Vec<DirectoryReport>, manifest_path: PathBuf, manifest: Manifest) -> Self {
        Self { directories, manifest_path, manifest }
    }

    pub fn errors(&self) -> usize {
        self.directories.iter().filter(|d| d.is_error()).count()
    }

    pub fn failed_builds(&self) -> usize {
        self.directories.iter().filter(|d| {
            matches!(&d.outcome, DirectoryOutcome::Built(build) if build.is_failure())
        }).count()
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = format!("Processed {} directories", self.directories.len());

        for directory in self.directories.as_slice() {
            output.push_str(&format!("\n    - {}", directory));
        }

        output.push_str(&format!("\nManifest: {} ({} games)", self.manifest_path.display(), self.manifest.number_of_games()));

        if self.errors() > 0 {
            output.push_str(&format!("\nErrors: {}", self.errors()));
        }
        if self.failed_builds() > 0 {
            output.push_str(&format!("\nFailed builds: {}", self.failed_builds()));
        }

        write!(f, "{}", output)
    }
}
