use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GamepackError {
    #[error("{message}")]
    InvalidArguments {
        message: String
    },

    #[error("Path `{0}` not found")]
    NotFound(PathBuf),

    #[error("Path `{0}` is not a directory")]
    NotADirectory(PathBuf),

    #[error("Couldn't execute `{command}`: {source}")]
    ExternalCommand {
        command: String,
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum GamepackIOError {
    #[error("IO Error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Error copying `{from}` into `{to}`: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}
