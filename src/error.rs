//! Input-facing error kinds. The decider core never returns these: it has no
//! recoverable failures (see `config` and the decider module docs). These
//! cover file I/O, parsing, and CLI argument validation only.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed numeric line in {path}:{line}: {text:?}")]
    Parse {
        path: PathBuf,
        line: usize,
        text: String,
    },

    #[error("curve in {path} is empty after removing consecutive duplicates")]
    EmptyCurve { path: PathBuf },

    #[error("expected {expected} arguments, got {got}")]
    ArgCount { expected: &'static str, got: usize },

    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("query line in {path}:{line} has the wrong number of fields")]
    MalformedQuery { path: PathBuf, line: usize },
}
