// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfoflowError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, InfoflowError>;

impl InfoflowError {
    /// Wraps an I/O error with the path that produced it.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        InfoflowError::Io {
            source,
            path: path.into(),
        }
    }

    /// True for errors caused by the caller's data rather than the environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            InfoflowError::Json(_)
                | InfoflowError::Toml(_)
                | InfoflowError::Pattern(_)
                | InfoflowError::InvalidConfig(_)
                | InfoflowError::InvalidInput(_)
        )
    }
}

// Allow `?` on std::io::Error by converting to InfoflowError::Io with unknown path.
impl From<std::io::Error> for InfoflowError {
    fn from(source: std::io::Error) -> Self {
        InfoflowError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for InfoflowError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map_or_else(|| PathBuf::from("<unknown>"), PathBuf::from);
        match e.into_io_error() {
            Some(source) => InfoflowError::Io { source, path },
            None => InfoflowError::InvalidInput(format!("filesystem loop at {}", path.display())),
        }
    }
}
