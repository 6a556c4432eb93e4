use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid parameter `{field}`: {message}")]
    Parse { field: String, message: String },

    #[error("no labeled data rows to render")]
    EmptyModel,

    #[error("unsupported output format `{token}`")]
    UnsupportedFormat { token: String },

    #[error("failed to render `{}`: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("i/o failure on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid service config: {0}")]
    Config(String),
}

impl ChartError {
    pub(crate) fn parse(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Coarse category used in structured error reports.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::EmptyModel => ErrorKind::EmptyModel,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Io { .. } => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::Render { .. } | Self::InvalidViewport { .. } | Self::InvalidData(_) => {
                ErrorKind::Render
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Parse,
    EmptyModel,
    UnsupportedFormat,
    Render,
    Io,
    Config,
}

/// Serializable error payload handed back to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ChartError> for ErrorReport {
    fn from(err: &ChartError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
