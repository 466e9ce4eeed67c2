use std::path::PathBuf;

use thiserror::Error;

use super::sign::SignError;

/// Coarse classification used for exit codes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Io,
    Engine,
    Persistence,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config path")]
    NoConfigPath,
    #[error("failed to create config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to marshal config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Sign(#[from] SignError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Usage(String),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Sign(e) => e.kind(),
            Self::Config(_) => ErrorKind::Persistence,
            Self::Usage(_) => ErrorKind::Configuration,
            Self::Terminal(_) | Self::Io(_) | Self::Anyhow(_) => ErrorKind::Io,
        }
    }
}
