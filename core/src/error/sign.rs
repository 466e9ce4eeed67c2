use std::path::PathBuf;

use thiserror::Error;

use super::error::ErrorKind;
use crate::annotate::OverlayStep;

/// Failures reported by a document engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    #[error("document has no pages")]
    NoPages,
    #[error("page {page} not found (document has {count} pages)")]
    PageOutOfRange { page: u32, count: u32 },
    #[error("malformed page dictionary: {0}")]
    Malformed(String),
    #[error("invalid image: {0}")]
    Image(String),
    #[error("failed to serialize PDF: {0}")]
    Serialize(String),
}

impl From<lopdf::Error> for EngineError {
    fn from(e: lopdf::Error) -> Self {
        EngineError::Malformed(e.to_string())
    }
}

/// Every distinct way a signing run can fail. Nothing is retried.
#[derive(Error, Debug)]
pub enum SignError {
    #[error("signature path is required - please configure it first")]
    MissingSignature,
    #[error("failed to read signature file {}: {source}", path.display())]
    ReadSignature {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read input file {}: {source}", path.display())]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read PDF context: {0}")]
    OpenDocument(#[source] EngineError),
    #[error("failed to create temp file: {0}")]
    CreateTemp(#[source] std::io::Error),
    #[error("failed to write signature: {0}")]
    WriteTemp(#[source] std::io::Error),
    #[error("failed to create {step} watermark: {source}")]
    BuildOverlay {
        step: OverlayStep,
        #[source]
        source: EngineError,
    },
    #[error("failed to add {step}: {source}")]
    ApplyOverlay {
        step: OverlayStep,
        #[source]
        source: EngineError,
    },
    #[error("failed to write output file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SignError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSignature | Self::ReadSignature { .. } => ErrorKind::Configuration,
            Self::ReadSource { .. }
            | Self::CreateTemp(_)
            | Self::WriteTemp(_)
            | Self::WriteOutput { .. } => ErrorKind::Io,
            Self::OpenDocument(_) | Self::BuildOverlay { .. } | Self::ApplyOverlay { .. } => {
                ErrorKind::Engine
            }
        }
    }

    /// The overlay step that failed, if the failure happened inside the overlay chain.
    pub fn step(&self) -> Option<OverlayStep> {
        match self {
            Self::BuildOverlay { step, .. } | Self::ApplyOverlay { step, .. } => Some(*step),
            _ => None,
        }
    }
}
