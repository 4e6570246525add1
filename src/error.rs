// src/error.rs

//! Error types for ign2rpm

use thiserror::Error;

/// Result type for ign2rpm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a packing run
///
/// There is no partial-success mode: every variant is fatal to the run.
#[derive(Error, Debug)]
pub enum Error {
    /// Network fetch or local file read failed
    #[error("Could not load content from {locator}: {reason}")]
    InputAcquisition { locator: String, reason: String },

    /// A single decoder rejected the input
    #[error("{0}")]
    Parse(String),

    /// The document decoded but breaks a schema rule
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// No decoder in the chain accepted the input
    #[error("Unable to decipher config type: {source}")]
    UnrecognizedFormat {
        #[source]
        source: Box<Error>,
    },

    #[error("Unsupported butane variant: {variant}; supported variants ({supported})")]
    UnsupportedVariant { variant: String, supported: String },

    #[error(
        "Unsupported butane version: {version} for variant {variant}; supported versions ({supported})"
    )]
    UnsupportedVersion {
        variant: String,
        version: String,
        supported: String,
    },

    /// The Ignition payload embedded in a MachineConfig failed to decode
    #[error("Unable to convert machine config {name} to ignition: {source}")]
    EnvelopeUnwrap {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// A file's embedded contents failed to decode
    #[error("Could not decode contents of {path}: {reason}")]
    PayloadDecode { path: String, reason: String },

    /// Building or writing the package failed
    #[error("Unable to write package {path}: {reason}")]
    ArchiveWrite { path: String, reason: String },
}

impl Error {
    /// The innermost error, skipping aggregation wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::UnrecognizedFormat { source } | Error::EnvelopeUnwrap { source, .. } => {
                source.root()
            }
            other => other,
        }
    }
}
