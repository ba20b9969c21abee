//! Error types for conversion runs and CLI commands

use adoc_bootstrap::BootstrapError;
use adoc_config::ConfigError;
use adoc_python::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running one conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Source document not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Toolkit could not be configured: {0}")]
    Configuration(#[source] BridgeError),

    #[error("Toolkit call failed: {0}")]
    Bridge(#[source] BridgeError),

    #[error("Conversion of {} failed: {error}", document.display())]
    Execution {
        document: PathBuf,
        #[source]
        error: BridgeError,
    },
}

impl ConversionError {
    /// Sort a bridge error raised before `execute`: failing to find or adapt the
    /// toolkit is a configuration problem, anything else is a failed call.
    pub fn from_setup(err: BridgeError) -> Self {
        if err.is_resolution() || matches!(err, BridgeError::Conversion { .. }) {
            ConversionError::Configuration(err)
        } else {
            ConversionError::Bridge(err)
        }
    }

    /// The underlying bridge error, if any
    pub fn bridge_error(&self) -> Option<&BridgeError> {
        match self {
            ConversionError::SourceNotFound(_) => None,
            ConversionError::Configuration(e) | ConversionError::Bridge(e) => Some(e),
            ConversionError::Execution { error, .. } => Some(error),
        }
    }
}

/// Errors surfaced by the `adoc` subcommands
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("AsciiDoc toolkit is not available (no usable archive in {})", .0.display())]
    ToolkitUnavailable(PathBuf),
}
