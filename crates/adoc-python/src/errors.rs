use pyo3::prelude::*;
use std::io;
use thiserror::Error;

/// Errors that can occur during Python bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to initialize Python interpreter: {0}")]
    Initialization(String),

    #[error("Failed to import module '{0}': {1}")]
    Import(String, String),

    #[error("'{owner}' has no attribute '{attribute}': {message}")]
    AttributeNotFound {
        owner: String,
        attribute: String,
        message: String,
    },

    #[error("Call to '{target}' failed: {message}")]
    Invocation { target: String, message: String },

    #[error("Cannot convert result of '{target}' to {expected}: {message}")]
    Conversion {
        target: String,
        expected: &'static str,
        message: String,
    },

    #[error("Invalid arguments for '{target}': {message}")]
    InvalidArguments { target: String, message: String },

    #[error("Python error: {0}")]
    Python(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl BridgeError {
    /// Module import or attribute lookup failed: the toolkit could not be found,
    /// as opposed to failing while it ran.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            BridgeError::Initialization(_)
                | BridgeError::Import(..)
                | BridgeError::AttributeNotFound { .. }
        )
    }
}

/// Generic conversion from PyErr to BridgeError.
///
/// NOTE: This conversion loses the Python traceback. Calls into the toolkit go
/// through `describe_py_err` instead.
impl From<PyErr> for BridgeError {
    fn from(err: PyErr) -> Self {
        BridgeError::Python(format!("{}", err))
    }
}

/// Exception type, message and traceback (when there is one)
pub(crate) fn describe_py_err(py: Python<'_>, err: &PyErr) -> String {
    let mut message = format!("{}", err);
    if let Some(traceback) = err.traceback(py) {
        if let Ok(formatted) = traceback.format() {
            message.push('\n');
            message.push_str(formatted.trim_end());
        }
    }
    message
}
