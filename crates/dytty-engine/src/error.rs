//! Engine error types

use dytty_core::CoreError;
use miette::Diagnostic;
use thiserror::Error;

/// Main engine error type
#[derive(Error, Debug, Diagnostic)]
pub enum EngineError {
    /// Path resolution failed before ytt was called
    #[error(transparent)]
    #[diagnostic(code(dytty::engine::resolution))]
    Resolution(#[from] CoreError),

    /// ytt rejected its input or failed to render
    #[error("ytt failed ({status}): {message}")]
    #[diagnostic(code(dytty::engine::ytt))]
    TemplatingEngine { status: String, message: String },

    /// The ytt executable could not be started
    #[error("failed to run '{program}': {source}")]
    #[diagnostic(
        code(dytty::engine::unavailable),
        help("install ytt or point --ytt at the executable")
    )]
    EngineUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// ytt output did not have the expected shape
    #[error("failed to decode ytt {mode} output: {message}")]
    #[diagnostic(code(dytty::engine::decode))]
    OutputDecode { mode: String, message: String },
}

impl EngineError {
    pub fn decode(mode: impl ToString, message: impl Into<String>) -> Self {
        Self::OutputDecode {
            mode: mode.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
