//! CLI error types with exit code handling
//!
//! Library errors are folded into one type that knows its exit code and
//! carries a hint for the user where one helps.

use dytty_core::{CoreError, EnvironmentName, Kind};
use dytty_engine::EngineError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Environment, kind, required file or configuration problem
    #[error("{message}")]
    #[diagnostic(code(dytty::cli::resolution))]
    Resolution {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A path pattern could not be parsed or rendered
    #[error("{message}")]
    #[diagnostic(code(dytty::cli::path_template))]
    PathTemplate {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// ytt failed or produced unexpected output
    #[error("{message}")]
    #[diagnostic(code(dytty::cli::engine))]
    Engine {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(dytty::cli::io))]
    Io { message: String },

    #[error("{message}")]
    #[diagnostic(code(dytty::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Resolution { .. } => exit_codes::RESOLUTION_ERROR,
            CliError::PathTemplate { .. } => exit_codes::PATH_TEMPLATE_ERROR,
            CliError::Engine { .. } => exit_codes::ENGINE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    fn resolution(message: impl Into<String>, help: Option<String>) -> Self {
        Self::Resolution {
            message: message.into(),
            help,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidEnvironmentName { .. } => Self::resolution(
                message,
                Some(format!("valid environments: {}", EnvironmentName::alias_list())),
            ),
            CoreError::InvalidKind { .. } => Self::resolution(
                message,
                Some(format!(
                    "valid kinds: {}",
                    Kind::ALL.map(|kind| kind.as_str()).join(", ")
                )),
            ),
            CoreError::RequiredPathNotFound { scope, .. } => Self::resolution(
                message,
                Some(format!(
                    "create the file or change the {} paths in the configuration",
                    scope
                )),
            ),
            CoreError::ConfigNotFound { .. } => {
                Self::resolution(message, Some("check the --config path".to_string()))
            }
            CoreError::InvalidPathPattern { .. } | CoreError::YamlParse(_) => {
                Self::resolution(message, None)
            }
            CoreError::TemplateParse { .. } | CoreError::TemplateExec { .. } => {
                Self::PathTemplate {
                    message,
                    help: Some(
                        "available variables: name, kind, env.name, base_path, image.name, \
                         image.tag, image.repository, image.registry"
                            .to_string(),
                    ),
                }
            }
            CoreError::Io(_) => Self::Io { message },
            CoreError::Values { .. } => Self::Other { message },
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Resolution(core) => core.into(),
            other => {
                let help = other.help().map(|help| help.to_string());
                Self::Engine {
                    message: other.to_string(),
                    help,
                }
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
