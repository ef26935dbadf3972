//! Core error types

use thiserror::Error;

use crate::paths::Scope;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid environment name: '{name}'")]
    InvalidEnvironmentName { name: String },

    #[error("invalid application kind: '{kind}'")]
    InvalidKind { kind: String },

    #[error("no files found for required {scope} path: {pattern}")]
    RequiredPathNotFound { pattern: String, scope: Scope },

    #[error("invalid {scope} path pattern '{pattern}': {message}")]
    InvalidPathPattern {
        pattern: String,
        scope: Scope,
        message: String,
    },

    #[error("failed to parse path template '{template}': {message}")]
    TemplateParse { template: String, message: String },

    #[error("failed to render path template '{template}': {message}")]
    TemplateExec { template: String, message: String },

    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Values error: {message}")]
    Values { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
