//! Dytty Core - layered path resolution for ytt deployments
//!
//! This crate decides which files apply to an application in an environment
//! and in what order:
//! - `EnvironmentName`: alias canonicalization (`dev` -> `development`, ...)
//! - `Application`: kind-specific paths and image metadata
//! - `PathSet`: interpolated, glob-expanded, existence-checked files
//! - `ResolvedFileOrdering`: the precedence order handed to ytt
//! - `Values`: data values read back from ytt

pub mod application;
pub mod config;
pub mod environment;
pub mod error;
pub mod interpolate;
pub mod ordering;
pub mod paths;
pub mod values;

pub use application::{
    AppVariant, Application, AppsState, DEFAULT_IMAGE_TAG, DEFAULT_REGISTRY, Image, Kind,
};
pub use config::{DyttyConfig, ResolveOptions};
pub use environment::{Environment, EnvironmentName};
pub use error::{CoreError, Result};
pub use interpolate::PathContext;
pub use ordering::ResolvedFileOrdering;
pub use paths::{PathPatterns, PathSet, Scope};
pub use values::{Overlay, Values};
