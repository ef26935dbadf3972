//! CLI commands

pub mod files;
pub mod render;
pub mod values;

use dytty_core::{DyttyConfig, ResolveOptions, config::DEFAULT_YTT_PATH};
use dytty_engine::{ResolutionEngine, YttGateway};
use std::path::PathBuf;

use crate::error::Result;

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub base_path: Option<PathBuf>,
    pub image_tag: Option<String>,
    pub ytt: Option<PathBuf>,
}

impl GlobalOptions {
    /// Load configuration and build an engine backed by `ytt`
    ///
    /// Flags take precedence over the configuration file.
    pub fn engine(&self) -> Result<ResolutionEngine<YttGateway>> {
        let config = DyttyConfig::load(self.config.as_deref())?;
        let program = self
            .ytt
            .clone()
            .or_else(|| config.ytt_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_YTT_PATH));
        let options =
            ResolveOptions::from_config(config, self.base_path.clone(), self.image_tag.clone());

        tracing::debug!(
            "base path {}, image tag {:?}, ytt {}",
            options.base_path.display(),
            options.image_tag,
            program.display()
        );

        Ok(ResolutionEngine::new(YttGateway::new(program), options))
    }
}
