//! ytt process adapter
//!
//! Invokes `ytt` synchronously:
//!
//! ```text
//! ytt -f <file>... [--data-values-inspect | --files-inspect] [--data-value key=value]...
//! ```

use dytty_core::{Overlay, ResolvedFileOrdering};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{EngineError, Result};
use crate::gateway::{Mode, TemplatingGateway};

/// Runs the `ytt` executable
#[derive(Debug, Clone)]
pub struct YttGateway {
    program: PathBuf,
}

impl Default for YttGateway {
    fn default() -> Self {
        Self::new(dytty_core::config::DEFAULT_YTT_PATH)
    }
}

impl YttGateway {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for one invocation
    pub fn args(files: &ResolvedFileOrdering, mode: Mode, overlays: &[Overlay]) -> Vec<OsString> {
        let mut args = Vec::with_capacity(files.len() * 2 + overlays.len() * 2 + 1);

        for file in files.iter() {
            args.push(OsString::from("-f"));
            args.push(file.as_os_str().to_os_string());
        }

        match mode {
            Mode::Render => {}
            Mode::InspectValues => args.push(OsString::from("--data-values-inspect")),
            Mode::InspectFiles => args.push(OsString::from("--files-inspect")),
        }

        for overlay in overlays {
            args.push(OsString::from("--data-value"));
            args.push(OsString::from(overlay.to_string()));
        }

        args
    }
}

impl TemplatingGateway for YttGateway {
    fn invoke(
        &self,
        files: &ResolvedFileOrdering,
        mode: Mode,
        overlays: &[Overlay],
    ) -> Result<Vec<u8>> {
        let args = Self::args(files, mode, overlays);
        tracing::debug!("running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| EngineError::EngineUnavailable {
                program: self.program.display().to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(EngineError::TemplatingEngine {
                status: output.status.to_string(),
                message: stderr,
            })
        }
    }
}
