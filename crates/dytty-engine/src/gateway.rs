//! Boundary to the external templating engine

use dytty_core::{Overlay, ResolvedFileOrdering};
use std::fmt;

use crate::error::Result;

/// What the templating engine should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Rendered manifests
    Render,
    /// The effective data values as a YAML mapping
    InspectValues,
    /// A YAML list of every file taking part
    InspectFiles,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Render => "render",
            Mode::InspectValues => "inspect-values",
            Mode::InspectFiles => "inspect-files",
        };
        f.write_str(s)
    }
}

/// Hands an ordered file list and overlays to a templating engine
///
/// Implementations:
/// - `YttGateway`: runs the `ytt` executable
/// - `MockGateway`: canned output for tests
pub trait TemplatingGateway {
    /// Run the engine once. Errors from the engine are passed through as
    /// `TemplatingEngine` without interpretation.
    fn invoke(
        &self,
        files: &ResolvedFileOrdering,
        mode: Mode,
        overlays: &[Overlay],
    ) -> Result<Vec<u8>>;
}

impl<T: TemplatingGateway + ?Sized> TemplatingGateway for &T {
    fn invoke(
        &self,
        files: &ResolvedFileOrdering,
        mode: Mode,
        overlays: &[Overlay],
    ) -> Result<Vec<u8>> {
        (**self).invoke(files, mode, overlays)
    }
}
