//! Mock templating gateway for testing
//!
//! Returns canned output per mode and records every invocation, so the
//! resolution engine can be exercised without a ytt installation.

use dytty_core::{Overlay, ResolvedFileOrdering};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::error::{EngineError, Result};
use crate::gateway::{Mode, TemplatingGateway};

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub files: Vec<PathBuf>,
    pub mode: Mode,
    pub overlays: Vec<Overlay>,
}

#[derive(Debug, Clone)]
enum Response {
    Output(Vec<u8>),
    Failure(String),
}

/// In-memory gateway
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    responses: Arc<RwLock<HashMap<Mode, Response>>>,
    invocations: Arc<RwLock<Vec<Invocation>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `mode` with `output`
    pub fn with_output(self, mode: Mode, output: impl Into<Vec<u8>>) -> Self {
        self.set(mode, Response::Output(output.into()));
        self
    }

    /// Fail `mode` with an engine error carrying `message`
    pub fn with_failure(self, mode: Mode, message: impl Into<String>) -> Self {
        self.set(mode, Response::Failure(message.into()));
        self
    }

    fn set(&self, mode: Mode, response: Response) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(mode, response);
        }
    }

    /// Every call made so far, oldest first
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.invocations.read().map(|calls| calls.len()).unwrap_or(0)
    }
}

impl TemplatingGateway for MockGateway {
    fn invoke(
        &self,
        files: &ResolvedFileOrdering,
        mode: Mode,
        overlays: &[Overlay],
    ) -> Result<Vec<u8>> {
        if let Ok(mut calls) = self.invocations.write() {
            calls.push(Invocation {
                files: files.files().to_vec(),
                mode,
                overlays: overlays.to_vec(),
            });
        }

        let response = self
            .responses
            .read()
            .ok()
            .and_then(|responses| responses.get(&mode).cloned());

        match response {
            Some(Response::Output(bytes)) => Ok(bytes),
            Some(Response::Failure(message)) => Err(EngineError::TemplatingEngine {
                status: "exit status: 1".to_string(),
                message,
            }),
            None => Ok(Vec::new()),
        }
    }
}
