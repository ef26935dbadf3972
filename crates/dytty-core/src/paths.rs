//! Path patterns, glob expansion and resolved path sets
//!
//! Patterns are declared per scope in the configuration. Resolution renders
//! each pattern as a path template, expands it as a glob and enforces the
//! required/optional rules:
//!
//! - `required` and `requiredValues` patterns must each match at least one file
//! - `optional` patterns may match nothing
//! - empty patterns are skipped
//!
//! Matches keep declaration order; the matches of a single pattern are sorted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{CoreError, Result};
use crate::interpolate::{PathContext, render_all};

/// Level at which a set of paths is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Environment,
    Application,
    Template,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Scope::Environment => "environment",
            Scope::Application => "application",
            Scope::Template => "template",
        };
        f.write_str(s)
    }
}

/// Unresolved path templates for one scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathPatterns {
    pub required: Vec<String>,
    pub required_values: Vec<String>,
    pub optional: Vec<String>,
}

/// Concrete, existence-checked files for one scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSet {
    pub required: Vec<PathBuf>,
    pub required_values: Vec<PathBuf>,
    pub optional: Vec<PathBuf>,
}

impl PathSet {
    /// Interpolate and expand every slot of `patterns`
    pub fn resolve(patterns: &PathPatterns, context: &PathContext, scope: Scope) -> Result<Self> {
        let required = expand(true, &render_all(&patterns.required, context)?, scope)?;
        let required_values =
            expand(true, &render_all(&patterns.required_values, context)?, scope)?;
        let optional = expand(false, &render_all(&patterns.optional, context)?, scope)?;

        tracing::debug!(
            "{} paths: required={:?} requiredValues={:?} optional={:?}",
            scope,
            required,
            required_values,
            optional
        );

        Ok(Self {
            required,
            required_values,
            optional,
        })
    }
}

/// Expand already-interpolated glob patterns into existing files
pub fn expand(required: bool, patterns: &[String], scope: Scope) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.is_empty() {
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| CoreError::InvalidPathPattern {
            pattern: pattern.clone(),
            scope,
            message: e.to_string(),
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => matches.push(path),
                Err(e) => {
                    tracing::warn!("skipping unreadable path while matching '{}': {}", pattern, e)
                }
            }
        }

        if matches.is_empty() {
            if required {
                return Err(CoreError::RequiredPathNotFound {
                    pattern: pattern.clone(),
                    scope,
                });
            }
            tracing::debug!("optional {} path matched nothing: {}", scope, pattern);
            continue;
        }

        matches.sort();
        files.extend(matches);
    }

    Ok(files)
}
