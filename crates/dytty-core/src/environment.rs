//! Deployment environments and alias canonicalization

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ResolveOptions;
use crate::error::{CoreError, Result};
use crate::interpolate::PathContext;
use crate::paths::{PathPatterns, PathSet, Scope};

/// Canonical environment identifier
///
/// Aliases are accepted on input only; everything downstream sees one of
/// these three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EnvironmentName {
    Development,
    Integration,
    Production,
}

impl EnvironmentName {
    /// Every accepted alias, grouped by canonical name
    pub const ALIASES: &'static [(&'static str, EnvironmentName)] = &[
        ("dev", EnvironmentName::Development),
        ("development", EnvironmentName::Development),
        ("int", EnvironmentName::Integration),
        ("integration", EnvironmentName::Integration),
        ("prd", EnvironmentName::Production),
        ("prod", EnvironmentName::Production),
        ("production", EnvironmentName::Production),
    ];

    /// Canonicalize a user-supplied alias. Matching is case-sensitive.
    pub fn resolve(alias: &str) -> Result<Self> {
        Self::ALIASES
            .iter()
            .find(|(candidate, _)| *candidate == alias)
            .map(|(_, name)| *name)
            .ok_or_else(|| CoreError::InvalidEnvironmentName {
                name: alias.to_string(),
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentName::Development => "development",
            EnvironmentName::Integration => "integration",
            EnvironmentName::Production => "production",
        }
    }

    /// Comma-separated alias list for help output
    pub fn alias_list() -> String {
        Self::ALIASES
            .iter()
            .map(|(alias, _)| *alias)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s)
    }
}

impl TryFrom<String> for EnvironmentName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::resolve(&value)
    }
}

impl From<EnvironmentName> for String {
    fn from(name: EnvironmentName) -> Self {
        name.as_str().to_string()
    }
}

/// A resolved environment: canonical name plus its concrete files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub name: EnvironmentName,
    pub paths: PathSet,
}

impl Environment {
    /// Build an environment from an alias, resolving its configured paths
    /// against an environment-only context.
    pub fn new(alias: &str, options: &ResolveOptions) -> Result<Self> {
        let name = EnvironmentName::resolve(alias)?;
        tracing::debug!("creating environment {} from alias '{}'", name, alias);

        let context = PathContext::for_environment(name, &options.base_path);
        let paths = PathSet::resolve(
            &environment_patterns(options, name),
            &context,
            Scope::Environment,
        )?;

        Ok(Self { name, paths })
    }

    /// An environment with a canonical name and no files resolved yet
    pub(crate) fn unresolved(alias: &str) -> Result<Self> {
        Ok(Self {
            name: EnvironmentName::resolve(alias)?,
            paths: PathSet::default(),
        })
    }
}

/// Configured patterns for an environment
///
/// Environments contribute only `required` and `requiredValues` files to an
/// ordering, so `optional` patterns are dropped with a warning.
pub(crate) fn environment_patterns(
    options: &ResolveOptions,
    name: EnvironmentName,
) -> PathPatterns {
    let mut patterns = options.config.environment_paths(name);
    if !patterns.optional.is_empty() {
        tracing::warn!(
            "optional paths are not supported for environments, ignoring {:?} in {}",
            patterns.optional,
            name
        );
        patterns.optional.clear();
    }
    patterns
}
