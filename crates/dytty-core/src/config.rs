//! Configuration file handling
//!
//! Configuration is read from `.dytty.yaml` in the working directory unless
//! another file is named explicitly. Every section is optional and falls back
//! to the conventional layout:
//!
//! ```text
//! <base>/global/                      always included
//! <base>/envs/<env>/values.yaml       environment data values
//! <base>/<kind>/<app>/...             application files
//! <base>/templates/<name>             templates named by data values
//! ```
//!
//! A `paths` block replaces the built-in patterns of its scope wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::application::Kind;
use crate::environment::EnvironmentName;
use crate::error::{CoreError, Result};
use crate::paths::PathPatterns;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".dytty.yaml";

/// Default external engine executable
pub const DEFAULT_YTT_PATH: &str = "ytt";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DyttyConfig {
    /// Root of the layout
    pub base_path: Option<PathBuf>,

    /// Image tag override applied to every `apps` application
    pub image_tag: Option<String>,

    /// Path to the `ytt` executable
    pub ytt_path: Option<PathBuf>,

    pub kinds: KindsConfig,

    pub environments: BTreeMap<EnvironmentName, EnvironmentConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindsConfig {
    pub apps: AppsConfig,
    pub lambda: KindConfig,
    pub infra: KindConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppsConfig {
    pub paths: AppsPatterns,
}

impl Default for AppsConfig {
    fn default() -> Self {
        let mut base = default_kind_patterns();
        base.required_values.push(
            "{{ base_path }}/{{ kind }}/{{ name }}/{{ env.name }}/image-tag.yaml".to_string(),
        );
        Self {
            paths: AppsPatterns {
                base,
                templates: Vec::new(),
            },
        }
    }
}

/// Application patterns for the `apps` kind, which may also declare templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppsPatterns {
    #[serde(flatten)]
    pub base: PathPatterns,

    /// Template patterns, rendered after the values pass
    pub templates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindConfig {
    pub paths: PathPatterns,
}

impl Default for KindConfig {
    fn default() -> Self {
        Self {
            paths: default_kind_patterns(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub paths: PathPatterns,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            paths: PathPatterns {
                required: Vec::new(),
                required_values: vec![
                    "{{ base_path }}/envs/{{ env.name }}/values.yaml".to_string(),
                ],
                optional: Vec::new(),
            },
        }
    }
}

fn default_kind_patterns() -> PathPatterns {
    PathPatterns {
        required: Vec::new(),
        required_values: vec![
            "{{ base_path }}/{{ kind }}/{{ name }}/base-values.yaml".to_string(),
            "{{ base_path }}/{{ kind }}/{{ name }}/{{ env.name }}/values.yaml".to_string(),
        ],
        optional: vec![
            "{{ base_path }}/{{ kind }}/{{ name }}/resources/*.yaml".to_string(),
            "{{ base_path }}/{{ kind }}/{{ name }}/{{ env.name }}/overlays.yaml".to_string(),
        ],
    }
}

impl DyttyConfig {
    /// Load configuration
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// file is read when present and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CoreError::ConfigNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::load_from(path)
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load_from(default)
                } else {
                    tracing::debug!("no {} found, using built-in layout", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Patterns configured for an environment
    pub fn environment_paths(&self, name: EnvironmentName) -> PathPatterns {
        self.environments
            .get(&name)
            .map(|env| env.paths.clone())
            .unwrap_or_else(|| EnvironmentConfig::default().paths)
    }

    /// Required, required-values and optional patterns for a kind
    pub fn kind_paths(&self, kind: Kind) -> &PathPatterns {
        match kind {
            Kind::Apps => &self.kinds.apps.paths.base,
            Kind::Lambda => &self.kinds.lambda.paths,
            Kind::Infra => &self.kinds.infra.paths,
        }
    }

    /// Template patterns declared in configuration (apps only)
    pub fn template_patterns(&self, kind: Kind) -> &[String] {
        match kind {
            Kind::Apps => &self.kinds.apps.paths.templates,
            Kind::Lambda | Kind::Infra => &[],
        }
    }
}

/// Explicit inputs for one resolution
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Root directory of the layout
    pub base_path: PathBuf,

    /// Image tag that pins `app.image.tag`
    pub image_tag: Option<String>,

    pub config: DyttyConfig,
}

impl ResolveOptions {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            image_tag: None,
            config: DyttyConfig::default(),
        }
    }

    /// Combine flag values with a loaded configuration; flags win
    pub fn from_config(
        config: DyttyConfig,
        base_path: Option<PathBuf>,
        image_tag: Option<String>,
    ) -> Self {
        let base_path = base_path
            .or_else(|| config.base_path.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let image_tag = image_tag
            .filter(|tag| !tag.is_empty())
            .or_else(|| config.image_tag.clone())
            .filter(|tag| !tag.is_empty());

        Self {
            base_path,
            image_tag,
            config,
        }
    }

    pub fn with_image_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.image_tag = if tag.is_empty() { None } else { Some(tag) };
        self
    }

    pub fn with_config(mut self, config: DyttyConfig) -> Self {
        self.config = config;
        self
    }

    /// Directory holding global files
    pub fn global_dir(&self) -> PathBuf {
        self.base_path.join("global")
    }

    /// Directory holding template files named by data values
    pub fn templates_dir(&self) -> PathBuf {
        self.base_path.join("templates")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = DyttyConfig::default();

        assert_eq!(
            config.environment_paths(EnvironmentName::Integration).required_values,
            vec!["{{ base_path }}/envs/{{ env.name }}/values.yaml"]
        );
        assert_eq!(config.kind_paths(Kind::Apps).required_values.len(), 3);
        assert_eq!(config.kind_paths(Kind::Lambda).required_values.len(), 2);
        assert!(config.template_patterns(Kind::Apps).is_empty());
    }

    #[test]
    fn test_load_yaml() {
        let config = DyttyConfig::from_yaml(
            r#"
basePath: deploy
imageTag: "1.4.0"
kinds:
  apps:
    paths:
      requiredValues:
        - "{{ base_path }}/apps/{{ name }}/values.yaml"
      templates:
        - "{{ base_path }}/templates/common.yaml"
environments:
  prd:
    paths:
      requiredValues:
        - "{{ base_path }}/envs/prod.yaml"
"#,
        )
        .unwrap();

        assert_eq!(config.base_path, Some(PathBuf::from("deploy")));
        assert_eq!(config.image_tag.as_deref(), Some("1.4.0"));
        assert_eq!(
            config.kind_paths(Kind::Apps).required_values,
            vec!["{{ base_path }}/apps/{{ name }}/values.yaml"]
        );
        assert!(config.kind_paths(Kind::Apps).optional.is_empty());
        assert_eq!(config.template_patterns(Kind::Apps).len(), 1);

        // Alias keys are canonicalized
        assert_eq!(
            config.environment_paths(EnvironmentName::Production).required_values,
            vec!["{{ base_path }}/envs/prod.yaml"]
        );
        // Unlisted environments keep the default layout
        assert_eq!(
            config.environment_paths(EnvironmentName::Development).required_values,
            vec!["{{ base_path }}/envs/{{ env.name }}/values.yaml"]
        );
        // Unlisted kinds keep the default layout
        assert_eq!(config.kind_paths(Kind::Infra).required_values.len(), 2);
    }

    #[test]
    fn test_unknown_environment_key_rejected() {
        let result = DyttyConfig::from_yaml(
            r#"
environments:
  staging:
    paths: {}
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(DyttyConfig::from_yaml("").unwrap(), DyttyConfig::default());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let err = DyttyConfig::load(Some(Path::new("no/such/.dytty.yaml"))).unwrap_err();
        assert!(matches!(err, CoreError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dytty.yaml");
        std::fs::write(&path, "basePath: ops\nyttPath: /usr/local/bin/ytt\n").unwrap();

        let config = DyttyConfig::load(Some(&path)).unwrap();
        assert_eq!(config.base_path, Some(PathBuf::from("ops")));
        assert_eq!(config.ytt_path, Some(PathBuf::from("/usr/local/bin/ytt")));
    }

    #[test]
    fn test_flags_override_config() {
        let config = DyttyConfig {
            base_path: Some(PathBuf::from("from-config")),
            image_tag: Some("1.0.0".to_string()),
            ..Default::default()
        };

        let options = ResolveOptions::from_config(
            config.clone(),
            Some(PathBuf::from("from-flag")),
            Some("2.0.0".to_string()),
        );
        assert_eq!(options.base_path, PathBuf::from("from-flag"));
        assert_eq!(options.image_tag.as_deref(), Some("2.0.0"));

        let options = ResolveOptions::from_config(config, None, None);
        assert_eq!(options.base_path, PathBuf::from("from-config"));
        assert_eq!(options.image_tag.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_empty_image_tag_is_no_override() {
        let options =
            ResolveOptions::from_config(DyttyConfig::default(), None, Some(String::new()));
        assert_eq!(options.image_tag, None);
        assert_eq!(options.base_path, PathBuf::from("."));
    }

    #[test]
    fn test_empty_image_tag_flag_keeps_config_tag() {
        let config = DyttyConfig {
            image_tag: Some("1.0.0".to_string()),
            ..Default::default()
        };

        let options = ResolveOptions::from_config(config, None, Some(String::new()));
        assert_eq!(options.image_tag.as_deref(), Some("1.0.0"));
    }
}
