//! Applications and their kind-specific shapes

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::ResolveOptions;
use crate::environment::{Environment, environment_patterns};
use crate::error::{CoreError, Result};
use crate::interpolate::{PathContext, render_all};
use crate::paths::{PathSet, Scope, expand};
use crate::values::Values;

/// Image tag used when nothing else sets one
pub const DEFAULT_IMAGE_TAG: &str = "0.0.0";

/// Registry used when nothing else sets one
pub const DEFAULT_REGISTRY: &str = "spanio.jfrog.io";

/// Application kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Apps,
    Lambda,
    Infra,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Apps, Kind::Lambda, Kind::Infra];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Apps => "apps",
            Kind::Lambda => "lambda",
            Kind::Infra => "infra",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::InvalidKind {
                kind: s.to_string(),
            })
    }
}

/// Container image metadata for the `apps` kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    pub tag: String,
    pub repository: String,
    pub registry: String,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            name: String::new(),
            tag: DEFAULT_IMAGE_TAG.to_string(),
            repository: String::new(),
            registry: DEFAULT_REGISTRY.to_string(),
        }
    }
}

impl Image {
    /// Copy `app.image.*` scalars from data values
    ///
    /// Numbers and booleans are taken in their YAML spelling, so `tag: 20240101`
    /// reads as `"20240101"`. The tag is left alone when `keep_tag` is set.
    pub fn apply_values(&mut self, values: &Values, keep_tag: bool) {
        let field = |key: &str| {
            values
                .get(&format!("app.image.{}", key))
                .and_then(scalar_string)
                .filter(|s| !s.is_empty())
        };

        if let Some(name) = field("name") {
            self.name = name;
        }
        if let Some(repository) = field("repository") {
            self.repository = repository;
        }
        if let Some(registry) = field("registry") {
            self.registry = registry;
        }
        if !keep_tag {
            if let Some(tag) = field("tag") {
                self.tag = tag;
            }
        }
    }
}

fn scalar_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// State carried only by the `apps` kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppsState {
    pub image: Image,

    /// True when the tag came from an explicit override
    pub tag_pinned: bool,

    /// Concrete template files, filled in after the values pass
    pub templates: Vec<PathBuf>,
}

/// Kind-specific shape of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AppVariant {
    Apps(AppsState),
    Lambda,
    Infra,
}

impl AppVariant {
    fn new(kind: Kind, image_tag: Option<&str>) -> Self {
        match kind {
            Kind::Apps => {
                let mut image = Image::default();
                if let Some(tag) = image_tag {
                    image.tag = tag.to_string();
                }
                AppVariant::Apps(AppsState {
                    image,
                    tag_pinned: image_tag.is_some(),
                    templates: Vec::new(),
                })
            }
            Kind::Lambda => AppVariant::Lambda,
            Kind::Infra => AppVariant::Infra,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            AppVariant::Apps(_) => Kind::Apps,
            AppVariant::Lambda => Kind::Lambda,
            AppVariant::Infra => Kind::Infra,
        }
    }
}

/// An application resolved for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub name: String,
    pub env: Environment,
    pub paths: PathSet,
    pub variant: AppVariant,
}

impl Application {
    /// Build an application and resolve its own and its environment's paths
    ///
    /// The environment alias is checked before any pattern is expanded, and
    /// environment paths resolve before application paths.
    /// Templates are not resolved here; see [`Application::resolve_templates`].
    pub fn new(kind: Kind, name: &str, env_alias: &str, options: &ResolveOptions) -> Result<Self> {
        let env = Environment::unresolved(env_alias)?;
        tracing::debug!("creating application {}/{} in {}", kind, name, env.name);

        let mut app = Self {
            name: name.to_string(),
            env,
            paths: PathSet::default(),
            variant: AppVariant::new(kind, options.image_tag.as_deref()),
        };

        let context = app.path_context(options);
        app.env.paths = PathSet::resolve(
            &environment_patterns(options, app.env.name),
            &context,
            Scope::Environment,
        )?;
        app.paths =
            PathSet::resolve(options.config.kind_paths(kind), &context, Scope::Application)?;

        Ok(app)
    }

    pub fn kind(&self) -> Kind {
        self.variant.kind()
    }

    pub fn image(&self) -> Option<&Image> {
        match &self.variant {
            AppVariant::Apps(state) => Some(&state.image),
            _ => None,
        }
    }

    /// Resolved template files; always empty for kinds without templates
    pub fn templates(&self) -> &[PathBuf] {
        match &self.variant {
            AppVariant::Apps(state) => &state.templates,
            _ => &[],
        }
    }

    /// Template context exposing this application's attributes
    pub fn path_context(&self, options: &ResolveOptions) -> PathContext {
        PathContext::for_application(
            &self.name,
            self.kind(),
            self.env.name,
            &options.base_path,
            self.image(),
        )
    }

    /// Take image metadata from data values (a pinned tag is kept)
    pub fn apply_values(&mut self, values: &Values) {
        if let AppVariant::Apps(state) = &mut self.variant {
            state.image.apply_values(values, state.tag_pinned);
            tracing::debug!("image after data values: {:?}", state.image);
        }
    }

    /// Interpolate and expand template patterns
    ///
    /// Configured patterns come first, followed by the names listed in data
    /// values, each relative to the templates directory. Every template must
    /// exist. Kinds without templates skip expansion entirely.
    pub fn resolve_templates(&mut self, names: &[String], options: &ResolveOptions) -> Result<()> {
        let kind = self.kind();
        if !matches!(self.variant, AppVariant::Apps(_)) {
            if !names.is_empty() {
                tracing::warn!(
                    "{} applications do not render templates, ignoring {:?}",
                    kind,
                    names
                );
            }
            return Ok(());
        }

        let mut patterns: Vec<String> = options.config.template_patterns(kind).to_vec();
        let templates_dir = options.templates_dir();
        patterns.extend(
            names
                .iter()
                .map(|name| templates_dir.join(name).display().to_string()),
        );

        let context = self.path_context(options);
        let templates = expand(true, &render_all(&patterns, &context)?, Scope::Template)?;
        tracing::debug!("template paths: {:?}", templates);

        if let AppVariant::Apps(state) = &mut self.variant {
            state.templates = templates;
        }
        Ok(())
    }
}
