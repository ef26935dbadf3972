//! Path template interpolation
//!
//! Patterns may reference application attributes before they are expanded:
//!
//! ```text
//! {{ base_path }}/{{ kind }}/{{ name }}/{{ env.name }}/values.yaml
//! {{ base_path }}/templates/{{ image.repository }}-deployment.yaml
//! ```
//!
//! Rendering is strict: a reference to an unknown attribute is an error
//! rather than an empty string.

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use std::path::Path;

use crate::application::{Image, Kind};
use crate::environment::EnvironmentName;
use crate::error::{CoreError, Result};

/// Data exposed to path templates
#[derive(Debug, Clone, Serialize)]
pub struct PathContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,

    pub env: EnvContext,

    pub base_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvContext {
    pub name: EnvironmentName,
}

impl PathContext {
    /// Context for environment-only resolution
    pub fn for_environment(env: EnvironmentName, base_path: &Path) -> Self {
        Self {
            name: None,
            kind: None,
            env: EnvContext { name: env },
            base_path: base_path.display().to_string(),
            image: None,
        }
    }

    /// Context for an application
    pub fn for_application(
        name: &str,
        kind: Kind,
        env: EnvironmentName,
        base_path: &Path,
        image: Option<&Image>,
    ) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: Some(kind),
            env: EnvContext { name: env },
            base_path: base_path.display().to_string(),
            image: image.cloned(),
        }
    }
}

/// No globals, filters or tests: only context attributes resolve
fn environment<'a>() -> Environment<'a> {
    let mut env = Environment::empty();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

/// Render a single path template
pub fn render(template: &str, context: &PathContext) -> Result<String> {
    render_with(&environment(), template, context)
}

/// Render templates in order
pub fn render_all(templates: &[String], context: &PathContext) -> Result<Vec<String>> {
    let env = environment();
    templates
        .iter()
        .map(|t| render_with(&env, t, context))
        .collect()
}

fn render_with(env: &Environment<'_>, template: &str, context: &PathContext) -> Result<String> {
    env.render_str(template, context).map_err(|e| match e.kind() {
        ErrorKind::SyntaxError => CoreError::TemplateParse {
            template: template.to_string(),
            message: e.to_string(),
        },
        _ => CoreError::TemplateExec {
            template: template.to_string(),
            message: e.to_string(),
        },
    })
}
