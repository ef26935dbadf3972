//! Two-pass resolution
//!
//! 1. Values pass: the values layers go through ytt in values-inspection
//!    mode. The resulting data values name the templates and may set image
//!    metadata.
//! 2. Template paths are interpolated against the updated application and
//!    expanded; each one must exist.
//! 3. Render pass: every layer, optional files and templates included, goes
//!    through ytt with the resolved image tag injected as an overlay.
//!
//! Path resolution failures abort before ytt is called, and a failed values
//! pass means no render pass.

use dytty_core::{Application, Kind, Overlay, ResolveOptions, ResolvedFileOrdering, Values};

use crate::error::{EngineError, Result};
use crate::gateway::{Mode, TemplatingGateway};

/// Data values read back from the values pass
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveValues {
    pub values: Values,

    /// Template names relative to the templates directory
    pub templates: Vec<String>,
}

impl EffectiveValues {
    /// Decode a values-inspection dump
    pub fn from_output(output: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(output)
            .map_err(|e| EngineError::decode(Mode::InspectValues, e.to_string()))?;
        let values = Values::mapping_from_yaml(text)
            .map_err(|e| EngineError::decode(Mode::InspectValues, e.to_string()))?;
        let templates = values
            .string_list("templates")
            .map_err(|e| EngineError::decode(Mode::InspectValues, e.to_string()))?;

        Ok(Self { values, templates })
    }
}

/// Orchestrates path resolution and the ytt passes for one invocation
pub struct ResolutionEngine<G> {
    gateway: G,
    options: ResolveOptions,
}

impl<G: TemplatingGateway> ResolutionEngine<G> {
    pub fn new(gateway: G, options: ResolveOptions) -> Self {
        Self { gateway, options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Build the application; no ytt call is made
    pub fn application(&self, kind: Kind, name: &str, env_alias: &str) -> Result<Application> {
        Ok(Application::new(kind, name, env_alias, &self.options)?)
    }

    /// Run ytt over the values layers and decode the data values
    pub fn values_pass(&self, app: &Application) -> Result<EffectiveValues> {
        let files = ResolvedFileOrdering::for_values(&self.options.global_dir(), app);
        let overlays = self.values_overlays(app);
        tracing::debug!("values pass over {} files", files.len());

        let output = self.gateway.invoke(&files, Mode::InspectValues, &overlays)?;
        let values = EffectiveValues::from_output(&output)?;
        tracing::debug!("templates from data values: {:?}", values.templates);
        Ok(values)
    }

    /// Fold data values into the application and resolve its templates
    pub fn prepare_render(&self, app: &mut Application, values: &EffectiveValues) -> Result<()> {
        app.apply_values(&values.values);
        app.resolve_templates(&values.templates, &self.options)?;
        Ok(())
    }

    /// Values pass, template resolution, then the final ordering
    pub fn resolve(&self, app: &mut Application) -> Result<ResolvedFileOrdering> {
        let values = self.values_pass(app)?;
        self.prepare_render(app, &values)?;
        Ok(ResolvedFileOrdering::for_render(
            &self.options.global_dir(),
            app,
        ))
    }

    /// Render manifests for `app`
    pub fn render(&self, app: &mut Application) -> Result<Vec<u8>> {
        let files = self.resolve(app)?;
        let overlays = self.render_overlays(app);
        tracing::debug!("render pass over {} files", files.len());
        self.gateway.invoke(&files, Mode::Render, &overlays)
    }

    /// Effective data values for `app`
    pub fn inspect_values(&self, app: &Application) -> Result<Values> {
        Ok(self.values_pass(app)?.values)
    }

    /// Every file ytt reads when rendering `app`
    pub fn inspect_files(&self, app: &mut Application) -> Result<Vec<String>> {
        let files = self.resolve(app)?;
        let overlays = self.render_overlays(app);
        let output = self.gateway.invoke(&files, Mode::InspectFiles, &overlays)?;

        let text = std::str::from_utf8(&output)
            .map_err(|e| EngineError::decode(Mode::InspectFiles, e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_yaml::from_str(text)
            .map_err(|e| EngineError::decode(Mode::InspectFiles, e.to_string()))
    }

    /// Only a pinned tag is forced during the values pass, so a tag declared
    /// in data values stays visible.
    fn values_overlays(&self, app: &Application) -> Vec<Overlay> {
        match app.image() {
            Some(image) if self.options.image_tag.is_some() => vec![Overlay::image_tag(&image.tag)],
            _ => Vec::new(),
        }
    }

    fn render_overlays(&self, app: &Application) -> Vec<Overlay> {
        app.image()
            .map(|image| vec![Overlay::image_tag(&image.tag)])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGateway;
    use dytty_core::CoreError;
    use std::path::PathBuf;

    const BASE: &str = "../dytty-core/test-data";

    const VALUES_DUMP: &str = r#"
app:
  name: example
  replicas: 2
  image:
    name: example
    tag: "1.4.2"
    repository: platform/example
    registry: ""
env:
  name: development
templates:
  - deployment.yaml
  - service.yaml
"#;

    fn engine(gateway: &MockGateway, options: ResolveOptions) -> ResolutionEngine<&MockGateway> {
        ResolutionEngine::new(gateway, options)
    }

    fn fixture(rel: &str) -> PathBuf {
        PathBuf::from(BASE).join(rel)
    }

    fn gateway() -> MockGateway {
        MockGateway::new()
            .with_output(Mode::InspectValues, VALUES_DUMP)
            .with_output(Mode::Render, "kind: Deployment\n")
    }

    #[test]
    fn test_render_two_passes() {
        let gateway = gateway();
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let output = engine.render(&mut app).unwrap();
        assert_eq!(output, b"kind: Deployment\n");

        let calls = gateway.invocations();
        assert_eq!(calls.len(), 2);

        let values = &calls[0];
        assert_eq!(values.mode, Mode::InspectValues);
        assert!(values.overlays.is_empty());
        assert_eq!(
            values.files,
            vec![
                fixture("global"),
                fixture("envs/development/values.yaml"),
                fixture("apps/example/base-values.yaml"),
                fixture("apps/example/development/values.yaml"),
                fixture("apps/example/development/image-tag.yaml"),
            ]
        );

        let render = &calls[1];
        assert_eq!(render.mode, Mode::Render);
        assert_eq!(render.overlays, vec![Overlay::image_tag("1.4.2")]);
        assert_eq!(
            render.files,
            vec![
                fixture("global"),
                fixture("envs/development/values.yaml"),
                fixture("apps/example/base-values.yaml"),
                fixture("apps/example/development/values.yaml"),
                fixture("apps/example/development/image-tag.yaml"),
                fixture("apps/example/resources/configmap.yaml"),
                fixture("apps/example/resources/service-account.yaml"),
                fixture("templates/deployment.yaml"),
                fixture("templates/service.yaml"),
            ]
        );
    }

    #[test]
    fn test_override_tag_wins() {
        let gateway = gateway();
        let engine = engine(&gateway, ResolveOptions::new(BASE).with_image_tag("9.9.9"));

        let mut app = engine.application(Kind::Apps, "example", "development").unwrap();
        engine.render(&mut app).unwrap();

        let calls = gateway.invocations();
        assert_eq!(calls[0].overlays, vec![Overlay::image_tag("9.9.9")]);
        assert_eq!(calls[1].overlays, vec![Overlay::image_tag("9.9.9")]);
        assert_eq!(app.image().unwrap().tag, "9.9.9");
        // Other image fields still come from data values
        assert_eq!(app.image().unwrap().repository, "platform/example");
        // An empty registry in data values keeps the default
        assert_eq!(app.image().unwrap().registry, "spanio.jfrog.io");
    }

    #[test]
    fn test_default_tag_without_data_value() {
        let gateway = MockGateway::new().with_output(Mode::InspectValues, "templates: []\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
        engine.render(&mut app).unwrap();

        let calls = gateway.invocations();
        assert_eq!(calls[1].overlays, vec![Overlay::image_tag("0.0.0")]);
    }

    #[test]
    fn test_numeric_tag_from_data_values() {
        let gateway = MockGateway::new().with_output(
            Mode::InspectValues,
            "app:\n  image:\n    tag: 20240101\ntemplates: []\n",
        );
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
        engine.render(&mut app).unwrap();

        let calls = gateway.invocations();
        assert_eq!(calls[1].overlays, vec![Overlay::image_tag("20240101")]);
    }

    #[test]
    fn test_lambda_ignores_missing_templates() {
        let gateway = MockGateway::new()
            .with_output(Mode::InspectValues, "templates:\n  - cronjob.yaml\n")
            .with_output(Mode::Render, "kind: Function\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Lambda, "worker", "dev").unwrap();
        engine.render(&mut app).unwrap();
        assert_eq!(gateway.call_count(), 2);
    }

    #[test]
    fn test_missing_required_values_makes_no_call() {
        let gateway = gateway();
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let err = engine.application(Kind::Apps, "example", "int").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Resolution(CoreError::RequiredPathNotFound { .. })
        ));
        assert_eq!(gateway.call_count(), 0);
    }

    #[test]
    fn test_invalid_environment_makes_no_call() {
        let gateway = gateway();
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let err = engine.application(Kind::Apps, "example", "invalid").unwrap_err();
        assert!(matches!(
            err,
            EngineError::Resolution(CoreError::InvalidEnvironmentName { .. })
        ));
        assert_eq!(gateway.call_count(), 0);
    }

    #[test]
    fn test_values_pass_failure_skips_render() {
        let gateway = MockGateway::new()
            .with_failure(Mode::InspectValues, "schema violation")
            .with_output(Mode::Render, "kind: Deployment\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let err = engine.render(&mut app).unwrap_err();

        assert!(matches!(err, EngineError::TemplatingEngine { .. }));
        assert_eq!(gateway.call_count(), 1);
    }

    #[test]
    fn test_missing_template_skips_render() {
        let gateway = MockGateway::new()
            .with_output(Mode::InspectValues, "templates:\n  - cronjob.yaml\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let err = engine.render(&mut app).unwrap_err();

        assert!(matches!(
            err,
            EngineError::Resolution(CoreError::RequiredPathNotFound { .. })
        ));
        assert_eq!(gateway.call_count(), 1);
    }

    #[test]
    fn test_values_dump_must_be_mapping() {
        let gateway = MockGateway::new().with_output(Mode::InspectValues, "- not\n- a mapping\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let err = engine.inspect_values(&app).unwrap_err();
        assert!(matches!(err, EngineError::OutputDecode { .. }), "{err:?}");
    }

    #[test]
    fn test_templates_must_be_strings() {
        let gateway =
            MockGateway::new().with_output(Mode::InspectValues, "templates: deployment.yaml\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let err = engine.values_pass(&app).unwrap_err();
        assert!(matches!(err, EngineError::OutputDecode { .. }), "{err:?}");
    }

    #[test]
    fn test_inspect_values() {
        let gateway = gateway();
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let values = engine.inspect_values(&app).unwrap();

        assert_eq!(values.get("app.replicas").unwrap(), 2);
        assert_eq!(gateway.call_count(), 1);
    }

    #[test]
    fn test_inspect_files() {
        let gateway = gateway().with_output(
            Mode::InspectFiles,
            "- global/schema.yaml\n- templates/deployment.yaml\n",
        );
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let files = engine.inspect_files(&mut app).unwrap();

        assert_eq!(files, vec!["global/schema.yaml", "templates/deployment.yaml"]);
        let calls = gateway.invocations();
        assert_eq!(calls[1].mode, Mode::InspectFiles);
        assert_eq!(calls[1].files.last(), Some(&fixture("templates/service.yaml")));
    }

    #[test]
    fn test_inspect_files_rejects_non_list() {
        let gateway = gateway().with_output(Mode::InspectFiles, "files: 3\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
        let err = engine.inspect_files(&mut app).unwrap_err();
        assert!(matches!(err, EngineError::OutputDecode { .. }), "{err:?}");
    }

    #[test]
    fn test_lambda_has_no_overlay() {
        let gateway = MockGateway::new()
            .with_output(Mode::InspectValues, "app:\n  name: worker\n")
            .with_output(Mode::Render, "kind: Function\n");
        let engine = engine(&gateway, ResolveOptions::new(BASE).with_image_tag("1.0.0"));

        let mut app = engine.application(Kind::Lambda, "worker", "dev").unwrap();
        engine.render(&mut app).unwrap();

        let calls = gateway.invocations();
        assert!(calls.iter().all(|call| call.overlays.is_empty()));
        assert_eq!(calls[0].files, calls[1].files);
    }

    #[test]
    fn test_render_is_deterministic() {
        let gateway = gateway();
        let engine = engine(&gateway, ResolveOptions::new(BASE));

        for _ in 0..2 {
            let mut app = engine.application(Kind::Apps, "example", "dev").unwrap();
            engine.render(&mut app).unwrap();
        }

        let calls = gateway.invocations();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], calls[2]);
        assert_eq!(calls[1], calls[3]);
    }
}
