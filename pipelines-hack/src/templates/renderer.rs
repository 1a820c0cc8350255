//! Template renderer.

use super::error::TemplateError;
use super::helpers;
use handlebars::{
    handlebars_helper, no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Templates compiled into the binary, keyed by the name they are rendered by.
const TEMPLATES: &[(&str, &str)] = &[
    (
        "application.yaml",
        include_str!("../../templates/konflux/application.yaml"),
    ),
    ("tests.yaml", include_str!("../../templates/konflux/tests.yaml")),
    (
        "component.yaml",
        include_str!("../../templates/konflux/component.yaml"),
    ),
    ("image.yaml", include_str!("../../templates/konflux/image.yaml")),
    (
        "release-plan.yaml",
        include_str!("../../templates/konflux/release-plan.yaml"),
    ),
    (
        "update-sources.yaml",
        include_str!("../../templates/github/update-sources.yaml"),
    ),
    (
        "auto-merge.yaml",
        include_str!("../../templates/github/auto-merge.yaml"),
    ),
    (
        "docker-build.yaml",
        include_str!("../../templates/tekton/docker-build.yaml"),
    ),
    (
        "component-pull-request.yaml",
        include_str!("../../templates/tekton/component-pull-request.yaml"),
    ),
    (
        "component-push.yaml",
        include_str!("../../templates/tekton/component-push.yaml"),
    ),
    ("pr-body.md", include_str!("../../templates/labels/pr-body.md")),
    (
        "commit-message.txt",
        include_str!("../../templates/labels/commit-message.txt"),
    ),
];

/// Fragments shared between templates, included with `{{> name}}`.
const PARTIALS: &[(&str, &str)] = &[(
    "pipeline_params",
    include_str!("../../templates/partials/pipeline_params.yaml"),
)];

handlebars_helper!(hyphenize_helper: |value: str| helpers::hyphenize(value));
handlebars_helper!(basename_helper: |path: str| helpers::basename(path));
handlebars_helper!(indent_helper: |spaces: u64, text: str| {
    helpers::indent(usize::try_from(spaces).unwrap_or(usize::MAX), text)
});
handlebars_helper!(contains_helper: |haystack: str, needle: str| haystack.contains(needle));
handlebars_helper!(actions_expr_helper: |expr: str| format!("${{{{ {expr} }}}}"));
handlebars_helper!(pac_var_helper: |name: str| format!("{{{{{name}}}}}"));

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (YAML and markdown output)
/// - Strict mode (catches missing variables)
/// - `hyphenize`, `basename`, `indent`, `contains` and `eval` helpers
/// - `actions_expr` and `pac_var` for emitting `${{ … }}` and `{{…}}` verbatim
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);

    hbs.register_helper("hyphenize", Box::new(hyphenize_helper));
    hbs.register_helper("basename", Box::new(basename_helper));
    hbs.register_helper("indent", Box::new(indent_helper));
    hbs.register_helper("contains", Box::new(contains_helper));
    hbs.register_helper("eval", Box::new(eval_helper));
    hbs.register_helper("actions_expr", Box::new(actions_expr_helper));
    hbs.register_helper("pac_var", Box::new(pac_var_helper));

    hbs
}

/// Renders its first parameter as a template against the root context,
/// also inside `#each` blocks.
///
/// Usage: `{{eval script}}`
fn eval_helper(
    h: &Helper,
    hbs: &Handlebars,
    ctx: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let template = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("eval", 0))?;

    let rendered = hbs.render_template(template, ctx.data())?;

    out.write(&rendered)?;
    Ok(())
}

/// Renders the embedded manifest and message templates.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer with every embedded template and partial registered.
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template fails to parse.
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();

        for (name, source) in PARTIALS {
            handlebars.register_partial(name, *source)?;
        }
        for (name, source) in TEMPLATES {
            handlebars.register_template_string(name, *source)?;
        }

        Ok(Self { handlebars })
    }

    /// Returns whether a template with `name` is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Renders the named template with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, TemplateError> {
        Ok(self.handlebars.render(name, data)?)
    }

    /// Renders the named template into `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn render_to_file<T: Serialize>(
        &self,
        name: &str,
        data: &T,
        path: &Path,
    ) -> Result<(), TemplateError> {
        let rendered = self.render(name, data)?;

        let io_error = |source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, rendered).map_err(io_error)?;

        debug!(template = name, path = %path.display(), "Rendered template");
        Ok(())
    }

    /// Renders an ad-hoc template string with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed or rendering fails.
    pub fn render_str<T: Serialize>(&self, template: &str, data: &T) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}
