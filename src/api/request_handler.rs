use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::{MAX_ROWS, OutputFormat, SeriesModel};
use crate::error::{ChartError, ChartResult, ErrorReport};
use crate::render::{SurfaceBackend, render_artifact};

use super::artifact_locator::{ArtifactLocator, Clock, OutputTarget, RequestOrigin, SystemClock};
use super::chart_spec::ChartSpecBuilder;
use super::form_params::FormParams;
use super::service_config::ServiceConfig;

/// One entry of the format selector on the form page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatOption {
    pub token: &'static str,
    pub label: &'static str,
}

/// Everything the page template needs to draw the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormContext {
    pub formats: Vec<FormatOption>,
    pub max_rows: usize,
    pub params: FormParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Result of one form submission, ready for the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Rendered {
        url: String,
        context: FormContext,
    },
    Failed {
        /// Plain-text body, `Error: <message>`.
        message: String,
        report: ErrorReport,
    },
}

impl SubmissionOutcome {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Runs the form-to-artifact pipeline for one request at a time.
///
/// Holds no per-request state, so one instance can serve concurrent requests
/// when its backend and clock are `Sync`.
#[derive(Debug)]
pub struct RequestHandler<B, C = SystemClock> {
    config: ServiceConfig,
    backend: B,
    locator: ArtifactLocator<C>,
}

impl<B: SurfaceBackend> RequestHandler<B> {
    pub fn new(config: ServiceConfig, backend: B) -> ChartResult<Self> {
        Self::with_clock(config, backend, SystemClock)
    }
}

impl<B: SurfaceBackend, C: Clock> RequestHandler<B, C> {
    pub fn with_clock(config: ServiceConfig, backend: B, clock: C) -> ChartResult<Self> {
        config.validate()?;
        let locator = ArtifactLocator::new(&config, clock);
        Ok(Self {
            config,
            backend,
            locator,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn locator(&self) -> &ArtifactLocator<C> {
        &self.locator
    }

    /// Form page context: the previous submission as-is, or the default
    /// parameters for a fresh form.
    #[must_use]
    pub fn form_context(&self, previous: Option<&FormParams>) -> FormContext {
        let params = previous.cloned().unwrap_or_else(FormParams::with_defaults);
        FormContext {
            formats: OutputFormat::ALL
                .into_iter()
                .map(|format| FormatOption {
                    token: format.token(),
                    label: format.label(),
                })
                .collect(),
            max_rows: MAX_ROWS,
            params,
            download_url: None,
        }
    }

    /// Renders one submission and returns where the artifact landed.
    ///
    /// Every validation step runs before the date directory is created, so a
    /// rejected submission leaves the filesystem untouched.
    pub fn handle_submission(
        &self,
        params: &FormParams,
        origin: &RequestOrigin,
    ) -> ChartResult<OutputTarget> {
        let coerced = params.coerce()?;
        let format = OutputFormat::from_token(&coerced.format)?;
        let model = SeriesModel::from_rows(coerced.rows.clone(), coerced.columns.clone());
        model.ensure_renderable()?;
        let spec = ChartSpecBuilder::from_params(model, &coerced, &self.config).build()?;

        let target = self.locator.locate(&coerced.filename, format, origin);
        self.locator.prepare(&target)?;
        let path = target.path();
        debug!(path = %path.display(), "rendering artifact");
        render_artifact(&self.backend, &spec, format, &path)?;

        Ok(target)
    }

    /// [`Self::handle_submission`] folded into a response for the HTTP layer.
    /// Failures become an `Error: ...` message plus a structured report.
    #[must_use]
    pub fn respond(&self, params: &FormParams, origin: &RequestOrigin) -> SubmissionOutcome {
        match self.handle_submission(params, origin) {
            Ok(target) => {
                info!(url = %target.url, "submission rendered");
                let mut context = self.form_context(Some(params));
                context.download_url = Some(target.url.clone());
                SubmissionOutcome::Rendered {
                    url: target.url,
                    context,
                }
            }
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "submission rejected");
                failure(&err)
            }
        }
    }
}

fn failure(err: &ChartError) -> SubmissionOutcome {
    SubmissionOutcome::Failed {
        message: format!("Error: {err}"),
        report: ErrorReport::from(err),
    }
}
