use serde::Serialize;
use tracing::debug;

use crate::core::{Orientation, SeriesModel, Viewport};
use crate::error::{ChartError, ChartResult};

use super::form_params::{
    CoercedParams, DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_UNIT, DEFAULT_WIDTH,
};
use super::service_config::{DEFAULT_FONT_FAMILY, ServiceConfig};

/// Fully resolved chart configuration handed to a surface backend.
///
/// Immutable once built; create one per request through [`ChartSpecBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    title: String,
    unit_label: String,
    model: SeriesModel,
    viewport: Viewport,
    font_family: String,
    orientation: Orientation,
}

impl ChartSpec {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn unit_label(&self) -> &str {
        &self.unit_label
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.model.columns()
    }

    #[must_use]
    pub fn model(&self) -> &SeriesModel {
        &self.model
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.viewport.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.viewport.height
    }

    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

#[derive(Debug, Clone)]
pub struct ChartSpecBuilder {
    model: SeriesModel,
    title: String,
    unit: Option<String>,
    viewport: Viewport,
    font_family: Option<String>,
    default_font: String,
    orientation: Orientation,
}

impl ChartSpecBuilder {
    #[must_use]
    pub fn new(model: SeriesModel) -> Self {
        Self {
            model,
            title: String::new(),
            unit: None,
            viewport: Viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            font_family: None,
            default_font: DEFAULT_FONT_FAMILY.to_owned(),
            orientation: Orientation::default(),
        }
    }

    /// Seeds every display option from a coerced submission.
    ///
    /// The submitted unit is only used when `config.honor_submitted_unit` is set.
    #[must_use]
    pub fn from_params(model: SeriesModel, params: &CoercedParams, config: &ServiceConfig) -> Self {
        let builder = Self::new(model)
            .with_title(params.title.clone())
            .with_viewport(params.viewport())
            .with_default_font(config.default_font.clone())
            .with_direction(&params.direction);
        let builder = match &params.font {
            Some(font) => builder.with_font_family(font.clone()),
            None => builder,
        };
        if config.honor_submitted_unit {
            builder.with_unit(params.unit.clone())
        } else {
            builder
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Overrides the fixed `(Unit)` label.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    #[must_use]
    pub fn with_default_font(mut self, family: impl Into<String>) -> Self {
        self.default_font = family.into();
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_direction(self, direction: &str) -> Self {
        self.with_orientation(Orientation::from_direction(direction))
    }

    pub fn build(self) -> ChartResult<ChartSpec> {
        self.model.ensure_renderable()?;
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        let title = if self.title.is_empty() {
            DEFAULT_TITLE.to_owned()
        } else {
            self.title
        };
        let unit_label = self
            .unit
            .filter(|unit| !unit.is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_owned());
        let font_family = self
            .font_family
            .filter(|family| !family.is_empty())
            .unwrap_or(self.default_font);

        debug!(
            series = self.model.len(),
            width = self.viewport.width,
            height = self.viewport.height,
            orientation = ?self.orientation,
            font = %font_family,
            "chart spec built"
        );

        Ok(ChartSpec {
            title,
            unit_label,
            model: self.model,
            viewport: self.viewport,
            font_family,
            orientation: self.orientation,
        })
    }
}
