use std::path::Path;

use crate::api::ChartSpec;
use crate::error::ChartResult;
use crate::render::{BarChartLayout, ChartLayout, RenderStats, SurfaceBackend};

/// Headless backend that lays out and validates the frame but writes nothing.
///
/// Useful for request validation and tests on hosts without cairo.
#[derive(Debug, Default)]
pub struct NullBackend<L = BarChartLayout> {
    layout: L,
}

impl NullBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: ChartLayout> NullBackend<L> {
    #[must_use]
    pub fn with_layout(layout: L) -> Self {
        Self { layout }
    }

    fn lay_out(&self, spec: &ChartSpec) -> ChartResult<RenderStats> {
        let frame = self.layout.build_frame(spec)?;
        frame.validate()?;
        Ok(RenderStats::of_frame(&frame))
    }
}

impl<L: ChartLayout> SurfaceBackend for NullBackend<L> {
    fn name(&self) -> &'static str {
        "null"
    }

    fn write_raster(&self, spec: &ChartSpec, _path: &Path) -> ChartResult<RenderStats> {
        self.lay_out(spec)
    }

    fn write_vector(&self, spec: &ChartSpec, _path: &Path) -> ChartResult<RenderStats> {
        self.lay_out(spec)
    }
}
