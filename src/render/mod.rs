mod bar_chart;
mod frame;
mod null_backend;
mod primitives;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

pub use bar_chart::{BarChartLayout, BarChartStyle, ChartLayout, ValueAxis};
pub use frame::RenderFrame;
pub use null_backend::NullBackend;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

use crate::api::ChartSpec;
use crate::core::OutputFormat;
use crate::error::ChartResult;

/// Primitive counts of one completed draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

impl RenderStats {
    #[must_use]
    pub fn of_frame(frame: &RenderFrame) -> Self {
        Self {
            lines_drawn: frame.lines.len(),
            rects_drawn: frame.rects.len(),
            texts_drawn: frame.texts.len(),
        }
    }
}

/// Contract implemented by every output backend.
///
/// Each method writes exactly one file at `path` sized to the spec's viewport.
pub trait SurfaceBackend {
    fn name(&self) -> &'static str;

    /// PNG image surface.
    fn write_raster(&self, spec: &ChartSpec, path: &Path) -> ChartResult<RenderStats>;

    /// Single-page PDF surface.
    fn write_vector(&self, spec: &ChartSpec, path: &Path) -> ChartResult<RenderStats>;
}

impl<B: SurfaceBackend + ?Sized> SurfaceBackend for &B {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn write_raster(&self, spec: &ChartSpec, path: &Path) -> ChartResult<RenderStats> {
        (**self).write_raster(spec, path)
    }

    fn write_vector(&self, spec: &ChartSpec, path: &Path) -> ChartResult<RenderStats> {
        (**self).write_vector(spec, path)
    }
}

/// Dispatches `spec` to the backend surface matching `format`.
///
/// A failed render removes whatever partial file the backend left at `path`.
pub fn render_artifact<B: SurfaceBackend + ?Sized>(
    backend: &B,
    spec: &ChartSpec,
    format: OutputFormat,
    path: &Path,
) -> ChartResult<RenderStats> {
    let result = match format {
        OutputFormat::Raster => backend.write_raster(spec, path),
        OutputFormat::Vector => backend.write_vector(spec, path),
    };

    match result {
        Ok(stats) => {
            info!(
                backend = backend.name(),
                format = format.token(),
                path = %path.display(),
                rects = stats.rects_drawn,
                "artifact rendered"
            );
            Ok(stats)
        }
        Err(err) => {
            discard_partial(path);
            Err(err)
        }
    }
}

fn discard_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => warn!(path = %path.display(), "removed partial artifact"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(
            path = %path.display(),
            error = %err,
            "failed to remove partial artifact"
        ),
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoBackend, CairoContextRenderer};
