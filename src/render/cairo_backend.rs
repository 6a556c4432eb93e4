use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cairo::{Context, Format, ImageSurface, PdfSurface};
use pango::{FontDescription, Weight};

use crate::api::ChartSpec;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    BarChartLayout, ChartLayout, Color, RectPrimitive, RenderFrame, RenderStats, SurfaceBackend,
    TextHAlign,
};

/// Renderers that can paint a chart into an existing Cairo context, such as a
/// surface owned by the caller.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &self,
        context: &Context,
        spec: &ChartSpec,
    ) -> ChartResult<RenderStats>;
}

/// Cairo + Pango + PangoCairo surface backend.
///
/// Raster output goes through an ARGB32 image surface encoded as PNG; vector
/// output through a single-page PDF surface.
#[derive(Debug, Default)]
pub struct CairoBackend<L = BarChartLayout> {
    layout: L,
}

impl CairoBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: ChartLayout> CairoBackend<L> {
    #[must_use]
    pub fn with_layout(layout: L) -> Self {
        Self { layout }
    }

    fn paint_frame(
        &self,
        context: &Context,
        frame: &RenderFrame,
        font_family: &str,
    ) -> ChartResult<RenderStats> {
        frame.validate()?;

        apply_color(context, frame.background);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = RenderStats::default();

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for rect in &frame.rects {
            append_rect_path(context, *rect);
            apply_color(context, rect.fill_color);
            if rect.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                apply_color(context, rect.border_color);
                context.set_line_width(rect.border_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
            stats.rects_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let mut font_description = FontDescription::new();
            font_description.set_family(font_family);
            font_description.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
            if text.bold {
                font_description.set_weight(Weight::Bold);
            }
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        Ok(stats)
    }
}

impl<L: ChartLayout> CairoContextRenderer for CairoBackend<L> {
    fn render_on_cairo_context(
        &self,
        context: &Context,
        spec: &ChartSpec,
    ) -> ChartResult<RenderStats> {
        let frame = self.layout.build_frame(spec)?;
        self.paint_frame(context, &frame, spec.font_family())
    }
}

impl<L: ChartLayout> SurfaceBackend for CairoBackend<L> {
    fn name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    fn write_raster(&self, spec: &ChartSpec, path: &Path) -> ChartResult<RenderStats> {
        let (width, height) = spec.viewport().surface_size()?;
        let render_error = |message: String| ChartError::Render {
            path: path.to_path_buf(),
            message,
        };

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| render_error(format!("failed to create image surface: {err}")))?;
        let stats = {
            let context = Context::new(&surface)
                .map_err(|err| render_error(format!("failed to create cairo context: {err}")))?;
            self.render_on_cairo_context(&context, spec)
                .map_err(|err| with_path(err, path))?
        };

        let file = File::create(path).map_err(|err| ChartError::io(path, err))?;
        let mut writer = BufWriter::new(file);
        surface
            .write_to_png(&mut writer)
            .map_err(|err| render_error(format!("failed to encode png: {err}")))?;
        writer.flush().map_err(|err| ChartError::io(path, err))?;
        Ok(stats)
    }

    fn write_vector(&self, spec: &ChartSpec, path: &Path) -> ChartResult<RenderStats> {
        let viewport = spec.viewport();
        viewport.surface_size()?;
        let render_error = |message: String| ChartError::Render {
            path: path.to_path_buf(),
            message,
        };

        let surface = PdfSurface::new(f64::from(viewport.width), f64::from(viewport.height), path)
            .map_err(|err| render_error(format!("failed to create pdf surface: {err}")))?;
        let stats = {
            let context = Context::new(&surface)
                .map_err(|err| render_error(format!("failed to create cairo context: {err}")))?;
            let stats = self
                .render_on_cairo_context(&context, spec)
                .map_err(|err| with_path(err, path))?;
            context
                .show_page()
                .map_err(|err| render_error(format!("failed to finish page: {err}")))?;
            stats
        };

        surface.finish();
        surface
            .status()
            .map_err(|err| render_error(format!("failed to finalize pdf: {err}")))?;
        Ok(stats)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}

/// Attaches the artifact path to drawing errors raised before any file I/O.
fn with_path(err: ChartError, path: &Path) -> ChartError {
    match err {
        ChartError::InvalidData(message) => ChartError::Render {
            path: path.to_path_buf(),
            message,
        },
        ChartError::InvalidViewport { width, height } => ChartError::Render {
            path: path.to_path_buf(),
            message: format!("invalid viewport size: width={width}, height={height}"),
        },
        other => other,
    }
}
