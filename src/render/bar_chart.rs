use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::ChartSpec;
use crate::core::Orientation;
use crate::error::ChartResult;
use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

/// Builds a backend-agnostic scene from a chart spec.
///
/// This is the only drawing contract surface backends rely on: they hand a
/// spec in and paint whatever frame comes back.
pub trait ChartLayout {
    fn build_frame(&self, spec: &ChartSpec) -> ChartResult<RenderFrame>;
}

/// Visual tuning knobs for [`BarChartLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartStyle {
    pub padding_px: f64,
    pub title_font_size_px: f64,
    pub label_font_size_px: f64,
    pub value_axis_extent_px: f64,
    pub category_axis_extent_px: f64,
    pub legend_width_px: f64,
    pub legend_row_height_px: f64,
    pub legend_swatch_px: f64,
    /// Share of a category slot covered by its bar group, in `(0, 1]`.
    pub group_fill_ratio: f64,
    pub target_tick_count: usize,
    pub grid_color: Color,
    pub axis_color: Color,
    pub text_color: Color,
    pub palette: Vec<Color>,
}

impl Default for BarChartStyle {
    fn default() -> Self {
        Self {
            padding_px: 12.0,
            title_font_size_px: 18.0,
            label_font_size_px: 11.0,
            value_axis_extent_px: 56.0,
            category_axis_extent_px: 28.0,
            legend_width_px: 120.0,
            legend_row_height_px: 20.0,
            legend_swatch_px: 12.0,
            group_fill_ratio: 0.8,
            target_tick_count: 5,
            grid_color: Color::rgb(0.85, 0.85, 0.85),
            axis_color: Color::rgb(0.25, 0.25, 0.25),
            text_color: Color::rgb(0.1, 0.1, 0.1),
            palette: vec![
                Color::from_hex(0x3465a4),
                Color::from_hex(0xcc0000),
                Color::from_hex(0x73d216),
                Color::from_hex(0xf57900),
                Color::from_hex(0x75507b),
                Color::from_hex(0xc4a000),
            ],
        }
    }
}

impl BarChartStyle {
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::BLACK;
        }
        self.palette[index % self.palette.len()]
    }
}

/// Grouped bar chart: one group per column, one bar per series.
#[derive(Debug, Clone, Default)]
pub struct BarChartLayout {
    style: BarChartStyle,
}

impl BarChartLayout {
    #[must_use]
    pub fn new(style: BarChartStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> &BarChartStyle {
        &self.style
    }
}

/// Inclusive value range snapped to a round step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueAxis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ValueAxis {
    /// Covers `lo..=hi` and zero with steps of 1, 2 or 5 times a power of ten,
    /// never finer than 1 since values are integers.
    #[must_use]
    pub fn covering(lo: i64, hi: i64, target_ticks: usize) -> Self {
        let lo = lo.min(0) as f64;
        let mut hi = hi.max(0) as f64;
        if hi <= lo {
            hi = lo + 1.0;
        }

        let raw = (hi - lo) / target_ticks.max(1) as f64;
        let magnitude = 10f64.powf(raw.log10().floor());
        let normalized = raw / magnitude;
        let nice = if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };
        let step = (nice * magnitude).max(1.0);

        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    #[must_use]
    pub fn ticks(self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count)
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }

    /// Position of `value` as a 0..=1 fraction of the axis.
    #[must_use]
    pub fn fraction(self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn right(self) -> f64 {
        self.left + self.width
    }

    fn bottom(self) -> f64 {
        self.top + self.height
    }
}

impl ChartLayout for BarChartLayout {
    fn build_frame(&self, spec: &ChartSpec) -> ChartResult<RenderFrame> {
        let style = &self.style;
        let viewport = spec.viewport();
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);
        let model = spec.model();
        let mut frame = RenderFrame::new(viewport);

        frame.push_text(
            TextPrimitive::new(
                spec.title(),
                width / 2.0,
                style.padding_px,
                style.title_font_size_px,
                style.text_color,
                TextHAlign::Center,
            )
            .bold(),
        );

        let header = style.padding_px * 2.0 + style.title_font_size_px;
        let unit_band = style.label_font_size_px + style.padding_px;
        let plot_top = header + unit_band;
        let plot = PlotArea {
            left: style.padding_px + style.value_axis_extent_px,
            top: plot_top,
            width: (width
                - style.padding_px * 3.0
                - style.value_axis_extent_px
                - style.legend_width_px)
                .max(0.0),
            height: (height - plot_top - style.category_axis_extent_px - style.padding_px)
                .max(0.0),
        };

        frame.push_text(TextPrimitive::new(
            spec.unit_label(),
            style.padding_px,
            header,
            style.label_font_size_px,
            style.text_color,
            TextHAlign::Left,
        ));

        let (lo, hi) = model.value_range().unwrap_or((0, 0));
        let axis = ValueAxis::covering(lo, hi, style.target_tick_count);
        let vertical = spec.orientation() == Orientation::Vertical;

        // Value grid with tick labels.
        for tick in axis.ticks() {
            let label = format!("{tick:.0}");
            let fraction = axis.fraction(tick);
            if vertical {
                let y = plot.bottom() - fraction * plot.height;
                frame.push_line(LinePrimitive::new(
                    plot.left,
                    y,
                    plot.right(),
                    y,
                    1.0,
                    style.grid_color,
                ));
                frame.push_text(TextPrimitive::new(
                    label,
                    plot.left - style.padding_px / 2.0,
                    y - style.label_font_size_px * 0.6,
                    style.label_font_size_px,
                    style.text_color,
                    TextHAlign::Right,
                ));
            } else {
                let x = plot.left + fraction * plot.width;
                frame.push_line(LinePrimitive::new(
                    x,
                    plot.top,
                    x,
                    plot.bottom(),
                    1.0,
                    style.grid_color,
                ));
                frame.push_text(TextPrimitive::new(
                    label,
                    x,
                    plot.bottom() + style.padding_px / 2.0,
                    style.label_font_size_px,
                    style.text_color,
                    TextHAlign::Center,
                ));
            }
        }

        // Baseline at zero plus the category axis.
        let zero = axis.fraction(0.0);
        if vertical {
            let y = plot.bottom() - zero * plot.height;
            frame.push_line(LinePrimitive::new(
                plot.left,
                y,
                plot.right(),
                y,
                1.5,
                style.axis_color,
            ));
            frame.push_line(LinePrimitive::new(
                plot.left,
                plot.top,
                plot.left,
                plot.bottom(),
                1.5,
                style.axis_color,
            ));
        } else {
            let x = plot.left + zero * plot.width;
            frame.push_line(LinePrimitive::new(
                x,
                plot.top,
                x,
                plot.bottom(),
                1.5,
                style.axis_color,
            ));
            frame.push_line(LinePrimitive::new(
                plot.left,
                plot.bottom(),
                plot.right(),
                plot.bottom(),
                1.5,
                style.axis_color,
            ));
        }

        let slots = model.slot_count();
        if slots > 0 && !model.is_empty() {
            let axis_extent = if vertical { plot.width } else { plot.height };
            let slot_extent = axis_extent / slots as f64;
            let group_extent = slot_extent * style.group_fill_ratio.clamp(0.05, 1.0);
            let bar_extent = group_extent / model.len() as f64;

            for (slot, column) in (0..slots).map(|slot| (slot, model.columns().get(slot))) {
                let slot_start = slot as f64 * slot_extent;
                let group_start = slot_start + (slot_extent - group_extent) / 2.0;

                if let Some(column) = column.filter(|column| !column.is_empty()) {
                    let center = slot_start + slot_extent / 2.0;
                    let text = if vertical {
                        TextPrimitive::new(
                            column.as_str(),
                            plot.left + center,
                            plot.bottom() + style.padding_px / 2.0,
                            style.label_font_size_px,
                            style.text_color,
                            TextHAlign::Center,
                        )
                    } else {
                        TextPrimitive::new(
                            column.as_str(),
                            plot.left - style.padding_px / 2.0,
                            plot.top + center - style.label_font_size_px * 0.6,
                            style.label_font_size_px,
                            style.text_color,
                            TextHAlign::Right,
                        )
                    };
                    frame.push_text(text);
                }

                for (index, series) in model.series().iter().enumerate() {
                    let Some(&value) = series.values().get(slot) else {
                        continue;
                    };
                    let offset = group_start + index as f64 * bar_extent;
                    let value_fraction = axis.fraction(value as f64);
                    let (from, to) = (zero.min(value_fraction), zero.max(value_fraction));
                    let color = style.series_color(index);
                    let rect = if vertical {
                        RectPrimitive::filled(
                            plot.left + offset,
                            plot.bottom() - to * plot.height,
                            bar_extent,
                            (to - from) * plot.height,
                            color,
                        )
                    } else {
                        RectPrimitive::filled(
                            plot.left + from * plot.width,
                            plot.top + offset,
                            (to - from) * plot.width,
                            bar_extent,
                            color,
                        )
                    };
                    frame.push_rect(rect);
                }
            }
        }

        // Legend, one swatch per series in model order.
        let legend_left = width - style.padding_px - style.legend_width_px;
        for (index, series) in model.series().iter().enumerate() {
            let row_top = plot.top + index as f64 * style.legend_row_height_px;
            frame.push_rect(
                RectPrimitive::filled(
                    legend_left,
                    row_top,
                    style.legend_swatch_px,
                    style.legend_swatch_px,
                    style.series_color(index),
                )
                .with_border(1.0, style.axis_color),
            );
            frame.push_text(TextPrimitive::new(
                series.label(),
                legend_left + style.legend_swatch_px + style.padding_px / 2.0,
                row_top - 1.0,
                style.label_font_size_px,
                style.text_color,
                TextHAlign::Left,
            ));
        }

        trace!(
            lines = frame.lines.len(),
            rects = frame.rects.len(),
            texts = frame.texts.len(),
            slots,
            "bar chart frame built"
        );
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::ValueAxis;

    #[test]
    fn value_axis_snaps_to_round_steps() {
        let axis = ValueAxis::covering(3, 1162, 5);
        assert_eq!(axis.step, 500.0);
        assert_eq!(axis.min, 0.0);
        assert_eq!(axis.max, 1500.0);
        assert_eq!(axis.ticks(), vec![0.0, 500.0, 1000.0, 1500.0]);
    }

    #[test]
    fn value_axis_includes_zero_for_negative_data() {
        let axis = ValueAxis::covering(-7, -2, 5);
        assert_eq!(axis.max, 0.0);
        assert!(axis.min <= -7.0);
        assert_eq!(axis.fraction(axis.min), 0.0);
    }

    #[test]
    fn value_axis_handles_flat_zero_data() {
        let axis = ValueAxis::covering(0, 0, 5);
        assert_eq!(axis.step, 1.0);
        assert_eq!(axis.min, 0.0);
        assert_eq!(axis.max, 1.0);
    }
}
