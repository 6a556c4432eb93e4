use approx::assert_relative_eq;
use cairo_graph_web::api::{ChartSpec, ChartSpecBuilder};
use cairo_graph_web::core::{Orientation, RawRow, SeriesModel, Viewport};
use cairo_graph_web::render::{BarChartLayout, BarChartStyle, ChartLayout, NullBackend, SurfaceBackend};
use std::path::Path;

fn spec(orientation: Orientation, rows: Vec<RawRow>, columns: &[&str]) -> ChartSpec {
    let model = SeriesModel::from_rows(rows, columns.iter().map(|c| (*c).to_owned()).collect());
    ChartSpecBuilder::new(model)
        .with_viewport(Viewport::new(960, 480))
        .with_orientation(orientation)
        .build()
        .expect("build spec")
}

fn two_series(orientation: Orientation) -> ChartSpec {
    spec(
        orientation,
        vec![
            RawRow::new(vec![100, 200, 300], "alpha"),
            RawRow::new(vec![50, 0, 150], "beta"),
        ],
        &["a", "b", "c"],
    )
}

#[test]
fn frame_has_one_bar_per_value_plus_legend_swatches() {
    let layout = BarChartLayout::default();
    let frame = layout
        .build_frame(&two_series(Orientation::Vertical))
        .expect("frame");
    frame.validate().expect("valid frame");

    // 6 bars + 2 legend swatches.
    assert_eq!(frame.rects.len(), 8);
    let texts: Vec<&str> = frame.texts.iter().map(|t| t.text.as_str()).collect();
    for expected in ["Graph by rcairo", "(Unit)", "a", "b", "c", "alpha", "beta"] {
        assert!(texts.contains(&expected), "missing text `{expected}`");
    }
}

#[test]
fn legend_follows_series_order_and_palette() {
    let style = BarChartStyle::default();
    let layout = BarChartLayout::new(style.clone());
    let frame = layout
        .build_frame(&two_series(Orientation::Horizontal))
        .expect("frame");

    let swatches = &frame.rects[frame.rects.len() - 2..];
    assert_eq!(swatches[0].fill_color, style.series_color(0));
    assert_eq!(swatches[1].fill_color, style.series_color(1));
    assert!(swatches[0].y < swatches[1].y);

    let legend_labels: Vec<&str> = frame
        .texts
        .iter()
        .rev()
        .take(2)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(legend_labels, vec!["beta", "alpha"]);
}

#[test]
fn vertical_bars_grow_upward_proportionally() {
    let frame = BarChartLayout::default()
        .build_frame(&two_series(Orientation::Vertical))
        .expect("frame");

    // Bars are emitted slot by slot, series by series.
    let alpha_a = frame.rects[0];
    let alpha_c = frame.rects[4];
    assert_relative_eq!(alpha_c.height, alpha_a.height * 3.0, epsilon = 1e-9);
    assert_relative_eq!(alpha_a.y + alpha_a.height, alpha_c.y + alpha_c.height, epsilon = 1e-9);
    assert!(alpha_c.x > alpha_a.x);

    let beta_b = frame.rects[3];
    assert_relative_eq!(beta_b.height, 0.0);
}

#[test]
fn horizontal_bars_grow_rightward_proportionally() {
    let frame = BarChartLayout::default()
        .build_frame(&two_series(Orientation::Horizontal))
        .expect("frame");

    let alpha_a = frame.rects[0];
    let alpha_b = frame.rects[2];
    assert_relative_eq!(alpha_b.width, alpha_a.width * 2.0, epsilon = 1e-9);
    assert_relative_eq!(alpha_a.x, alpha_b.x, epsilon = 1e-9);
    assert!(alpha_b.y > alpha_a.y);
}

#[test]
fn negative_values_extend_below_the_baseline() {
    let frame = BarChartLayout::default()
        .build_frame(&spec(
            Orientation::Vertical,
            vec![RawRow::new(vec![10, -10], "mixed")],
            &["up", "down"],
        ))
        .expect("frame");
    frame.validate().expect("valid frame");

    let up = frame.rects[0];
    let down = frame.rects[1];
    assert_relative_eq!(up.height, down.height, epsilon = 1e-9);
    assert_relative_eq!(up.y + up.height, down.y, epsilon = 1e-9);
}

#[test]
fn rows_longer_than_columns_still_draw_every_value() {
    let frame = BarChartLayout::default()
        .build_frame(&spec(
            Orientation::Vertical,
            vec![RawRow::new(vec![1, 2, 3, 4], "wide")],
            &["only"],
        ))
        .expect("frame");
    frame.validate().expect("valid frame");

    // 4 bars + 1 swatch; only one column label.
    assert_eq!(frame.rects.len(), 5);
    assert_eq!(frame.texts.iter().filter(|t| t.text == "only").count(), 1);
}

#[test]
fn tiny_viewport_still_yields_a_valid_frame() {
    let model = SeriesModel::from_rows(vec![RawRow::new(vec![5, 9], "s")], vec!["a".into(), "b".into()]);
    let spec = ChartSpecBuilder::new(model)
        .with_viewport(Viewport::new(1, 1))
        .build()
        .expect("build spec");

    let frame = BarChartLayout::default().build_frame(&spec).expect("frame");
    frame.validate().expect("valid frame");
}

#[test]
fn null_backend_reports_frame_counts_without_writing() {
    let root = tempfile::tempdir().expect("tempdir");
    let path = root.path().join("never.png");
    let stats = NullBackend::new()
        .write_raster(&two_series(Orientation::Vertical), &path)
        .expect("null render");

    assert_eq!(stats.rects_drawn, 8);
    assert!(stats.lines_drawn >= 4);
    assert!(!Path::new(&path).exists());
}
