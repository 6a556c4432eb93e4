#![cfg(feature = "cairo-backend")]

use std::fs;

use cairo::{Context, Format, ImageSurface};
use cairo_graph_web::api::{
    ChartSpec, ChartSpecBuilder, FixedClock, FormParams, RequestHandler, RequestOrigin,
    ServiceConfig,
};
use cairo_graph_web::core::{OutputFormat, RawRow, SeriesModel, Viewport};
use cairo_graph_web::render::{CairoBackend, CairoContextRenderer, render_artifact};
use chrono::NaiveDate;

fn spec() -> ChartSpec {
    let model = SeriesModel::from_rows(
        vec![
            RawRow::new(vec![253, 503, 84], "Senna"),
            RawRow::new(vec![588, 766, 485], "Groonga"),
        ],
        vec!["5/1".into(), "5/2".into(), "5/3".into()],
    );
    ChartSpecBuilder::new(model)
        .with_viewport(Viewport::new(320, 200))
        .build()
        .expect("spec")
}

#[test]
fn raster_output_is_a_png_of_the_requested_size() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.png");

    let stats = render_artifact(&CairoBackend::new(), &spec(), OutputFormat::Raster, &path)
        .expect("render png");
    assert_eq!(stats.rects_drawn, 8);

    let mut file = fs::File::open(&path).expect("open png");
    let surface = ImageSurface::create_from_png(&mut file).expect("decode png");
    assert_eq!((surface.width(), surface.height()), (320, 200));
}

#[test]
fn vector_output_is_a_pdf() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.pdf");

    render_artifact(&CairoBackend::new(), &spec(), OutputFormat::Vector, &path)
        .expect("render pdf");

    let bytes = fs::read(&path).expect("read pdf");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn chart_can_be_drawn_on_external_context() {
    let surface = ImageSurface::create(Format::ARgb32, 320, 200).expect("surface");
    let context = Context::new(&surface).expect("context");

    let stats = CairoBackend::new()
        .render_on_cairo_context(&context, &spec())
        .expect("render on context");
    assert_eq!(stats.rects_drawn, 8);
    assert!(stats.texts_drawn >= 7);
}

#[test]
fn unwritable_path_surfaces_error_without_leftovers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing-dir").join("chart.png");

    let err = render_artifact(&CairoBackend::new(), &spec(), OutputFormat::Raster, &path)
        .expect_err("parent directory is missing");
    assert!(err.to_string().contains("chart.png"));
    assert!(!path.exists());
}

#[test]
fn end_to_end_default_form_writes_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let now = NaiveDate::from_ymd_opt(2024, 5, 8)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .expect("timestamp");
    let handler = RequestHandler::with_clock(
        ServiceConfig::new(dir.path()),
        CairoBackend::new(),
        FixedClock(now),
    )
    .expect("handler");

    let target = handler
        .handle_submission(&FormParams::with_defaults(), &RequestOrigin::new("http", "localhost", 4567))
        .expect("render");

    assert_eq!(target.url, "http://localhost:4567/images/20240508/20240508080000.png");
    assert!(fs::metadata(target.path()).expect("artifact").len() > 0);
}
