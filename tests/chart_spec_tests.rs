use cairo_graph_web::ChartError;
use cairo_graph_web::api::{
    ChartSpecBuilder, DEFAULT_FONT_FAMILY, DEFAULT_TITLE, DEFAULT_UNIT, FormParams, ServiceConfig,
};
use cairo_graph_web::core::{Orientation, RawRow, SeriesModel, Viewport};

fn model() -> SeriesModel {
    SeriesModel::from_rows(
        vec![RawRow::new(vec![1, 2], "one"), RawRow::new(vec![3, 4], "two")],
        vec!["x".to_owned(), "y".to_owned()],
    )
}

#[test]
fn builder_applies_display_options() {
    let spec = ChartSpecBuilder::new(model())
        .with_title("Traffic")
        .with_viewport(Viewport::new(640, 320))
        .with_font_family("VL Gothic")
        .with_orientation(Orientation::Vertical)
        .build()
        .expect("build spec");

    assert_eq!(spec.title(), "Traffic");
    assert_eq!(spec.unit_label(), DEFAULT_UNIT);
    assert_eq!(spec.columns(), &["x".to_owned(), "y".to_owned()]);
    assert_eq!(spec.model().len(), 2);
    assert_eq!((spec.width(), spec.height()), (640, 320));
    assert_eq!(spec.font_family(), "VL Gothic");
    assert_eq!(spec.orientation(), Orientation::Vertical);
}

#[test]
fn empty_title_falls_back_to_default() {
    let spec = ChartSpecBuilder::new(model())
        .with_title("")
        .build()
        .expect("build spec");
    assert_eq!(spec.title(), DEFAULT_TITLE);
}

#[test]
fn font_falls_back_to_configured_default() {
    let spec = ChartSpecBuilder::new(model()).build().expect("build spec");
    assert_eq!(spec.font_family(), DEFAULT_FONT_FAMILY);

    let spec = ChartSpecBuilder::new(model())
        .with_default_font("IPAGothic")
        .with_font_family("")
        .build()
        .expect("build spec");
    assert_eq!(spec.font_family(), "IPAGothic");
}

#[test]
fn only_exact_vertical_token_selects_vertical() {
    for (direction, expected) in [
        ("vertical", Orientation::Vertical),
        ("Vertical", Orientation::Horizontal),
        ("horizontal", Orientation::Horizontal),
        ("", Orientation::Horizontal),
        (" vertical", Orientation::Horizontal),
    ] {
        let spec = ChartSpecBuilder::new(model())
            .with_direction(direction)
            .build()
            .expect("build spec");
        assert_eq!(spec.orientation(), expected, "direction `{direction}`");
    }
}

#[test]
fn submitted_unit_is_ignored_by_default() {
    let params: FormParams = [("unit", "(ms)"), ("font", "Serif")].into_iter().collect();
    let coerced = params.coerce().expect("coerce");
    let model = SeriesModel::from_rows(coerced.rows.clone(), coerced.columns.clone());

    let spec = ChartSpecBuilder::from_params(model.clone(), &coerced, &ServiceConfig::default())
        .build()
        .expect("build spec");
    assert_eq!(spec.unit_label(), DEFAULT_UNIT);
    assert_eq!(spec.font_family(), "Serif");

    let config = ServiceConfig::default().with_honor_submitted_unit(true);
    let spec = ChartSpecBuilder::from_params(model, &coerced, &config)
        .build()
        .expect("build spec");
    assert_eq!(spec.unit_label(), "(ms)");
}

#[test]
fn empty_model_cannot_be_built() {
    let empty = SeriesModel::from_rows(vec![RawRow::new(vec![1], "")], Vec::new());
    let err = ChartSpecBuilder::new(empty).build().expect_err("empty model");
    assert!(matches!(err, ChartError::EmptyModel));
}

#[test]
fn invalid_viewport_is_rejected() {
    let err = ChartSpecBuilder::new(model())
        .with_viewport(Viewport::new(0, 100))
        .build()
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { width: 0, height: 100 }));
}
