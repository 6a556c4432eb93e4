use cairo_graph_web::ChartError;
use cairo_graph_web::core::{RawRow, Series, SeriesModel};

fn columns() -> Vec<String> {
    ["a", "b", "c"].iter().map(|c| (*c).to_owned()).collect()
}

#[test]
fn unlabeled_rows_are_dropped_in_order() {
    let model = SeriesModel::from_rows(
        vec![
            RawRow::new(vec![1, 2, 3], "first"),
            RawRow::new(vec![4, 5, 6], ""),
            RawRow::new(vec![7, 8, 9], "third"),
            RawRow::new(vec![], ""),
            RawRow::new(vec![1], "fifth"),
        ],
        columns(),
    );

    let labels: Vec<&str> = model.series().iter().map(Series::label).collect();
    assert_eq!(labels, vec!["first", "third", "fifth"]);
    assert_eq!(model.series()[1].values(), &[7, 8, 9]);
    assert_eq!(model.columns(), columns().as_slice());
}

#[test]
fn all_unlabeled_rows_make_an_empty_model() {
    let model = SeriesModel::from_rows(
        (0..6).map(|i| RawRow::new(vec![i], "")).collect(),
        columns(),
    );

    assert!(model.is_empty());
    assert!(matches!(model.ensure_renderable(), Err(ChartError::EmptyModel)));
}

#[test]
fn mismatched_row_lengths_pass_through() {
    let model = SeriesModel::from_rows(
        vec![RawRow::new(vec![1], "short"), RawRow::new(vec![1, 2, 3, 4, 5], "long")],
        columns(),
    );

    model.ensure_renderable().expect("mismatch is tolerated");
    assert_eq!(model.series()[0].values().len(), 1);
    assert_eq!(model.series()[1].values().len(), 5);
    assert_eq!(model.slot_count(), 5);
}

#[test]
fn series_rejects_empty_label() {
    let err = Series::new(vec![1], "").expect_err("empty label");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert_eq!(Series::new(vec![1], "x").expect("labeled").label(), "x");
}
