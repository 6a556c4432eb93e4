use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

/// Maximum number of data rows the form exposes.
pub const MAX_ROWS: usize = 6;

/// One submitted data row before label filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub values: Vec<i64>,
    pub label: String,
}

impl RawRow {
    #[must_use]
    pub fn new(values: Vec<i64>, label: impl Into<String>) -> Self {
        Self {
            values,
            label: label.into(),
        }
    }
}

/// Labeled sequence of values, positionally aligned with the model's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    values: Vec<i64>,
    label: String,
}

impl Series {
    /// Builds a series; the label must be non-empty.
    pub fn new(values: Vec<i64>, label: impl Into<String>) -> ChartResult<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(ChartError::InvalidData(
                "series label must not be empty".to_owned(),
            ));
        }
        Ok(Self { values, label })
    }

    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Ordered, labeled series sharing one set of column headers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeriesModel {
    columns: Vec<String>,
    series: Vec<Series>,
}

impl SeriesModel {
    /// Drops unlabeled rows and keeps the remaining ones in submission order.
    ///
    /// Row lengths are not checked against `columns`; mismatches are logged and
    /// left to the drawer.
    #[must_use]
    pub fn from_rows(rows: Vec<RawRow>, columns: Vec<String>) -> Self {
        let submitted = rows.len();
        let series: Vec<Series> = rows
            .into_iter()
            .take(MAX_ROWS)
            .filter(|row| !row.label.is_empty())
            .map(|row| Series {
                values: row.values,
                label: row.label,
            })
            .collect();

        for entry in &series {
            if entry.values.len() != columns.len() {
                warn!(
                    label = %entry.label,
                    values = entry.values.len(),
                    columns = columns.len(),
                    "series length differs from column count"
                );
            }
        }
        debug!(
            submitted,
            kept = series.len(),
            columns = columns.len(),
            "series model built"
        );

        Self { columns, series }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of value slots the chart needs: the wider of the header row and
    /// the longest series.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.series
            .iter()
            .map(|entry| entry.values.len())
            .chain(std::iter::once(self.columns.len()))
            .max()
            .unwrap_or(0)
    }

    /// Smallest and largest value across all series, if any value exists.
    #[must_use]
    pub fn value_range(&self) -> Option<(i64, i64)> {
        let mut values = self.series.iter().flat_map(|entry| entry.values.iter().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), value| {
            (lo.min(value), hi.max(value))
        }))
    }

    pub fn ensure_renderable(&self) -> ChartResult<()> {
        if self.series.is_empty() {
            return Err(ChartError::EmptyModel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RawRow, SeriesModel};

    fn columns(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("5/{i}")).collect()
    }

    #[test]
    fn slot_count_covers_longest_row_or_header() {
        let model = SeriesModel::from_rows(
            vec![RawRow::new(vec![1, 2, 3, 4], "a"), RawRow::new(vec![1], "b")],
            columns(2),
        );
        assert_eq!(model.slot_count(), 4);

        let model = SeriesModel::from_rows(vec![RawRow::new(vec![1], "a")], columns(3));
        assert_eq!(model.slot_count(), 3);
    }

    #[test]
    fn value_range_spans_every_series() {
        let model = SeriesModel::from_rows(
            vec![
                RawRow::new(vec![3, -2, 9], "a"),
                RawRow::new(vec![], "b"),
                RawRow::new(vec![12], "c"),
            ],
            columns(3),
        );
        assert_eq!(model.value_range(), Some((-2, 12)));
    }

    #[test]
    fn value_range_is_none_without_values() {
        let model = SeriesModel::from_rows(vec![RawRow::new(vec![], "a")], columns(2));
        assert_eq!(model.value_range(), None);
    }

    #[test]
    fn rows_beyond_max_are_ignored() {
        let rows = (0..9).map(|i| RawRow::new(vec![i], format!("row{i}"))).collect();
        let model = SeriesModel::from_rows(rows, columns(1));
        assert_eq!(model.len(), super::MAX_ROWS);
    }
}
