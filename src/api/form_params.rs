use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{MAX_ROWS, MAX_SURFACE_EDGE, OutputFormat, RawRow, Viewport};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_TITLE: &str = "Graph by rcairo";
pub const DEFAULT_UNIT: &str = "(Unit)";
pub const DEFAULT_WIDTH: u32 = 960;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Demo dataset shown on the initial, unfilled form.
pub const DEMO_ROWS: [([i64; 8], &str); MAX_ROWS] = [
    ([253, 503, 84, 687, 859, 361, 110, 403], "Senna"),
    ([588, 766, 485, 1039, 862, 1028, 155, 235], "Groonga"),
    ([504, 192, 610, 541, 469, 192, 194, 1072], "Rroonga"),
    ([31, 694, 80, 3, 762, 85, 620, 1078], "Mroonga"),
    ([422, 288, 376, 1162, 153, 218, 303, 638], "Nroonga"),
    ([264, 106, 167, 586, 204, 597, 831, 1111], "Droonga"),
];

#[must_use]
pub fn demo_columns() -> Vec<String> {
    (1..=8).map(|day| format!("5/{day}")).collect()
}

#[must_use]
pub fn data_key(row: usize) -> String {
    format!("data{row}")
}

#[must_use]
pub fn label_key(row: usize) -> String {
    format!("label{row}")
}

/// Raw form submission: parameter name to string value, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormParams {
    values: IndexMap<String, String>,
}

impl FormParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter map of the initial form: demo rows plus every scalar default.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut params = Self::new();
        params.seed_defaults();
        params
    }

    /// Fills in default values for keys that are absent; present keys, even
    /// empty ones, are left untouched.
    pub fn seed_defaults(&mut self) {
        for (row, (values, label)) in DEMO_ROWS.iter().enumerate() {
            self.insert_absent(data_key(row), join_values(values));
            self.insert_absent(label_key(row), *label);
        }
        self.insert_absent("columns", demo_columns().join(","));
        self.insert_absent("width", DEFAULT_WIDTH.to_string());
        self.insert_absent("height", DEFAULT_HEIGHT.to_string());
        self.insert_absent("title", DEFAULT_TITLE);
        self.insert_absent("unit", DEFAULT_UNIT);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts the submission into typed, defaulted values.
    pub fn coerce(&self) -> ChartResult<CoercedParams> {
        let rows = self.coerce_rows()?;
        let columns = match self.get("columns") {
            Some(raw) => split_columns(raw),
            None => demo_columns(),
        };
        let width = self.dimension("width", DEFAULT_WIDTH)?;
        let height = self.dimension("height", DEFAULT_HEIGHT)?;
        let filename = self.text_or("filename", "").to_owned();
        validate_filename(&filename)?;

        let coerced = CoercedParams {
            rows,
            columns,
            width,
            height,
            title: self.text_or("title", DEFAULT_TITLE).to_owned(),
            unit: self.text_or("unit", DEFAULT_UNIT).to_owned(),
            font: self.non_empty("font").map(str::to_owned),
            direction: self.text_or("direction", "").to_owned(),
            format: self.text_or("format", OutputFormat::Raster.token()).to_owned(),
            filename,
        };
        trace!(
            rows = coerced.rows.len(),
            columns = coerced.columns.len(),
            width = coerced.width,
            height = coerced.height,
            format = %coerced.format,
            "form parameters coerced"
        );
        Ok(coerced)
    }

    fn coerce_rows(&self) -> ChartResult<Vec<RawRow>> {
        let any_row_key =
            (0..MAX_ROWS).any(|row| self.contains_key(&data_key(row)) || self.contains_key(&label_key(row)));
        if !any_row_key {
            return Ok(demo_rows());
        }

        (0..MAX_ROWS)
            .map(|row| {
                let field = data_key(row);
                let values = parse_values(&field, self.get(&field).unwrap_or(""))?;
                let label = self.get(&label_key(row)).unwrap_or("").to_owned();
                Ok(RawRow::new(values, label))
            })
            .collect()
    }

    fn dimension(&self, field: &str, default: u32) -> ChartResult<u32> {
        match self.get(field) {
            Some(raw) => parse_dimension(field, raw),
            None => Ok(default),
        }
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.non_empty(key).unwrap_or(default)
    }

    fn insert_absent(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Request-scoped, immutable view of one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercedParams {
    pub rows: Vec<RawRow>,
    pub columns: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub unit: String,
    /// `None` defers to the configured default family.
    pub font: Option<String>,
    pub direction: String,
    /// Raw format token; resolved by [`OutputFormat::from_token`].
    pub format: String,
    /// Empty means "generate from the clock".
    pub filename: String,
}

impl CoercedParams {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

fn demo_rows() -> Vec<RawRow> {
    DEMO_ROWS
        .iter()
        .map(|(values, label)| RawRow::new(values.to_vec(), *label))
        .collect()
}

fn join_values(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits comma-separated integers; a single trailing comma is tolerated.
fn parse_values(field: &str, raw: &str) -> ChartResult<Vec<i64>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens: Vec<&str> = raw.split(',').collect();
    if tokens.last().is_some_and(|token| token.trim().is_empty()) {
        tokens.pop();
    }

    tokens
        .into_iter()
        .map(|token| {
            let trimmed = token.trim();
            trimmed.parse::<i64>().map_err(|_| {
                ChartError::parse(field, format!("`{trimmed}` is not an integer"))
            })
        })
        .collect()
}

fn split_columns(raw: &str) -> Vec<String> {
    let mut columns: Vec<String> = raw.split(',').map(str::to_owned).collect();
    while columns.last().is_some_and(String::is_empty) {
        columns.pop();
    }
    columns
}

fn parse_dimension(field: &str, raw: &str) -> ChartResult<u32> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<i64>()
        .map_err(|_| ChartError::parse(field, format!("`{trimmed}` is not an integer")))?;
    if !(1..=i64::from(MAX_SURFACE_EDGE)).contains(&value) {
        return Err(ChartError::parse(
            field,
            format!("{value} is outside 1..={MAX_SURFACE_EDGE}"),
        ));
    }
    // Range-checked above.
    Ok(value as u32)
}

fn validate_filename(filename: &str) -> ChartResult<()> {
    if filename == "." || filename == ".." {
        return Err(ChartError::parse(
            "filename",
            format!("`{filename}` is not a file name"),
        ));
    }
    if filename.contains(['/', '\\', '\0']) {
        return Err(ChartError::parse(
            "filename",
            "must not contain path separators",
        ));
    }
    Ok(())
}
