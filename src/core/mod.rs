pub mod series;
pub mod types;

pub use series::{MAX_ROWS, RawRow, Series, SeriesModel};
pub use types::{MAX_SURFACE_EDGE, Orientation, OutputFormat, Viewport};
