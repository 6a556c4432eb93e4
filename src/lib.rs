//! cairo-graph-web: renders form-submitted tables as bar charts.
//!
//! A submission flows through parameter coercion, a validated series model,
//! an immutable chart spec and a PNG/PDF surface backend, and lands in a
//! date-partitioned directory under the public root with a matching URL.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartSpec, FormParams, RequestHandler, RequestOrigin, ServiceConfig};
pub use error::{ChartError, ChartResult, ErrorKind, ErrorReport};
