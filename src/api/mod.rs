//! Form-to-artifact pipeline: parameter coercion, chart spec assembly,
//! artifact placement and request orchestration.

mod artifact_locator;
mod chart_spec;
mod form_params;
mod request_handler;
mod service_config;

pub use artifact_locator::{
    ArtifactLocator, Clock, FixedClock, HIDDEN_PORT, OutputTarget, RequestOrigin, SystemClock,
    normalize_filename,
};
pub use chart_spec::{ChartSpec, ChartSpecBuilder};
pub use form_params::{
    CoercedParams, DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_UNIT, DEFAULT_WIDTH, DEMO_ROWS,
    FormParams, data_key, demo_columns, label_key,
};
pub use request_handler::{FormContext, FormatOption, RequestHandler, SubmissionOutcome};
pub use service_config::{
    DEFAULT_FONT_FAMILY, DEFAULT_IMAGES_DIR, DEFAULT_PUBLIC_ROOT, ServiceConfig,
};
