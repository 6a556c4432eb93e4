use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::OutputFormat;
use crate::error::{ChartError, ChartResult};

use super::service_config::ServiceConfig;

const DATE_PARTITION_FORMAT: &str = "%Y%m%d";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Source of "now" for date partitions and generated filenames.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// The one port never shown in generated URLs.
pub const HIDDEN_PORT: u16 = 80;

/// Scheme, host, port and mount path of the inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path the application is mounted under, e.g. `/charts`; empty at the root.
    #[serde(default)]
    pub script_name: String,
}

impl RequestOrigin {
    #[must_use]
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            script_name: String::new(),
        }
    }

    #[must_use]
    pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = script_name.into();
        self
    }

    /// `scheme://host[:port]/mount`. Only port 80 is left out, whatever the
    /// scheme; every other port, 443 included, is kept so links stay
    /// byte-identical to what the form page has always served.
    #[must_use]
    pub fn base_url(&self) -> String {
        let mount = self.script_name.trim_end_matches('/');
        if self.port == HIDDEN_PORT {
            format!("{}://{}{mount}", self.scheme, self.host)
        } else {
            format!("{}://{}:{}{mount}", self.scheme, self.host, self.port)
        }
    }
}

/// Where one rendered artifact lives on disk and on the web.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    pub format: OutputFormat,
    /// Date-partitioned directory, `<public_root>/<images_dir>/<YYYYMMDD>`.
    pub directory: PathBuf,
    pub filename: String,
    pub url: String,
}

impl OutputTarget {
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Appends `.<ext>` unless `filename` already ends with exactly that suffix.
///
/// A different existing extension is kept, so `chart.png` requested as PDF
/// becomes `chart.png.pdf`.
#[must_use]
pub fn normalize_filename(filename: &str, format: OutputFormat) -> String {
    let suffix = format!(".{}", format.extension());
    if filename.ends_with(&suffix) {
        filename.to_owned()
    } else {
        format!("{filename}{suffix}")
    }
}

/// Computes artifact directories, filenames and URLs from an injected clock.
#[derive(Debug, Clone)]
pub struct ArtifactLocator<C> {
    images_root: PathBuf,
    images_dir: String,
    clock: C,
}

impl<C: Clock> ArtifactLocator<C> {
    #[must_use]
    pub fn new(config: &ServiceConfig, clock: C) -> Self {
        Self {
            images_root: config.images_root(),
            images_dir: config.images_dir.clone(),
            clock,
        }
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Resolves the target for one request. Reads the clock once so the date
    /// partition and a generated filename always agree.
    #[must_use]
    pub fn locate(
        &self,
        requested_filename: &str,
        format: OutputFormat,
        origin: &RequestOrigin,
    ) -> OutputTarget {
        let now = self.clock.now();
        let date = now.format(DATE_PARTITION_FORMAT).to_string();
        let stem = if requested_filename.is_empty() {
            now.format(TIMESTAMP_FORMAT).to_string()
        } else {
            requested_filename.to_owned()
        };
        let filename = normalize_filename(&stem, format);
        let url = format!(
            "{}/{}/{date}/{filename}",
            origin.base_url(),
            self.images_dir
        );

        debug!(%date, %filename, %url, "artifact target resolved");
        OutputTarget {
            format,
            directory: self.images_root.join(&date),
            filename,
            url,
        }
    }

    /// Creates the target's date directory and its parents; succeeds when
    /// another request already created it.
    pub fn prepare(&self, target: &OutputTarget) -> ChartResult<()> {
        fs::create_dir_all(&target.directory)
            .map_err(|err| ChartError::io(&target.directory, err))
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestOrigin, normalize_filename};
    use crate::core::OutputFormat;

    #[test]
    fn base_url_trims_trailing_mount_slash() {
        let origin = RequestOrigin::new("http", "example.org", 80).with_script_name("/");
        assert_eq!(origin.base_url(), "http://example.org");
    }

    #[test]
    fn only_port_80_is_hidden() {
        let origin = RequestOrigin::new("gopher", "example.org", 70);
        assert_eq!(origin.base_url(), "gopher://example.org:70");
        let origin = RequestOrigin::new("https", "example.org", 443);
        assert_eq!(origin.base_url(), "https://example.org:443");
        let origin = RequestOrigin::new("https", "example.org", 80);
        assert_eq!(origin.base_url(), "https://example.org");
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        assert_eq!(
            normalize_filename("REPORT.PDF", OutputFormat::Vector),
            "REPORT.PDF.pdf"
        );
        assert_eq!(normalize_filename("reportxpdf", OutputFormat::Vector), "reportxpdf.pdf");
    }
}
