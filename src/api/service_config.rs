use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_PUBLIC_ROOT: &str = "public";
pub const DEFAULT_IMAGES_DIR: &str = "images";
/// Pango resolves `Sans` to the platform's default sans-serif family.
pub const DEFAULT_FONT_FAMILY: &str = "Sans";

/// Deployment settings shared by every request.
///
/// This type is serializable so hosts can keep it next to their own server
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory served as the site's static root.
    pub public_root: PathBuf,
    /// Single path segment under `public_root` that holds date partitions.
    pub images_dir: String,
    /// Font family used when the form leaves `font` empty.
    pub default_font: String,
    /// When `false`, the unit label is always [`super::DEFAULT_UNIT`] and the
    /// submitted `unit` value is ignored.
    pub honor_submitted_unit: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            public_root: PathBuf::from(DEFAULT_PUBLIC_ROOT),
            images_dir: DEFAULT_IMAGES_DIR.to_owned(),
            default_font: DEFAULT_FONT_FAMILY.to_owned(),
            honor_submitted_unit: false,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_images_dir(mut self, images_dir: impl Into<String>) -> Self {
        self.images_dir = images_dir.into();
        self
    }

    #[must_use]
    pub fn with_default_font(mut self, family: impl Into<String>) -> Self {
        self.default_font = family.into();
        self
    }

    #[must_use]
    pub fn with_honor_submitted_unit(mut self, honor: bool) -> Self {
        self.honor_submitted_unit = honor;
        self
    }

    pub fn from_json_str(raw: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| ChartError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| ChartError::io(path, err))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.images_dir.is_empty()
            || self.images_dir == "."
            || self.images_dir == ".."
            || self.images_dir.contains(['/', '\\'])
        {
            return Err(ChartError::Config(format!(
                "images_dir `{}` must be a single path segment",
                self.images_dir
            )));
        }
        if self.default_font.trim().is_empty() {
            return Err(ChartError::Config(
                "default_font must not be empty".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn images_root(&self) -> PathBuf {
        self.public_root.join(&self.images_dir)
    }
}
