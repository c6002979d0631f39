//! Settings file: radar options plus per-provider configuration.
//!
//! Every section is optional. A missing provider section falls back to the
//! built-in configuration; a present one replaces it entirely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engines::{Bing, Google};
use crate::provider::ProviderConfig;
use crate::{RadarError, RadarOptions, Result};

/// Process-level radar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarSettings {
    #[serde(default)]
    pub radar: RadarOptions,
    #[serde(default = "Google::default_config")]
    pub google: ProviderConfig,
    #[serde(default = "Bing::default_config")]
    pub bing: ProviderConfig,
}

impl Default for RadarSettings {
    fn default() -> Self {
        Self {
            radar: RadarOptions::default(),
            google: Google::default_config(),
            bing: Bing::default_config(),
        }
    }
}

impl RadarSettings {
    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RadarError::Config(format!("invalid settings: {}", e)))
    }

    /// Reads settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RadarError::Config(format!("cannot read settings file {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Validates the radar options and every provider section.
    pub fn validate(&self) -> Result<()> {
        if self.radar.search_depth == 0 {
            return Err(RadarError::Config(
                "search_depth must be greater than 0".into(),
            ));
        }
        self.google.validate()?;
        self.bing.validate()?;
        Ok(())
    }
}
