// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::framework::{Encoding, SourcePattern};
use crate::constants::{components, format, timing};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest frame dimension accepted in either direction
pub const MAX_DIMENSION: u32 = 16384;

/// Source stage settings
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Framework component name
    pub component: String,
    /// Output pixel encoding
    pub encoding: Encoding,
    /// Test pattern to generate
    pub pattern: SourcePattern,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            component: components::SOURCE.to_string(),
            encoding: format::SOURCE_ENCODING,
            pattern: format::SOURCE_PATTERN,
        }
    }
}

/// ISP stage settings
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IspSettings {
    /// Framework component name
    pub component: String,
    /// Output pixel encoding (input always matches the source)
    pub output_encoding: Encoding,
}

impl Default for IspSettings {
    fn default() -> Self {
        Self {
            component: components::ISP.to_string(),
            output_encoding: format::ISP_OUTPUT_ENCODING,
        }
    }
}

/// Renderer stage settings
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Framework component name
    pub component: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            component: components::RENDER.to_string(),
        }
    }
}

/// Pipeline configuration
///
/// Immutable once bootstrap starts. Missing fields in a config file fall back
/// to the defaults, so `{}` is a valid file.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source: SourceSettings,
    pub isp: IspSettings,
    pub render: RenderSettings,
    /// Visible frame width in pixels
    pub width: u32,
    /// Visible frame height in pixels
    pub height: u32,
    /// Zero-copy flag applied to every data port
    pub zero_copy: bool,
    /// How long to stream before exiting
    pub run_seconds: u64,
    /// Disable and destroy connections and components before exiting
    pub teardown: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: SourceSettings::default(),
            isp: IspSettings::default(),
            render: RenderSettings::default(),
            width: format::WIDTH,
            height: format::HEIGHT,
            zero_copy: format::ZERO_COPY,
            run_seconds: timing::RUN_DURATION_SECS,
            teardown: true,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(text: &str) -> AppResult<Self> {
        let config: PipelineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the framework could never accept
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(AppError::Config(format!(
                    "{} must be between 1 and {} (got {})",
                    name, MAX_DIMENSION, value
                )));
            }
        }
        for (stage, component) in [
            ("source", &self.source.component),
            ("isp", &self.isp.component),
            ("render", &self.render.component),
        ] {
            if component.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "{} component name must not be empty",
                    stage
                )));
            }
        }
        Ok(())
    }

    /// Streaming duration
    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(self.run_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json(r#"{"width": 1920, "isp": {"output_encoding": "RGB3"}}"#)
            .unwrap();
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, format::HEIGHT);
        assert_eq!(config.isp.output_encoding, Encoding::RGB24);
        assert_eq!(config.isp.component, components::ISP);
    }

    #[test]
    fn test_bad_encoding_is_config_error() {
        let result = PipelineConfig::from_json(r#"{"source": {"encoding": "TOOLONG"}}"#);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = PipelineConfig {
            width: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
