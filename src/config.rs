use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_TOP: usize = 15;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

/// Directory and file name markers used to bucket units
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    /// Directory names holding business rules
    pub domain: Vec<String>,
    /// Directory names holding presentation code
    pub presentation: Vec<String>,
    /// Glob patterns matched against the file name of program entrypoints
    pub entrypoints: Vec<String>,
    pub case_sensitive: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            domain: vec!["Services".to_string(), "Utils".to_string(), "Models".to_string()],
            presentation: vec!["UI".to_string()],
            entrypoints: vec!["Program.cs".to_string()],
            case_sensitive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Number of ranked domain units shown
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top: DEFAULT_TOP }
    }
}

/// Minimum line coverage, in percent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    pub domain: Option<f64>,
    pub adjusted: Option<f64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let marker_lists = [
            ("markers.domain", &self.markers.domain),
            ("markers.presentation", &self.markers.presentation),
        ];

        for (key, markers) in marker_lists {
            for marker in markers {
                if marker.trim().is_empty() {
                    anyhow::bail!("'{}' contains an empty marker", key);
                }
                if marker.contains('/') || marker.contains('\\') {
                    anyhow::bail!(
                        "'{}' marker '{}' must be a single directory name, without separators",
                        key,
                        marker
                    );
                }
            }
        }

        for pattern in &self.markers.entrypoints {
            glob::Pattern::new(pattern)
                .with_context(|| format!("'markers.entrypoints' has an invalid pattern '{}'", pattern))?;
        }

        for (key, value) in [
            ("thresholds.domain", self.thresholds.domain),
            ("thresholds.adjusted", self.thresholds.adjusted),
        ] {
            if let Some(v) = value {
                if !(0.0..=100.0).contains(&v) {
                    anyhow::bail!("'{}' must be between 0 and 100, got {}", key, v);
                }
            }
        }

        Ok(())
    }
}
