//! Dashboard configuration.
//!
//! Stored as a TOML file with `[quotes]`, `[tips]` and `[charts]` sections.
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use crate::rng::DEFAULT_SEED;
use crate::tips::{OrderWindow, DEFAULT_TIPS_URL};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File name picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashlab.toml";

/// Upper bound for `quotes.lookback_days` (about a century).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotesConfig {
    pub default_ticker: String,
    /// Default window length ending today.
    pub lookback_days: u32,
    pub request_timeout_secs: u64,
    /// Quote cache entry lifetime; 0 keeps entries for the whole process.
    pub cache_ttl_secs: u64,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            default_ticker: "AAPL".into(),
            lookback_days: 90,
            request_timeout_secs: 30,
            cache_ttl_secs: 0,
        }
    }
}

impl QuotesConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipsConfig {
    pub remote_url: String,
    pub seed: u64,
    pub order_start: NaiveDate,
    pub order_end: NaiveDate,
    pub preview_rows: usize,
    pub request_timeout_secs: u64,
}

impl Default for TipsConfig {
    fn default() -> Self {
        let window = OrderWindow::default();
        Self {
            remote_url: DEFAULT_TIPS_URL.into(),
            seed: DEFAULT_SEED,
            order_start: window.start,
            order_end: window.end,
            preview_rows: 50,
            request_timeout_secs: 30,
        }
    }
}

impl TipsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn order_window(&self) -> Result<OrderWindow, ConfigError> {
        OrderWindow::new(self.order_start, self.order_end).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "tips.order_start ({}) is after tips.order_end ({})",
                self.order_start, self.order_end
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub histogram_bins: usize,
    pub kde_grid_points: usize,
    pub scatter_opacity: f64,
    pub scatter_size_max: f64,
    pub bubble_size_max: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            kde_grid_points: 200,
            scatter_opacity: 0.7,
            scatter_size_max: 10.0,
            bubble_size_max: 15.0,
        }
    }
}

/// The complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub quotes: QuotesConfig,
    pub tips: TipsConfig,
    pub charts: ChartConfig,
}

impl DashConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when it exists, or
    /// fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quotes.default_ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("quotes.default_ticker is blank".into()));
        }
        if self.quotes.lookback_days == 0 || self.quotes.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid(format!(
                "quotes.lookback_days must be in 1..={MAX_LOOKBACK_DAYS}, got {}",
                self.quotes.lookback_days
            )));
        }
        self.tips.order_window()?;
        if self.charts.histogram_bins == 0 {
            return Err(ConfigError::Invalid("charts.histogram_bins must be > 0".into()));
        }
        if self.charts.kde_grid_points < 2 {
            return Err(ConfigError::Invalid("charts.kde_grid_points must be >= 2".into()));
        }
        let opacity = self.charts.scatter_opacity;
        if !(opacity > 0.0 && opacity <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "charts.scatter_opacity must be in (0, 1], got {opacity}"
            )));
        }
        for (name, value) in [
            ("charts.scatter_size_max", self.charts.scatter_size_max),
            ("charts.bubble_size_max", self.charts.bubble_size_max),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_is_capped() {
        let mut config = DashConfig::default();
        config.quotes.lookback_days = MAX_LOOKBACK_DAYS;
        assert!(config.validate().is_ok());

        config.quotes.lookback_days = 4_000_000_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lookback_days"));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = DashConfig::from_toml("").unwrap();
        assert_eq!(config, DashConfig::default());
        assert_eq!(config.quotes.default_ticker, "AAPL");
        assert_eq!(config.quotes.lookback_days, 90);
        assert_eq!(config.tips.seed, 42);
        assert_eq!(config.tips.preview_rows, 50);
        assert_eq!(config.charts.histogram_bins, 20);
        assert_eq!(config.quotes.cache_ttl(), None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashConfig::from_toml(
            r#"
            [quotes]
            default_ticker = "MSFT"
            cache_ttl_secs = 600

            [tips]
            order_start = "2024-02-01"
            order_end = "2024-02-29"
            "#,
        )
        .unwrap();

        assert_eq!(config.quotes.default_ticker, "MSFT");
        assert_eq!(config.quotes.lookback_days, 90);
        assert_eq!(config.quotes.cache_ttl(), Some(Duration::from_secs(600)));
        let window = config.tips.order_window().unwrap();
        assert_eq!(window.days(), 29);
        assert_eq!(config.tips.remote_url, DEFAULT_TIPS_URL);
    }

    #[test]
    fn toml_roundtrip() {
        let config = DashConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[charts]"));
        assert_eq!(DashConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn rejects_zero_bins() {
        let err = DashConfig::from_toml("[charts]\nhistogram_bins = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("histogram_bins")));
    }

    #[test]
    fn rejects_inverted_window() {
        let err = DashConfig::from_toml(
            "[tips]\norder_start = \"2023-02-01\"\norder_end = \"2023-01-01\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_opacity_out_of_range() {
        assert!(DashConfig::from_toml("[charts]\nscatter_opacity = 0.0\n").is_err());
        assert!(DashConfig::from_toml("[charts]\nscatter_opacity = 1.5\n").is_err());
        assert!(DashConfig::from_toml("[charts]\nscatter_opacity = 1.0\n").is_ok());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            DashConfig::from_toml("[quotes\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = DashConfig::from_file(Path::new("/nonexistent/dashlab.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
