use crate::canvas::CanvasKind;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Output
    pub report_format: CanvasKind,
    pub output_dir: PathBuf,

    // Charts
    pub chart_width: u32,

    // Defaults for requests that leave fields out
    pub default_business_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_format: CanvasKind::Pdf,
            output_dir: PathBuf::from("reports"),
            chart_width: 720,
            default_business_type: "general".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let report_format = match lookup("REPORT_FORMAT") {
            Some(value) => value
                .parse::<CanvasKind>()
                .with_context(|| format!("REPORT_FORMAT has invalid value '{}'", value))?,
            None => defaults.report_format,
        };

        let chart_width = match lookup("CHART_WIDTH") {
            Some(value) => {
                let width: u32 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("CHART_WIDTH must be a positive integer, got '{}'", value))?;
                if width == 0 {
                    bail!("CHART_WIDTH must be greater than zero");
                }
                width
            }
            None => defaults.chart_width,
        };

        Ok(Self {
            report_format,
            output_dir: lookup("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            chart_width,
            default_business_type: lookup("DEFAULT_BUSINESS_TYPE")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.default_business_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.chart_width, 720);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("REPORT_FORMAT", "text"),
            ("REPORT_OUTPUT_DIR", "/tmp/out"),
            ("CHART_WIDTH", "480"),
            ("DEFAULT_BUSINESS_TYPE", "retail"),
        ])
        .unwrap();

        assert_eq!(config.report_format, CanvasKind::Text);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.chart_width, 480);
        assert_eq!(config.default_business_type, "retail");
    }

    #[test]
    fn test_invalid_format_fails() {
        let err = config_from(&[("REPORT_FORMAT", "pdf")]).unwrap_err();
        assert!(err.to_string().contains("REPORT_FORMAT"));
    }

    #[test]
    fn test_invalid_chart_width_fails() {
        assert!(config_from(&[("CHART_WIDTH", "wide")]).is_err());
        assert!(config_from(&[("CHART_WIDTH", "0")]).is_err());
    }

    #[test]
    fn test_blank_business_type_uses_default() {
        let config = config_from(&[("DEFAULT_BUSINESS_TYPE", "  ")]).unwrap();
        assert_eq!(config.default_business_type, "general");
    }
}
