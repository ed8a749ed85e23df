//! Report configuration loading.
//!
//! The report query (view id, date range, dimension and metric lists) and
//! the warehouse target table are an explicit YAML structure rather than
//! literals edited into the source before each run.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Where the flattened report lands.
///
/// `table` is resolved against the schema from the warehouse credential
/// file. `log_table`, when set, receives one run-summary row per
/// successful load.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub table: String,
    #[serde(default)]
    pub log_table: Option<String>,
}

/// One report query plus its destination, as loaded from the config file.
///
/// Dates are passed to the Reporting API verbatim: `YYYY-MM-DD` or the
/// API's relative keywords (`today`, `yesterday`, `NdaysAgo`).
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub view_id: String,
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub target: TargetConfig,
}

impl ReportConfig {
    /// Loads the report configuration from a YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it does not parse, or
    /// [`ConfigError::InvalidField`] if validation fails.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    /// Parses the report configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed YAML or
    /// [`ConfigError::InvalidField`] if a field fails validation.
    pub fn parse(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let non_empty = |field: &str, value: &str| -> Result<(), ConfigError> {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            Ok(())
        };

        non_empty("view_id", &self.view_id)?;
        non_empty("start_date", &self.start_date)?;
        non_empty("end_date", &self.end_date)?;
        non_empty("target.table", &self.target.table)?;

        if self.dimensions.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "dimensions".to_string(),
                reason: "at least one dimension is required".to_string(),
            });
        }
        if self.metrics.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "metrics".to_string(),
                reason: "at least one metric is required".to_string(),
            });
        }
        if let Some(log_table) = &self.target.log_table {
            non_empty("target.log_table", log_table)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\
view_id: \"180487021\"
start_date: \"2023-05-01\"
end_date: yesterday
dimensions:
  - \"ga:pagePath\"
  - \"ga:pageTitle\"
metrics:
  - \"ga:pageviews\"
  - \"ga:uniquePageviews\"
  - \"ga:avgTimeOnPage\"
target:
  table: page_performance
";

    #[test]
    fn parse_accepts_valid_config() {
        let config = ReportConfig::parse(VALID, "test").expect("should parse");
        assert_eq!(config.view_id, "180487021");
        assert_eq!(config.dimensions.len(), 2);
        assert_eq!(config.metrics.len(), 3);
        assert_eq!(config.target.table, "page_performance");
        assert!(config.target.log_table.is_none());
    }

    #[test]
    fn parse_accepts_log_table() {
        let raw = format!("{VALID}  log_table: load_log\n");
        let config = ReportConfig::parse(&raw, "test").expect("should parse");
        assert_eq!(config.target.log_table.as_deref(), Some("load_log"));
    }

    #[test]
    fn parse_rejects_empty_dimensions() {
        let raw = VALID.replace(
            "dimensions:\n  - \"ga:pagePath\"\n  - \"ga:pageTitle\"",
            "dimensions: []",
        );
        let result = ReportConfig::parse(&raw, "test");
        assert!(
            matches!(result, Err(ConfigError::InvalidField { ref field, .. }) if field == "dimensions"),
            "expected InvalidField(dimensions), got: {result:?}"
        );
    }

    #[test]
    fn parse_rejects_blank_view_id() {
        let raw = VALID.replace("view_id: \"180487021\"", "view_id: \"  \"");
        let result = ReportConfig::parse(&raw, "test");
        assert!(
            matches!(result, Err(ConfigError::InvalidField { ref field, .. }) if field == "view_id"),
            "expected InvalidField(view_id), got: {result:?}"
        );
    }

    #[test]
    fn parse_rejects_missing_target() {
        let raw = VALID.replace("target:\n  table: page_performance\n", "");
        let result = ReportConfig::parse(&raw, "test");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
