//! Warehouse credential file handling.
//!
//! The warehouse connection parameters live in a local JSON file colocated
//! with the binary. All seven fields are required; a missing field fails
//! deserialization and aborts the run before any connection is attempted.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Connection parameters for the target warehouse.
///
/// `account` is the warehouse host, `warehouse` names the compute target
/// (recorded as the connection's application name), and `role`/`schema`
/// are applied as session settings after connecting.
#[derive(Clone, Deserialize)]
pub struct WarehouseCredentials {
    pub user: String,
    pub password: String,
    pub account: String,
    pub role: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
}

impl std::fmt::Debug for WarehouseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehouseCredentials")
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("account", &self.account)
            .field("role", &self.role)
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .finish()
    }
}

impl WarehouseCredentials {
    /// Loads credentials from a JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if it is malformed or missing a required field.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    /// Parses credentials from a JSON string.
    ///
    /// `origin` labels the source in error messages (usually the file path).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed JSON or a missing field,
    /// or [`ConfigError::InvalidField`] if a required field is empty.
    pub fn parse(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let creds: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Json {
            path: origin.to_string(),
            source,
        })?;
        creds.validate()?;
        Ok(creds)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("user", &self.user),
            ("password", &self.password),
            ("account", &self.account),
            ("role", &self.role),
            ("warehouse", &self.warehouse),
            ("database", &self.database),
            ("schema", &self.schema),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    field: name.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_json() -> serde_json::Value {
        serde_json::json!({
            "user": "loader",
            "password": "hunter2",
            "account": "warehouse.internal",
            "role": "ETL_ROLE",
            "warehouse": "LOAD_WH",
            "database": "analytics",
            "schema": "ga"
        })
    }

    #[test]
    fn parse_accepts_complete_credentials() {
        let creds =
            WarehouseCredentials::parse(&full_json().to_string(), "test").expect("should parse");
        assert_eq!(creds.user, "loader");
        assert_eq!(creds.account, "warehouse.internal");
        assert_eq!(creds.schema, "ga");
    }

    #[test]
    fn parse_rejects_missing_field() {
        let mut body = full_json();
        body.as_object_mut().unwrap().remove("role");
        let result = WarehouseCredentials::parse(&body.to_string(), "test");
        assert!(
            matches!(result, Err(ConfigError::Json { .. })),
            "expected Json error for missing role, got: {result:?}"
        );
    }

    #[test]
    fn parse_rejects_empty_field() {
        let mut body = full_json();
        body["password"] = serde_json::json!("");
        let result = WarehouseCredentials::parse(&body.to_string(), "test");
        assert!(
            matches!(result, Err(ConfigError::InvalidField { ref field, .. }) if field == "password"),
            "expected InvalidField(password), got: {result:?}"
        );
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let result = WarehouseCredentials::parse("not json", "test");
        assert!(matches!(result, Err(ConfigError::Json { .. })));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let result = WarehouseCredentials::from_path("/nonexistent/warehouse.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn debug_redacts_password() {
        let creds =
            WarehouseCredentials::parse(&full_json().to_string(), "test").expect("should parse");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[redacted]"));
    }
}
