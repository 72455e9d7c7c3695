//! Driver configuration and module metadata.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Options the hub passes to [`crate::Driver::start`].
///
/// Every field has a default, so an empty JSON object is a valid config.
///
/// # Examples
///
/// ```
/// use limitless_driver::DriverConfig;
///
/// let config = DriverConfig::from_json("{}").unwrap();
/// assert!(!config.fail_fast);
/// assert!(config.command_timeout().is_none());
///
/// let config = DriverConfig::from_json(r#"{"failFast": true, "commandTimeoutMs": 1500}"#).unwrap();
/// assert!(config.fail_fast);
/// assert_eq!(config.command_timeout().unwrap().as_millis(), 1500);
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverConfig {
    /// Stop the dispatcher on the first bulb that cannot be brought onto the
    /// hub instead of logging and skipping it.
    pub fail_fast: bool,
    /// Upper bound for each command sent through the vendor client.
    pub command_timeout_ms: Option<u64>,
}

impl DriverConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::JsonLoad)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_ms.map(Duration::from_millis)
    }
}

/// Driver metadata, normally read from the module's `package.json`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

impl ModuleInfo {
    pub fn new(id: &str, name: &str) -> Self {
        ModuleInfo {
            id: id.to_string(),
            name: name.to_string(),
            version: None,
            description: None,
            author: None,
            license: None,
        }
    }

    /// Parse module metadata from `package.json` contents.
    ///
    /// Unknown keys (scripts, dependencies, ...) are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::JsonLoad)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE_JSON: &str = r#"{
        "id": "com.limitless.driver",
        "name": "driver-limitless",
        "version": "0.1.2",
        "description": "Limitless bulb driver",
        "scripts": {"start": "./driver-limitless"}
    }"#;

    #[test]
    fn test_module_info_from_package_json() {
        let info = ModuleInfo::from_json(PACKAGE_JSON).unwrap();
        assert_eq!(info.id, "com.limitless.driver");
        assert_eq!(info.name, "driver-limitless");
        assert_eq!(info.version.as_deref(), Some("0.1.2"));
        assert!(info.author.is_none());
    }

    #[test]
    fn test_module_info_requires_id() {
        let err = ModuleInfo::from_json(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::JsonLoad(_)));
    }

    #[test]
    fn test_module_info_load_missing_file() {
        let err = ModuleInfo::load("/nonexistent/package.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_module_info_load_from_disk() {
        let path = std::env::temp_dir().join(format!("limitless-pkg-{}.json", std::process::id()));
        std::fs::write(&path, PACKAGE_JSON).unwrap();
        let info = ModuleInfo::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(info, ModuleInfo::from_json(PACKAGE_JSON).unwrap());
    }

    #[test]
    fn test_config_skips_unset_timeout() {
        let json = serde_json::to_value(DriverConfig::default()).unwrap();
        assert_eq!(json, serde_json::json!({"failFast": false}));
    }
}
