//! Property set for the AHATool building blocks
//!
//! Properties arrive as a loosely typed map (a config file or an inline JSON
//! string, the way biobb's `ConfReader` hands them over) and are turned into
//! the typed [`Properties`] struct here. Keys this building block does not
//! know about are reported and dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::defaults;
use crate::{AhatoolError, AhatoolResult};

/// Every key a building block in this crate understands
pub const RECOGNIZED_KEYS: &[&str] = &[
    "prefix",
    "start",
    "database",
    "evalue",
    "threads",
    "binary_path",
    "remove_tmp",
    "restart",
    "sandbox_path",
    "container_path",
    "container_image",
    "container_volume_path",
    "container_working_dir",
    "container_shell_path",
    "container_user_id",
];

/// Where AHATool starts its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    Build,
    Search,
}

impl StartMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartMode::Build => "build",
            StartMode::Search => "search",
        }
    }
}

impl Default for StartMode {
    fn default() -> Self {
        StartMode::Build
    }
}

impl fmt::Display for StartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed property set shared by the direct and container building blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Prefix AHATool uses for produced files
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub start: Option<StartMode>,
    /// Database file, `nr.fa` selects the bundled one
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub evalue: Option<f64>,
    #[serde(default)]
    pub threads: Option<u32>,
    /// Overrides the adapter specific default script
    #[serde(default)]
    pub binary_path: Option<String>,
    #[serde(default = "default_remove_tmp")]
    pub remove_tmp: bool,
    #[serde(default = "default_restart")]
    pub restart: bool,
    #[serde(default)]
    pub sandbox_path: Option<PathBuf>,
    #[serde(default)]
    pub container_path: Option<String>,
    #[serde(default)]
    pub container_image: Option<String>,
    #[serde(default)]
    pub container_volume_path: Option<String>,
    #[serde(default)]
    pub container_working_dir: Option<String>,
    #[serde(default)]
    pub container_shell_path: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub container_user_id: Option<String>,
}

fn default_remove_tmp() -> bool { defaults::DEFAULT_REMOVE_TMP }
fn default_restart() -> bool { defaults::DEFAULT_RESTART }

/// User ids show up both as `1000` and `"1000"` in biobb configs
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            prefix: None,
            start: None,
            database: None,
            evalue: None,
            threads: None,
            binary_path: None,
            remove_tmp: default_remove_tmp(),
            restart: default_restart(),
            sandbox_path: None,
            container_path: None,
            container_image: None,
            container_volume_path: None,
            container_working_dir: None,
            container_shell_path: None,
            container_user_id: None,
        }
    }
}

impl Properties {
    /// Build a property set from a loosely typed map, ignoring unknown keys
    pub fn from_map(map: &Map<String, Value>) -> AhatoolResult<Self> {
        let mut known = Map::new();
        for (key, value) in map {
            if RECOGNIZED_KEYS.contains(&key.as_str()) {
                known.insert(key.clone(), value.clone());
            } else {
                warn!(key = %key, "Ignoring unrecognized property");
            }
        }

        let properties: Properties = serde_json::from_value(Value::Object(known))
            .map_err(|e| AhatoolError::Configuration(format!("Failed to parse properties: {}", e)))?;
        properties.validate()?;
        Ok(properties)
    }

    /// Reject malformed values
    pub fn validate(&self) -> AhatoolResult<()> {
        if let Some(prefix) = &self.prefix {
            if prefix.trim().is_empty() {
                return Err(AhatoolError::invalid_property("prefix", "must not be empty"));
            }
            if prefix.chars().any(char::is_whitespace) {
                return Err(AhatoolError::invalid_property("prefix", "must not contain whitespace"));
            }
        }
        if let Some(database) = &self.database {
            if database.trim().is_empty() {
                return Err(AhatoolError::invalid_property("database", "must not be empty"));
            }
        }
        if let Some(evalue) = self.evalue {
            if !evalue.is_finite() || evalue <= 0.0 {
                return Err(AhatoolError::invalid_property(
                    "evalue",
                    format!("must be a positive number, got {}", evalue),
                ));
            }
        }
        if self.threads == Some(0) {
            return Err(AhatoolError::invalid_property("threads", "must be greater than zero"));
        }
        if let Some(binary_path) = &self.binary_path {
            if binary_path.trim().is_empty() {
                return Err(AhatoolError::invalid_property("binary_path", "must not be empty"));
            }
        }
        if let Some(volume) = &self.container_volume_path {
            if !volume.starts_with('/') {
                return Err(AhatoolError::invalid_property(
                    "container_volume_path",
                    "must be an absolute path inside the container",
                ));
            }
        }
        Ok(())
    }

    /// Binary path, falling back to the adapter's default
    pub fn binary_path_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.binary_path.as_deref().unwrap_or(default)
    }
}

/// Format an e-value the way AHATool's own wrappers print floats
///
/// Scientific notation below 1e-4 and from 1e16 on, with a signed exponent
/// of at least two digits (`1e-05`, `1e-10`, `1e+16`); plain decimals keep
/// a fractional part (`0.001`, `10.0`).
pub fn format_evalue(evalue: f64) -> String {
    let magnitude = evalue.abs();
    if magnitude != 0.0 && (magnitude < 1e-4 || magnitude >= 1e16) {
        let formatted = format!("{:e}", evalue);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        }
    } else if evalue.is_finite() && evalue.fract() == 0.0 {
        format!("{:.1}", evalue)
    } else {
        format!("{}", evalue)
    }
}

/// Read a property set from a config file path or an inline JSON string
///
/// Files are parsed by extension (`.json`, `.yml`/`.yaml`, `.toml`). A
/// top-level `properties` table is used when present, otherwise the whole
/// document is taken as the property map. An empty config yields defaults.
pub fn read_properties(config: Option<&str>) -> AhatoolResult<Properties> {
    let config = match config.map(str::trim) {
        None | Some("") => return Ok(Properties::default()),
        Some(c) => c,
    };

    let document = if Path::new(config).is_file() {
        debug!(path = %config, "Reading configuration file");
        parse_config_file(Path::new(config))?
    } else {
        serde_json::from_str::<Value>(config).map_err(|e| {
            AhatoolError::Configuration(format!(
                "'{}' is neither a readable file nor a JSON document: {}",
                config, e
            ))
        })?
    };

    let map = match document {
        Value::Object(mut map) => match map.remove("properties") {
            Some(Value::Object(props)) => props,
            Some(Value::Null) | None => map,
            Some(_) => {
                return Err(AhatoolError::Configuration(
                    "'properties' must be a table".to_string(),
                ))
            }
        },
        Value::Null => Map::new(),
        _ => {
            return Err(AhatoolError::Configuration(
                "configuration must be a table of properties".to_string(),
            ))
        }
    };

    Properties::from_map(&map)
}

fn parse_config_file(path: &Path) -> AhatoolResult<Value> {
    let contents = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let value = match extension.as_str() {
        "yml" | "yaml" => serde_yaml::from_str::<Value>(&contents)?,
        "toml" => toml::from_str::<Value>(&contents)?,
        _ => serde_json::from_str::<Value>(&contents)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_default_properties() {
        let props = Properties::default();

        assert_eq!(props.prefix, None);
        assert_eq!(props.start, None);
        assert_eq!(props.database, None);
        assert_eq!(props.evalue, None);
        assert_eq!(props.threads, None);
        assert!(props.remove_tmp);
        assert!(!props.restart);
        assert_eq!(props.binary_path_or(defaults::DEFAULT_BINARY_PATH), "AHATool.sh");
    }

    #[test]
    fn test_from_map_typed_values() {
        let props = Properties::from_map(&map(json!({
            "prefix": "run01",
            "start": "search",
            "database": "/data/custom.fa",
            "evalue": 1e-5,
            "threads": 4,
            "remove_tmp": false,
            "container_user_id": 1000
        })))
        .unwrap();

        assert_eq!(props.prefix.as_deref(), Some("run01"));
        assert_eq!(props.start, Some(StartMode::Search));
        assert_eq!(props.database.as_deref(), Some("/data/custom.fa"));
        assert_eq!(props.evalue, Some(1e-5));
        assert_eq!(props.threads, Some(4));
        assert!(!props.remove_tmp);
        assert_eq!(props.container_user_id.as_deref(), Some("1000"));
    }

    #[test]
    fn test_from_map_ignores_unknown_keys() {
        let props = Properties::from_map(&map(json!({
            "threads": 2,
            "support_folder": "/opt/AHATool_Resources/",
            "host_volume_path": "/databases"
        })))
        .unwrap();

        assert_eq!(props.threads, Some(2));
        assert_eq!(props, Properties { threads: Some(2), ..Properties::default() });
    }

    #[test]
    fn test_from_map_rejects_bad_start() {
        let result = Properties::from_map(&map(json!({ "start": "align" })));
        assert!(matches!(result, Err(AhatoolError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_malformed_values() {
        let zero_threads = Properties { threads: Some(0), ..Properties::default() };
        assert!(matches!(
            zero_threads.validate(),
            Err(AhatoolError::InvalidProperty { ref key, .. }) if key == "threads"
        ));

        let negative_evalue = Properties { evalue: Some(-1.0), ..Properties::default() };
        assert!(negative_evalue.validate().is_err());

        let spaced_prefix = Properties { prefix: Some("a b".into()), ..Properties::default() };
        assert!(spaced_prefix.validate().is_err());

        let relative_volume = Properties {
            container_volume_path: Some("projects".into()),
            ..Properties::default()
        };
        assert!(relative_volume.validate().is_err());
    }

    #[test]
    fn test_start_mode_display() {
        assert_eq!(StartMode::Build.to_string(), "build");
        assert_eq!(StartMode::Search.to_string(), "search");
    }

    #[test]
    fn test_format_evalue() {
        assert_eq!(format_evalue(1e-10), "1e-10");
        assert_eq!(format_evalue(0.001), "0.001");
        assert_eq!(format_evalue(10.0), "10.0");
        assert_eq!(format_evalue(1e-5), "1e-05");
        assert_eq!(format_evalue(2.5e-7), "2.5e-07");
        assert_eq!(format_evalue(1e-100), "1e-100");
        assert_eq!(format_evalue(1e16), "1e+16");
        assert_eq!(format_evalue(0.0001), "0.0001");
    }

    #[test]
    fn test_read_properties_empty() {
        assert_eq!(read_properties(None).unwrap(), Properties::default());
        assert_eq!(read_properties(Some("{}")).unwrap(), Properties::default());
    }

    #[test]
    fn test_read_properties_inline_json() {
        let props = read_properties(Some(r#"{"properties": {"threads": 4, "prefix": "x"}}"#)).unwrap();
        assert_eq!(props.threads, Some(4));
        assert_eq!(props.prefix.as_deref(), Some("x"));
    }

    #[test]
    fn test_read_properties_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        write!(
            file,
            "properties:\n  threads: 2\n  database: nr_test.fa\n  remove_tmp: false\n"
        )
        .unwrap();

        let props = read_properties(file.path().to_str()).unwrap();
        assert_eq!(props.threads, Some(2));
        assert_eq!(props.database.as_deref(), Some("nr_test.fa"));
        assert!(!props.remove_tmp);
    }

    #[test]
    fn test_read_properties_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "start = \"search\"\nevalue = 1e-5\n").unwrap();

        let props = read_properties(file.path().to_str()).unwrap();
        assert_eq!(props.start, Some(StartMode::Search));
        assert_eq!(props.evalue, Some(1e-5));
    }

    #[test]
    fn test_read_properties_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"restart": true, "container_image": "bsceapm/ahatool:1.8"}}"#).unwrap();

        let props = read_properties(file.path().to_str()).unwrap();
        assert!(props.restart);
        assert_eq!(props.container_image.as_deref(), Some("bsceapm/ahatool:1.8"));
    }

    #[test]
    fn test_read_properties_invalid() {
        let result = read_properties(Some("this is not valid {{"));
        match result.unwrap_err() {
            AhatoolError::Configuration(msg) => assert!(msg.contains("neither a readable file")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }

        assert!(read_properties(Some("[1, 2]")).is_err());
    }
}
