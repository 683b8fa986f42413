/// Integration tests for reading biobb style configuration files
use ahatool_core::config::{read_properties, StartMode};
use ahatool_core::AhatoolError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_biobb_step_config_yaml() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ahatool.yml");

    let content = r#"
properties:
  threads: 2
  database: /databases/nr_test.fa
  binary_path: /opt/AHATool/AHATool.sh
  support_folder: /opt/AHATool/AHATool_Resources/
  remove_tmp: false
  container_image: bsceapm/ahatool:1.8
"#;
    fs::write(&config, content).unwrap();

    let props = read_properties(config.to_str()).unwrap();

    assert_eq!(props.threads, Some(2));
    assert_eq!(props.database.as_deref(), Some("/databases/nr_test.fa"));
    assert_eq!(props.binary_path.as_deref(), Some("/opt/AHATool/AHATool.sh"));
    assert_eq!(props.container_image.as_deref(), Some("bsceapm/ahatool:1.8"));
    assert!(!props.remove_tmp);
    assert!(!props.restart);
}

#[test]
fn test_flat_json_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ahatool.json");
    fs::write(
        &config,
        r#"{"prefix": "2410151200", "start": "build", "evalue": 1e-10, "restart": true}"#,
    )
    .unwrap();

    let props = read_properties(config.to_str()).unwrap();

    assert_eq!(props.prefix.as_deref(), Some("2410151200"));
    assert_eq!(props.start, Some(StartMode::Build));
    assert_eq!(props.evalue, Some(1e-10));
    assert!(props.restart);
}

#[test]
fn test_invalid_values_fail_fast() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ahatool.toml");
    fs::write(&config, "threads = 0\n").unwrap();

    let err = read_properties(config.to_str()).unwrap_err();
    assert!(matches!(err, AhatoolError::InvalidProperty { ref key, .. } if key == "threads"));
}

#[test]
fn test_malformed_yaml_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.yaml");
    fs::write(&config, "properties: [unclosed\n").unwrap();

    let err = read_properties(config.to_str()).unwrap_err();
    assert!(matches!(err, AhatoolError::Serialization(_)));
}
