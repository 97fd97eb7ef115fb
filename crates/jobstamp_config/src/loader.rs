//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::StampConfig;
use std::path::Path;

/// Loads and validates a jobstamp configuration file.
pub fn load_config(path: &Path) -> Result<StampConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a jobstamp configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<StampConfig, ConfigError> {
    let config: StampConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &StampConfig) -> Result<(), ConfigError> {
    if let Some(dir) = &config.cache.directory {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "cache.directory must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobstamp_common::StampMethod;
    use std::path::PathBuf;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert!(config.cache.directory.is_none());
        assert!(config.cache.method.is_none());
        assert!(!config.switches.debug);
        assert!(!config.switches.always_use_hashes);
        assert!(!config.switches.disabled);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[cache]
directory = "/var/tmp/stamps"
method = "hash"

[switches]
debug = true
always_use_hashes = false
disabled = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.cache.directory,
            Some(PathBuf::from("/var/tmp/stamps"))
        );
        assert_eq!(config.cache.method, Some(StampMethod::Hash));
        assert!(config.switches.debug);
        assert!(!config.switches.always_use_hashes);
        assert!(config.switches.disabled);
    }

    #[test]
    fn unknown_method_is_parse_error() {
        let toml = r#"
[cache]
method = "sha256"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_directory_rejected() {
        let toml = r#"
[cache]
directory = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn malformed_toml() {
        let err = load_config_from_str("[cache\ndirectory = 1").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobstamp.toml");
        std::fs::write(&path, "[cache]\nmethod = \"mtime\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.cache.method, Some(StampMethod::MTime));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
