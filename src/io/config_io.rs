use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::SuggestConfig;

pub const CONFIG_FILE: &str = "tagdelta.toml";

/// Error type for reading suggestion rules
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read suggestion rules from an explicit path. The file must exist.
pub fn read_config(path: &Path) -> Result<SuggestConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read `tagdelta.toml` from the session directory, falling back to the
/// built-in rules when there is none.
pub fn load_config(dir: &Path) -> Result<SuggestConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        log::debug!("no {} in {}, using built-in rules", CONFIG_FILE, dir.display());
        return Ok(SuggestConfig::default());
    }
    read_config(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.max_suggestions, 6);
        assert_eq!(config.keywords.len(), 19);
    }

    #[test]
    fn test_reads_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"max_suggestions = 2

[status]
WATCH = "#watch"
"##,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.max_suggestions, 2);
        assert_eq!(config.status.len(), 1);
        assert_eq!(config.status.get("WATCH").unwrap(), "#watch");
    }

    #[test]
    fn test_malformed_config_names_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "max_suggestions = [").unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_config(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
