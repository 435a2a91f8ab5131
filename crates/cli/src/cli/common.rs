use std::path::{Path, PathBuf};

use sertypes_core::Config;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "sertypes.toml";

/// Load an explicit config file, or `sertypes.toml` from the working
/// directory when present, or fall back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                debug!("No {DEFAULT_CONFIG_FILE} found, using default configuration.");
                return Ok(Config::default());
            }
            default
        }
    };

    debug!(path = %path.display(), "Loading configuration.");
    Config::load(&path).map_err(|err| err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "namespace = \"Schema\"\nfile-extension = \"d.ts\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.namespace.as_deref(), Some("Schema"));
        assert_eq!(config.extension(), "d.ts");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.contains("missing.toml"));
    }
}
