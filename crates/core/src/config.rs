//! Generator configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::ts::utils::is_ts_identifier;
use crate::type_map::TypeMap;

pub const DEFAULT_OUTPUT_DIR: &str = "app/frontend/types/serializers";
pub const DEFAULT_EXPORT_FLAG: &str = "export";
pub const DEFAULT_EXTENSION: &str = "ts";

/// How field names are written as property keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    /// Keep the declared field name.
    #[default]
    Preserve,
    /// `snake_case` -> `camelCase`
    Camel,
}

/// Configuration for a generation run.
///
/// Built once per process and read-only during a run. Tests rebuild it to
/// redirect output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Root directory for generated files.
    pub output_dir: PathBuf,
    /// Wraps every declaration under one qualifier and suppresses the index.
    pub namespace: Option<String>,
    /// Declared flag that marks a serializer for export.
    pub export_flag: String,
    pub file_extension: String,
    /// Merged over the built-in table, override wins.
    pub type_overrides: BTreeMap<String, String>,
    pub transform_keys: KeyCase,
    /// Treat unmapped source types as fatal.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            namespace: None,
            export_flag: DEFAULT_EXPORT_FLAG.to_string(),
            file_extension: DEFAULT_EXTENSION.to_string(),
            type_overrides: BTreeMap::new(),
            transform_keys: KeyCase::default(),
            strict: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML config file.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_export_flag(mut self, flag: impl Into<String>) -> Self {
        self.export_flag = flag.into();
        self
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn with_type_override(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.type_overrides.insert(source.into(), target.into());
        self
    }

    pub fn with_transform_keys(mut self, case: KeyCase) -> Self {
        self.transform_keys = case;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check values that would otherwise produce broken output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(namespace) = &self.namespace {
            if namespace.split('.').any(|segment| !is_ts_identifier(segment)) {
                return Err(ConfigError::InvalidNamespace(namespace.clone()));
            }
        }

        if self.export_flag.trim().is_empty() {
            return Err(ConfigError::EmptyExportFlag);
        }

        let extension = self.extension();
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidExtension(self.file_extension.clone()));
        }

        Ok(())
    }

    /// File extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.file_extension.trim().trim_start_matches('.')
    }

    /// Namespace directory segments (`Schema.Api` -> `Schema/Api`).
    pub fn namespace_dir(&self) -> Option<PathBuf> {
        self.namespace
            .as_deref()
            .map(|namespace| namespace.split('.').collect())
    }

    /// Build the type table snapshot for one run.
    pub fn type_map(&self) -> TypeMap {
        TypeMap::with_overrides(&self.type_overrides)
    }
}
