//! Error types for configuration, discovery and generation.

use std::io;
use std::path::PathBuf;

/// Problems with the generator configuration.
///
/// These are raised before any serializer is rendered.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The output directory cannot be created or is not writable.
    #[error("output directory {} is not writable: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },

    #[error("invalid namespace `{0}`: expected a dotted TypeScript identifier path")]
    InvalidNamespace(String),

    #[error("export flag name must not be empty")]
    EmptyExportFlag,

    #[error("invalid file extension `{0}`")]
    InvalidExtension(String),

    #[error("failed to read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Problems while turning serializer definitions into descriptors.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to read serializer manifest {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse serializer manifest {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported manifest format for {} (expected .json, .yaml, .yml or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A field must declare exactly one of `type`, `has_one`, `has_many` or `fields`.
    #[error("field `{field}` of `{serializer}` must declare exactly one of type, has_one, has_many or fields")]
    AmbiguousField { serializer: String, field: String },

    #[error("`{serializer}` extends unknown serializer `{parent}`")]
    UnknownParent { serializer: String, parent: String },

    #[error("inheritance cycle detected: {}", chain.join(" -> "))]
    InheritanceCycle { chain: Vec<String> },
}

/// Fatal errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// An association points at a serializer that discovery never produced.
    #[error("`{serializer}` field `{field}` references unknown serializer `{missing}`")]
    DanglingAssociation {
        serializer: String,
        field: String,
        missing: String,
    },

    /// Only raised in strict mode; otherwise unknown types are diagnostics.
    #[error("`{serializer}` field `{field}` has unmapped source type `{source_type}`")]
    UnknownType {
        serializer: String,
        field: String,
        source_type: String,
    },

    #[error("`{first}` and `{second}` both generate {}", path.display())]
    PathCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// Two exported serializers map to the same interface name.
    #[error("`{first}` and `{second}` both declare interface `{name}`")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("`{serializer}` would overwrite the generated index {}", path.display())]
    ReservedPath { path: PathBuf, serializer: String },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerateError>;
