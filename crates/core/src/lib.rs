//! TypeScript declarations generated from serializer definitions.
//!
//! A run discovers serializer descriptors, keeps the ones flagged for
//! export, renders one interface per serializer and writes the files plus an
//! `index` barrel below the configured output directory.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sertypes_core::{Config, Manifest, generate};
//!
//! let manifest = Manifest::load(Path::new("serializers.yaml"))?;
//! let result = generate(&Config::default(), &manifest)?;
//! println!("{} files", result.units.len());
//! # Ok::<(), sertypes_core::GenerateError>(())
//! ```

pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod index;
pub mod planner;
pub mod render;
pub mod sink;
pub mod ts;
pub mod type_map;

pub use config::{Config, KeyCase};
pub use descriptor::{Field, FieldKind, SerializerDescriptor, TypeName};
pub use discovery::{Catalog, Discover, Manifest, StaticDiscovery};
pub use driver::{GenerationResult, Generator, RenderedUnit, generate};
pub use error::{ConfigError, DiscoveryError, GenerateError, Result};
pub use index::IndexEmitter;
pub use planner::{ExportPlanner, PlannedUnit, is_eligible};
pub use render::{Diagnostic, DiagnosticKind, Renderer};
pub use sink::{FsSink, MemorySink, OutputSink};
pub use type_map::{Resolved, TypeMap};
