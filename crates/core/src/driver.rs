//! The full generation run: discover, plan, render, write.

use std::fmt;
use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::discovery::{Catalog, Discover};
use crate::error::{GenerateError, Result};
use crate::index::IndexEmitter;
use crate::planner::ExportPlanner;
use crate::render::{Diagnostic, DiagnosticKind, Renderer};
use crate::sink::{FsSink, OutputSink};

/// One file produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    /// Relative to the output root.
    pub target_path: PathBuf,
    pub content: String,
    /// Source serializer; `None` for the index file.
    pub serializer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    /// Per-serializer files in generation order.
    pub units: Vec<RenderedUnit>,
    pub index: Option<RenderedUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationResult {
    /// Every written file, index last.
    pub fn files(&self) -> impl Iterator<Item = &RenderedUnit> {
        self.units.iter().chain(self.index.as_ref())
    }
}

pub struct Generator<'a> {
    config: &'a Config,
    discovery: &'a dyn Discover,
}

impl fmt::Debug for Generator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config, discovery: &'a dyn Discover) -> Self {
        Self { config, discovery }
    }

    /// Run one generation into `sink`.
    ///
    /// Everything is rendered before the first write, so configuration,
    /// discovery, rendering and collision errors leave the sink untouched.
    /// A write failure aborts the run and keeps earlier files in place.
    pub fn generate(&self, sink: &mut dyn OutputSink) -> Result<GenerationResult> {
        self.config.validate()?;

        let catalog = Catalog::discover(self.discovery)?;

        let type_map = self.config.type_map();
        let renderer = Renderer::new(self.config, &type_map, &catalog);
        let planned = ExportPlanner::new(self.config).plan(&catalog)?;

        let mut result = GenerationResult::default();
        for unit in planned {
            let rendered = renderer.render(unit.descriptor)?;
            result.diagnostics.extend(rendered.diagnostics);
            result.units.push(RenderedUnit {
                target_path: unit.path,
                content: rendered.content,
                serializer: Some(unit.descriptor.name.clone()),
            });
        }

        if self.config.strict {
            check_strict(&result.diagnostics)?;
        }

        result.index = IndexEmitter::new(self.config).emit(&result.units);

        sink.prepare()?;
        for file in result.files() {
            sink.write(&file.target_path, &file.content)?;
        }

        info!(
            files = result.units.len(),
            index = result.index.is_some(),
            warnings = result.diagnostics.len(),
            "Generated TypeScript declarations."
        );
        Ok(result)
    }
}

fn check_strict(diagnostics: &[Diagnostic]) -> Result<()> {
    let unknown = diagnostics.iter().find_map(|d| match &d.kind {
        DiagnosticKind::UnknownType { source_type } => Some((d, source_type)),
        DiagnosticKind::RecursiveInline { .. } => None,
    });

    match unknown {
        Some((diagnostic, source_type)) => Err(GenerateError::UnknownType {
            serializer: diagnostic.serializer.clone(),
            field: diagnostic.field.clone(),
            source_type: source_type.clone(),
        }),
        None => Ok(()),
    }
}

/// Generate into `config.output_dir` on disk.
pub fn generate(config: &Config, discovery: &dyn Discover) -> Result<GenerationResult> {
    let mut sink = FsSink::new(&config.output_dir);
    Generator::new(config, discovery).generate(&mut sink)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::descriptor::{Field, SerializerDescriptor};
    use crate::discovery::StaticDiscovery;
    use crate::sink::MemorySink;

    fn discovery() -> StaticDiscovery {
        StaticDiscovery::new(vec![
            SerializerDescriptor::new("SongSerializer")
                .with_flag("export")
                .with_field(Field::scalar("title", "text"))
                .with_field(Field::has_one("composer", "ComposerSerializer")),
            SerializerDescriptor::new("ComposerSerializer")
                .with_flag("export")
                .with_field(Field::scalar("name", "text")),
        ])
    }

    #[test]
    fn test_generate_into_memory() {
        let config = Config::default();
        let discovery = discovery();
        let mut sink = MemorySink::new();
        let result = Generator::new(&config, &discovery)
            .generate(&mut sink)
            .unwrap();

        assert_eq!(result.units.len(), 2);
        assert_eq!(sink.len(), 3);
        assert!(sink.get("Song.ts").unwrap().contains("composer: Composer;"));
        assert!(sink.get("index.ts").is_some());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_dangling_association_writes_nothing() {
        let config = Config::default();
        let discovery = StaticDiscovery::new(vec![
            SerializerDescriptor::new("ComposerSerializer")
                .with_flag("export")
                .with_field(Field::scalar("name", "text")),
            SerializerDescriptor::new("SongSerializer")
                .with_flag("export")
                .with_field(Field::has_one("label", "LabelSerializer")),
        ]);
        let mut sink = MemorySink::new();
        let err = Generator::new(&config, &discovery)
            .generate(&mut sink)
            .unwrap_err();

        assert!(matches!(err, GenerateError::DanglingAssociation { .. }));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_strict_mode_rejects_unknown_types() {
        let discovery = StaticDiscovery::new(vec![
            SerializerDescriptor::new("DocumentSerializer")
                .with_flag("export")
                .with_field(Field::scalar("search", "tsvector")),
        ]);

        let config = Config::default();
        let mut sink = MemorySink::new();
        let result = Generator::new(&config, &discovery)
            .generate(&mut sink)
            .unwrap();
        assert_eq!(result.diagnostics.len(), 1);

        let config = Config::default().with_strict(true);
        let mut sink = MemorySink::new();
        let err = Generator::new(&config, &discovery)
            .generate(&mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::UnknownType { ref source_type, .. } if source_type == "tsvector"
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config::default().with_namespace(Some("not valid".into()));
        let discovery = discovery();
        let mut sink = MemorySink::new();
        let err = Generator::new(&config, &discovery)
            .generate(&mut sink)
            .unwrap_err();
        assert!(matches!(err, GenerateError::Config(_)));
    }
}
