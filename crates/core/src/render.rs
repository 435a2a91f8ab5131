//! Rendering of one serializer into a TypeScript declaration file.
//!
//! The renderer walks a descriptor's fields in declaration order and builds
//! TypeScript IR, which is then emitted via [`Emit`]:
//! - Scalar fields go through the [`TypeMap`]
//! - Associations to exported serializers become named references
//! - Associations to non-exported serializers are inlined as object types
//! - Inline structs recurse with the same algorithm
//!
//! Unmapped source types never fail rendering. They render as `unknown`
//! and are reported as [`Diagnostic`]s.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::config::{Config, KeyCase};
use crate::descriptor::{Field, FieldKind, SerializerDescriptor, TypeName};
use crate::discovery::Catalog;
use crate::error::{GenerateError, Result};
use crate::planner::is_eligible;
use crate::ts::utils::to_camel_case;
use crate::ts::{
    Emit, TsImport, TsModule, TsNamespace, TsPrimitive, TsProp, TsType, TsTypeDef, TypeDefKind,
};
use crate::type_map::{Resolved, TypeMap};

/// First line of every generated file.
pub const HEADER: &str = "Generated by sertypes. Do not edit this file by hand.";

/// Non-fatal problem found while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub serializer: String,
    /// Dotted path for fields inside inline structs, e.g. `meta.plays`.
    pub field: String,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No type map entry for the source type.
    UnknownType { source_type: String },
    /// A non-exported association target refers back to itself.
    RecursiveInline { target: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnknownType { source_type } => write!(
                f,
                "{}.{}: unmapped source type `{source_type}`, rendered as unknown",
                self.serializer, self.field
            ),
            DiagnosticKind::RecursiveInline { target } => write!(
                f,
                "{}.{}: `{target}` is not exported and refers to itself, rendered as unknown",
                self.serializer, self.field
            ),
        }
    }
}

/// Rendered file content plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-descriptor rendering state.
struct Context<'d> {
    root: &'d SerializerDescriptor,
    root_name: TypeName,
    /// module path -> imported identifier, sorted for stable output
    imports: BTreeMap<String, String>,
    /// Non-exported targets currently being inlined
    inline_stack: Vec<String>,
    field_path: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Context<'_> {
    fn diagnostic(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            serializer: self.root.name.clone(),
            field: self.field_path.join("."),
            kind,
        };
        warn!(
            serializer = %diagnostic.serializer,
            field = %diagnostic.field,
            "{diagnostic}"
        );
        self.diagnostics.push(diagnostic);
    }
}

/// Renders descriptors against one configuration and type map.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    config: &'a Config,
    type_map: &'a TypeMap,
    catalog: &'a Catalog,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a Config, type_map: &'a TypeMap, catalog: &'a Catalog) -> Self {
        Self {
            config,
            type_map,
            catalog,
        }
    }

    /// Render the full file for `descriptor`.
    pub fn render(&self, descriptor: &SerializerDescriptor) -> Result<Rendered> {
        let (module, diagnostics) = self.render_module(descriptor)?;
        Ok(Rendered {
            content: module.emit(),
            diagnostics,
        })
    }

    /// Build the file IR for `descriptor`.
    pub fn render_module(
        &self,
        descriptor: &SerializerDescriptor,
    ) -> Result<(TsModule, Vec<Diagnostic>)> {
        let mut ctx = Context {
            root: descriptor,
            root_name: descriptor.type_name(),
            imports: BTreeMap::new(),
            inline_stack: Vec::new(),
            field_path: Vec::new(),
            diagnostics: Vec::new(),
        };

        let properties = self.properties(&mut ctx, descriptor.fields())?;
        let header = vec![HEADER.to_string()];

        let module = match &self.config.namespace {
            Some(namespace) => {
                let mut path: Vec<String> = namespace.split('.').map(str::to_string).collect();
                path.extend(ctx.root_name.parents().iter().cloned());
                TsModule {
                    header,
                    namespaces: vec![TsNamespace {
                        path,
                        types: vec![TsTypeDef {
                            name: ctx.root_name.last().to_string(),
                            kind: TypeDefKind::Interface { properties },
                            is_export: false,
                        }],
                    }],
                    ..TsModule::default()
                }
            }
            None => TsModule {
                header,
                imports: ctx
                    .imports
                    .iter()
                    .map(|(from, ident)| TsImport {
                        names: vec![ident.clone()],
                        from: from.clone(),
                    })
                    .collect(),
                types: vec![TsTypeDef {
                    name: ctx.root_name.ident(),
                    kind: TypeDefKind::Interface { properties },
                    is_export: true,
                }],
                ..TsModule::default()
            },
        };

        Ok((module, ctx.diagnostics))
    }

    fn properties(&self, ctx: &mut Context<'_>, fields: &[Field]) -> Result<Vec<TsProp>> {
        let mut properties = Vec::with_capacity(fields.len());
        for field in fields {
            ctx.field_path.push(field.name.clone());
            let ty = self.field_type(ctx, field);
            ctx.field_path.pop();
            properties.push(TsProp {
                name: self.property_name(&field.name),
                ty: ty?,
                optional: field.optional,
            });
        }
        Ok(properties)
    }

    fn property_name(&self, name: &str) -> String {
        match self.config.transform_keys {
            KeyCase::Preserve => name.to_string(),
            KeyCase::Camel => to_camel_case(name),
        }
    }

    fn field_type(&self, ctx: &mut Context<'_>, field: &Field) -> Result<TsType> {
        let ty = match &field.kind {
            FieldKind::Scalar { source_type } => match &field.ts_type {
                Some(raw) => TsType::Ref(raw.clone()),
                None => self.scalar_type(ctx, source_type),
            },
            FieldKind::HasOne { serializer } => self.association_type(ctx, serializer)?,
            FieldKind::HasMany { serializer } => {
                TsType::array(self.association_type(ctx, serializer)?)
            }
            FieldKind::InlineStruct { fields } => TsType::Object(self.properties(ctx, fields)?),
        };

        Ok(if field.nullable {
            TsType::nullable(ty)
        } else {
            ty
        })
    }

    fn scalar_type(&self, ctx: &mut Context<'_>, source_type: &str) -> TsType {
        match self.type_map.resolve(source_type) {
            Resolved::Known(target) => primitive_or_ref(target),
            Resolved::Unknown => {
                ctx.diagnostic(DiagnosticKind::UnknownType {
                    source_type: source_type.to_string(),
                });
                TsType::Primitive(TsPrimitive::Unknown)
            }
        }
    }

    fn association_type(&self, ctx: &mut Context<'_>, target_name: &str) -> Result<TsType> {
        let Some(target) = self.catalog.get(target_name) else {
            return Err(GenerateError::DanglingAssociation {
                serializer: ctx.root.name.clone(),
                field: ctx.field_path.join("."),
                missing: target_name.to_string(),
            });
        };

        if is_eligible(target, &self.config.export_flag) {
            return Ok(self.reference(ctx, target));
        }

        // Not exported: resolve its fields in place.
        if ctx.inline_stack.iter().any(|name| name == &target.name) {
            ctx.diagnostic(DiagnosticKind::RecursiveInline {
                target: target.name.clone(),
            });
            return Ok(TsType::Primitive(TsPrimitive::Unknown));
        }

        ctx.inline_stack.push(target.name.clone());
        let properties = self.properties(ctx, target.fields());
        ctx.inline_stack.pop();
        Ok(TsType::Object(properties?))
    }

    fn reference(&self, ctx: &mut Context<'_>, target: &SerializerDescriptor) -> TsType {
        let target_name = target.type_name();

        if let Some(namespace) = &self.config.namespace {
            return TsType::Ref(format!("{namespace}.{}", target_name.qualified()));
        }

        let ident = target_name.ident();
        if target.name != ctx.root.name {
            ctx.imports
                .insert(relative_module(&ctx.root_name, &target_name), ident.clone());
        }
        TsType::Ref(ident)
    }
}

fn primitive_or_ref(target: &str) -> TsType {
    match target {
        "string" => TsType::Primitive(TsPrimitive::String),
        "number" => TsType::Primitive(TsPrimitive::Number),
        "boolean" => TsType::Primitive(TsPrimitive::Boolean),
        "null" => TsType::Primitive(TsPrimitive::Null),
        "unknown" => TsType::Primitive(TsPrimitive::Unknown),
        other => TsType::Ref(other.to_string()),
    }
}

/// Import specifier for `to` as seen from the file generated for `from`.
pub(crate) fn relative_module(from: &TypeName, to: &TypeName) -> String {
    let from_dir = from.parents();
    let to_dir = to.parents();

    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat_n("..", from_dir.len() - common));
    parts.extend(to.segments()[common..].iter().map(String::as_str));

    if from_dir.len() == common {
        format!("./{}", parts.join("/"))
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            SerializerDescriptor::new("BaseSerializer").with_field(Field::scalar("id", "integer")),
            SerializerDescriptor::new("SongSerializer")
                .with_flag("export")
                .with_field(Field::scalar("id", "integer"))
                .with_field(Field::scalar("title", "text"))
                .with_field(Field::has_one("composer", "ComposerSerializer"))
                .with_field(Field::has_one("album", "Nested::AlbumSerializer").optional()),
            SerializerDescriptor::new("ComposerSerializer")
                .with_flag("export")
                .with_field(Field::scalar("name", "citext"))
                .with_field(Field::has_many("songs", "SongSerializer")),
            SerializerDescriptor::new("Nested::AlbumSerializer")
                .with_flag("export")
                .with_field(Field::scalar("title", "string"))
                .with_field(Field::has_many("songs", "SongSerializer")),
        ])
    }

    fn render(config: &Config, catalog: &Catalog, name: &str) -> Rendered {
        let type_map = config.type_map();
        let renderer = Renderer::new(config, &type_map, catalog);
        renderer.render(catalog.get(name).unwrap()).unwrap()
    }

    #[test]
    fn test_render_song_default_mode() {
        let catalog = catalog();
        let rendered = render(&Config::default(), &catalog, "SongSerializer");
        let expected = "\
// Generated by sertypes. Do not edit this file by hand.

import type { Composer } from \"./Composer\";
import type { NestedAlbum } from \"./Nested/Album\";

export interface Song {
  id: number;
  title: string;
  composer: Composer;
  album?: NestedAlbum;
}
";
        assert_eq!(rendered.content, expected);
        assert!(rendered.diagnostics.is_empty());
    }

    #[test]
    fn test_render_nested_imports_relative_to_directory() {
        let catalog = catalog();
        let rendered = render(&Config::default(), &catalog, "Nested::AlbumSerializer");
        assert!(rendered.content.contains("import type { Song } from \"../Song\";\n"));
        assert!(rendered.content.contains("export interface NestedAlbum {\n"));
        assert!(rendered.content.contains("  songs: Song[];\n"));
    }

    #[test]
    fn test_render_namespace_mode() {
        let catalog = catalog();
        let config = Config::default().with_namespace(Some("Schema".into()));

        let rendered = render(&config, &catalog, "SongSerializer");
        let expected = "\
// Generated by sertypes. Do not edit this file by hand.

declare namespace Schema {
  interface Song {
    id: number;
    title: string;
    composer: Schema.Composer;
    album?: Schema.Nested.Album;
  }
}
";
        assert_eq!(rendered.content, expected);

        let rendered = render(&config, &catalog, "Nested::AlbumSerializer");
        assert!(rendered.content.contains("declare namespace Schema.Nested {\n  interface Album {\n"));
        assert!(!rendered.content.contains("import"));
    }

    #[test]
    fn test_synonym_renders_like_canonical() {
        let catalog = Catalog::new(vec![
            SerializerDescriptor::new("A")
                .with_flag("export")
                .with_field(Field::scalar("plain", "text"))
                .with_field(Field::scalar("insensitive", "citext")),
        ]);
        let rendered = render(&Config::default(), &catalog, "A");
        assert!(rendered.content.contains("  plain: string;\n  insensitive: string;\n"));
    }

    #[test]
    fn test_has_one_and_has_many_shapes() {
        let catalog = catalog();
        let rendered = render(&Config::default(), &catalog, "ComposerSerializer");
        assert!(rendered.content.contains("  songs: Song[];\n"));
        let rendered = render(&Config::default(), &catalog, "SongSerializer");
        assert!(rendered.content.contains("  composer: Composer;\n"));
    }

    #[test]
    fn test_unknown_type_is_diagnostic() {
        let catalog = Catalog::new(vec![
            SerializerDescriptor::new("DocumentSerializer")
                .with_flag("export")
                .with_field(Field::scalar("search", "tsvector"))
                .with_field(Field::inline("meta", vec![Field::scalar("point", "geometry")])),
        ]);
        let rendered = render(&Config::default(), &catalog, "DocumentSerializer");
        assert!(rendered.content.contains("  search: unknown;\n"));
        assert!(rendered.content.contains("  meta: { point: unknown };\n"));
        assert_eq!(rendered.diagnostics.len(), 2);
        assert_eq!(rendered.diagnostics[0].field, "search");
        assert_eq!(rendered.diagnostics[1].field, "meta.point");
        assert_eq!(
            rendered.diagnostics[1].kind,
            DiagnosticKind::UnknownType {
                source_type: "geometry".into()
            }
        );
    }

    #[test]
    fn test_inline_struct_keeps_declaration_order() {
        let catalog = Catalog::new(vec![
            SerializerDescriptor::new("VideoSerializer")
                .with_flag("export")
                .with_field(Field::scalar("zeta", "string"))
                .with_field(Field::inline(
                    "stats",
                    vec![Field::scalar("views", "integer"), Field::scalar("likes", "integer").optional()],
                ))
                .with_field(Field::scalar("alpha", "boolean")),
        ]);
        let rendered = render(&Config::default(), &catalog, "VideoSerializer");
        assert!(rendered.content.contains(
            "  zeta: string;\n  stats: { views: number; likes?: number };\n  alpha: boolean;\n"
        ));
    }

    #[test]
    fn test_non_exported_target_is_inlined() {
        let catalog = Catalog::new(vec![
            SerializerDescriptor::new("ModelSerializer")
                .with_field(Field::scalar("id", "integer"))
                .with_field(Field::has_one("parent", "ModelSerializer")),
            SerializerDescriptor::new("SongSerializer")
                .with_flag("export")
                .with_field(Field::has_many("models", "ModelSerializer")),
        ]);
        let rendered = render(&Config::default(), &catalog, "SongSerializer");
        assert!(rendered.content.contains("  models: { id: number; parent: unknown }[];\n"));
        assert!(!rendered.content.contains("import"));
        assert_eq!(
            rendered.diagnostics[0].kind,
            DiagnosticKind::RecursiveInline {
                target: "ModelSerializer".into()
            }
        );
    }

    #[test]
    fn test_dangling_association_errors() {
        let catalog = Catalog::new(vec![
            SerializerDescriptor::new("SongSerializer")
                .with_flag("export")
                .with_field(Field::has_one("label", "LabelSerializer")),
        ]);
        let config = Config::default();
        let type_map = config.type_map();
        let renderer = Renderer::new(&config, &type_map, &catalog);
        let err = renderer
            .render(catalog.get("SongSerializer").unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::DanglingAssociation { ref serializer, ref field, ref missing }
                if serializer == "SongSerializer" && field == "label" && missing == "LabelSerializer"
        ));
    }

    #[test]
    fn test_modifiers_and_camel_keys() {
        let catalog = Catalog::new(vec![
            SerializerDescriptor::new("ComposerSerializer")
                .with_flag("export")
                .with_field(Field::scalar("first_name", "string").nullable())
                .with_field(Field::scalar("born_at", "datetime").with_ts_type("Date"))
                .with_field(Field::scalar("song_ids", "integer").optional())
                .with_field(Field::has_many("songs", "ComposerSerializer").nullable()),
        ]);
        let config = Config::default().with_transform_keys(KeyCase::Camel);
        let rendered = render(&config, &catalog, "ComposerSerializer");
        assert!(rendered.content.contains("  firstName: string | null;\n"));
        assert!(rendered.content.contains("  bornAt: Date;\n"));
        assert!(rendered.content.contains("  songIds?: number;\n"));
        // self reference needs no import
        assert!(rendered.content.contains("  songs: Composer[] | null;\n"));
        assert!(!rendered.content.contains("import"));
    }

    #[test]
    fn test_type_override_flows_through() {
        let catalog = Catalog::new(vec![
            SerializerDescriptor::new("A")
                .with_flag("export")
                .with_field(Field::scalar("at", "datetime"))
                .with_field(Field::scalar("data", "jsonb")),
        ]);
        let config = Config::default().with_type_override("datetime", "Date");
        let rendered = render(&config, &catalog, "A");
        assert!(rendered.content.contains("  at: Date;\n"));
        assert!(rendered.content.contains("  data: Record<string, unknown>;\n"));
    }

    #[test]
    fn test_relative_module() {
        let song = TypeName::from_serializer("SongSerializer");
        let album = TypeName::from_serializer("Nested::AlbumSerializer");
        let deep = TypeName::from_serializer("Nested::Deep::TrackSerializer");
        let other = TypeName::from_serializer("Other::ThingSerializer");

        assert_eq!(relative_module(&song, &album), "./Nested/Album");
        assert_eq!(relative_module(&album, &song), "../Song");
        assert_eq!(relative_module(&album, &deep), "./Deep/Track");
        assert_eq!(relative_module(&deep, &album), "../Album");
        assert_eq!(relative_module(&album, &other), "../Other/Thing");
    }
}
