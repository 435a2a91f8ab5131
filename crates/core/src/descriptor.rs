//! Read-only view of a serializer's exposed fields.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Separator between namespace segments in serializer names.
pub const NAME_SEPARATOR: &str = "::";

/// Suffix removed when deriving type names and paths.
pub const SERIALIZER_SUFFIX: &str = "Serializer";

/// One serializer definition with inheritance already resolved.
///
/// Two descriptors with the same `name` are the same entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerDescriptor {
    /// Fully-qualified name, e.g. `Nested::AlbumSerializer`.
    pub name: String,
    /// Declaration order, inherited fields first.
    pub fields: Vec<Field>,
    /// Option flags declared as `true` on this serializer itself.
    pub flags: BTreeSet<String>,
}

impl SerializerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            flags: BTreeSet::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn type_name(&self) -> TypeName {
        TypeName::from_serializer(&self.name)
    }
}

/// What a field exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain value with a source primitive type, e.g. `text`.
    Scalar { source_type: String },
    HasOne { serializer: String },
    HasMany { serializer: String },
    /// Anonymous nested object, rendered inline.
    InlineStruct { fields: Vec<Field> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    /// Rendered as `name?: T`.
    pub optional: bool,
    /// Rendered as `T | null`.
    pub nullable: bool,
    /// Verbatim TypeScript type, bypasses the type map for scalars.
    pub ts_type: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            nullable: false,
            ts_type: None,
        }
    }

    pub fn scalar(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Scalar {
                source_type: source_type.into(),
            },
        )
    }

    pub fn has_one(name: impl Into<String>, serializer: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::HasOne {
                serializer: serializer.into(),
            },
        )
    }

    pub fn has_many(name: impl Into<String>, serializer: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::HasMany {
                serializer: serializer.into(),
            },
        )
    }

    pub fn inline(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(name, FieldKind::InlineStruct { fields })
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_ts_type(mut self, ts_type: impl Into<String>) -> Self {
        self.ts_type = Some(ts_type.into());
        self
    }

    /// Referenced serializer name for associations.
    pub fn association(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::HasOne { serializer } | FieldKind::HasMany { serializer } => {
                Some(serializer.as_str())
            }
            FieldKind::Scalar { .. } | FieldKind::InlineStruct { .. } => None,
        }
    }
}

/// Target-language name derived from a serializer name.
///
/// `Nested::AlbumSerializer` has segments `["Nested", "Album"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName {
    segments: Vec<String>,
}

impl TypeName {
    pub fn from_serializer(name: &str) -> Self {
        let mut segments: Vec<String> = name
            .split(NAME_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(last) = segments.last_mut() {
            if let Some(stripped) = last.strip_suffix(SERIALIZER_SUFFIX) {
                if !stripped.is_empty() {
                    *last = stripped.to_string();
                }
            }
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, e.g. `Album`.
    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Single identifier usable as an import binding, e.g. `NestedAlbum`.
    pub fn ident(&self) -> String {
        self.segments.concat()
    }

    /// Property-access form, e.g. `Nested.Album`.
    pub fn qualified(&self) -> String {
        self.segments.join(".")
    }

    /// Module path without extension, e.g. `Nested/Album`.
    pub fn module_path(&self) -> String {
        self.segments.join("/")
    }

    /// Relative file path with `extension`, e.g. `Nested/Album.ts`.
    pub fn file_path(&self, extension: &str) -> PathBuf {
        PathBuf::from(format!("{}.{extension}", self.module_path()))
    }

    /// Segments before the last one.
    pub fn parents(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, parents)) => parents,
            None => &[],
        }
    }
}
