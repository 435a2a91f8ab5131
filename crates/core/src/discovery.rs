//! Serializer discovery.
//!
//! The host application supplies serializer definitions through a
//! [`Discover`] implementation. Two are provided:
//! - [`StaticDiscovery`]: an in-memory list of descriptors
//! - [`Manifest`]: definitions loaded from a JSON, YAML or TOML file
//!
//! Inheritance is resolved here, so descriptors handed to the renderer
//! already carry their full field list.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::descriptor::{Field, FieldKind, SerializerDescriptor};
use crate::error::DiscoveryError;

/// Source of serializer descriptors.
pub trait Discover {
    /// Every known serializer, in a stable order.
    fn discover_all(&self) -> Result<Vec<SerializerDescriptor>, DiscoveryError>;
}

/// Descriptors supplied directly by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    descriptors: Vec<SerializerDescriptor>,
}

impl StaticDiscovery {
    pub fn new(descriptors: Vec<SerializerDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl Discover for StaticDiscovery {
    fn discover_all(&self) -> Result<Vec<SerializerDescriptor>, DiscoveryError> {
        Ok(self.descriptors.clone())
    }
}

// =============================================================================
// Manifest
// =============================================================================

/// Serializer definitions as written by the host application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub serializers: Vec<SerializerDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializerDefinition {
    pub name: String,
    /// Parent serializer whose fields are inherited.
    #[serde(default)]
    pub extends: Option<String>,
    /// Declared options such as `export = true`.
    #[serde(default)]
    pub options: BTreeMap<String, bool>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// A declared field. Exactly one of `type`, `has_one`, `has_many` or
/// `fields` must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default, rename = "type")]
    pub source_type: Option<String>,
    #[serde(default)]
    pub has_one: Option<String>,
    #[serde(default)]
    pub has_many: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldDefinition>>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub ts_type: Option<String>,
}

impl FieldDefinition {
    fn to_field(&self, serializer: &str) -> Result<Field, DiscoveryError> {
        let kind = match (
            &self.source_type,
            &self.has_one,
            &self.has_many,
            &self.fields,
        ) {
            (Some(source_type), None, None, None) => FieldKind::Scalar {
                source_type: source_type.clone(),
            },
            (None, Some(target), None, None) => FieldKind::HasOne {
                serializer: target.clone(),
            },
            (None, None, Some(target), None) => FieldKind::HasMany {
                serializer: target.clone(),
            },
            (None, None, None, Some(fields)) => FieldKind::InlineStruct {
                fields: fields
                    .iter()
                    .map(|field| field.to_field(serializer))
                    .collect::<Result<_, _>>()?,
            },
            // A verbatim TypeScript type needs no source type.
            (None, None, None, None) if self.ts_type.is_some() => FieldKind::Scalar {
                source_type: String::new(),
            },
            _ => {
                return Err(DiscoveryError::AmbiguousField {
                    serializer: serializer.to_string(),
                    field: self.name.clone(),
                });
            }
        };

        Ok(Field {
            name: self.name.clone(),
            kind,
            optional: self.optional,
            nullable: self.nullable,
            ts_type: self.ts_type.clone(),
        })
    }
}

impl Manifest {
    /// Load a manifest, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, DiscoveryError> {
        let contents = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse_error = |message: String| DiscoveryError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let manifest: Self = match extension.as_deref() {
            Some("json") => serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
            }
            Some("toml") => toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
            _ => {
                return Err(DiscoveryError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        debug!(path = %path.display(), "Loaded serializer manifest.");
        Ok(manifest)
    }

    /// Resolve inheritance for every definition, keeping declaration order.
    pub fn resolve(&self) -> Result<Vec<SerializerDescriptor>, DiscoveryError> {
        // First definition of a name wins, matching `Catalog`.
        let mut by_name: HashMap<&str, &SerializerDefinition> = HashMap::new();
        for definition in &self.serializers {
            by_name.entry(definition.name.as_str()).or_insert(definition);
        }

        let mut resolved: HashMap<String, Vec<Field>> = HashMap::new();
        let mut descriptors = Vec::with_capacity(self.serializers.len());

        for definition in &self.serializers {
            let fields = resolve_fields(definition, &by_name, &mut resolved, &mut Vec::new())?;
            descriptors.push(SerializerDescriptor {
                name: definition.name.clone(),
                fields,
                flags: definition
                    .options
                    .iter()
                    .filter(|(_, enabled)| **enabled)
                    .map(|(flag, _)| flag.clone())
                    .collect(),
            });
        }

        Ok(descriptors)
    }
}

impl Discover for Manifest {
    fn discover_all(&self) -> Result<Vec<SerializerDescriptor>, DiscoveryError> {
        self.resolve()
    }
}

/// Parent fields first; a redeclared field replaces the inherited one in place.
fn resolve_fields(
    definition: &SerializerDefinition,
    by_name: &HashMap<&str, &SerializerDefinition>,
    resolved: &mut HashMap<String, Vec<Field>>,
    chain: &mut Vec<String>,
) -> Result<Vec<Field>, DiscoveryError> {
    if let Some(fields) = resolved.get(&definition.name) {
        return Ok(fields.clone());
    }

    if chain.contains(&definition.name) {
        let mut cycle = chain.clone();
        cycle.push(definition.name.clone());
        return Err(DiscoveryError::InheritanceCycle { chain: cycle });
    }
    chain.push(definition.name.clone());

    let mut fields = match &definition.extends {
        Some(parent_name) => {
            let parent = by_name.get(parent_name.as_str()).ok_or_else(|| {
                DiscoveryError::UnknownParent {
                    serializer: definition.name.clone(),
                    parent: parent_name.clone(),
                }
            })?;
            resolve_fields(parent, by_name, resolved, chain)?
        }
        None => Vec::new(),
    };

    for field_def in &definition.fields {
        let field = field_def.to_field(&definition.name)?;
        match fields.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
    }

    chain.pop();
    resolved.insert(definition.name.clone(), fields.clone());
    Ok(fields)
}

// =============================================================================
// Catalog
// =============================================================================

/// Discovered descriptors, deduplicated by name, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: Vec<SerializerDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Collapse duplicates; the first occurrence of a name wins.
    pub fn new(descriptors: Vec<SerializerDescriptor>) -> Self {
        let mut catalog = Self::default();

        for descriptor in descriptors {
            if catalog.index.contains_key(&descriptor.name) {
                warn!(serializer = %descriptor.name, "Duplicate serializer definition ignored.");
                continue;
            }
            catalog
                .index
                .insert(descriptor.name.clone(), catalog.descriptors.len());
            catalog.descriptors.push(descriptor);
        }

        catalog
    }

    pub fn discover(source: &dyn Discover) -> Result<Self, DiscoveryError> {
        let descriptors = source.discover_all()?;
        debug!(count = descriptors.len(), "Discovered serializers.");
        Ok(Self::new(descriptors))
    }

    pub fn get(&self, name: &str) -> Option<&SerializerDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SerializerDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
