//! TypeScript IR types for declaration generation.
//!
//! This module defines the subset of the TypeScript type system the
//! generator emits:
//! - TsType: Types (primitives, arrays, unions, objects, references)
//! - TsTypeDef: Named interface declarations
//! - TsModule / TsNamespace: File-level structure

/// A type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, unknown
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Named type reference or a raw type expression from the type map
    Ref(String),
}

impl TsType {
    pub fn array(inner: TsType) -> Self {
        TsType::Array(Box::new(inner))
    }

    /// `T | null`
    pub fn nullable(inner: TsType) -> Self {
        match inner {
            TsType::Union(mut types) => {
                types.push(TsType::Primitive(TsPrimitive::Null));
                TsType::Union(types)
            }
            other => TsType::Union(vec![other, TsType::Primitive(TsPrimitive::Null)]),
        }
    }

    /// Whether the type needs parentheses when wrapped as an array element.
    pub(crate) fn is_compound(&self) -> bool {
        match self {
            TsType::Union(_) => true,
            // Raw map entries such as `string | number` behave like unions.
            TsType::Ref(raw) => raw.contains(['|', '&', ' ']) && !raw.ends_with('>'),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
}

/// Interface member or object literal property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

// =============================================================================
// Module-Level IR
// =============================================================================

/// `import type { A, B } from "<from>";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    pub names: Vec<String>,
    /// Relative module specifier without extension
    pub from: String,
}

/// `export type { A } from "<from>";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsReExport {
    pub names: Vec<String>,
    pub from: String,
}

/// Declaration body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefKind {
    /// `interface Foo { ... }`
    Interface { properties: Vec<TsProp> },
}

/// Named declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsTypeDef {
    pub name: String,
    pub kind: TypeDefKind,
    pub is_export: bool,
}

/// Ambient namespace block: `declare namespace A.B { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsNamespace {
    pub path: Vec<String>,
    pub types: Vec<TsTypeDef>,
}

/// Complete TypeScript file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsModule {
    /// Leading `//` comment lines
    pub header: Vec<String>,
    pub imports: Vec<TsImport>,
    pub types: Vec<TsTypeDef>,
    pub namespaces: Vec<TsNamespace>,
    pub re_exports: Vec<TsReExport>,
}
