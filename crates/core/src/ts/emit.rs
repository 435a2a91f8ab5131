//! Text emission for the TypeScript IR.
//!
//! Output is a pure function of the IR. Nothing here iterates a hash map, so
//! emitting the same module twice yields identical bytes.

use std::fmt::Write as _;

use super::types::{
    TsImport, TsModule, TsNamespace, TsPrimitive, TsProp, TsReExport, TsType, TsTypeDef,
    TypeDefKind,
};
use super::utils::quote_if_needed;

/// IR node that renders to TypeScript source text.
pub trait Emit {
    fn emit(&self) -> String;
}

fn join<T: Emit>(items: &[T], separator: &str) -> String {
    items.iter().map(Emit::emit).collect::<Vec<_>>().join(separator)
}

// =============================================================================
// Types
// =============================================================================

impl TsPrimitive {
    pub fn keyword(self) -> &'static str {
        match self {
            TsPrimitive::String => "string",
            TsPrimitive::Number => "number",
            TsPrimitive::Boolean => "boolean",
            TsPrimitive::Null => "null",
            TsPrimitive::Unknown => "unknown",
        }
    }
}

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        self.keyword().to_string()
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(primitive) => primitive.emit(),
            TsType::Array(element) if element.is_compound() => format!("({})[]", element.emit()),
            TsType::Array(element) => format!("{}[]", element.emit()),
            TsType::Union(members) => join(members, " | "),
            TsType::Object(props) if props.is_empty() => "{}".to_string(),
            TsType::Object(props) => format!("{{ {} }}", join(props, "; ")),
            TsType::Ref(expr) => expr.clone(),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let marker = if self.optional { "?" } else { "" };
        format!("{}{marker}: {}", quote_if_needed(&self.name), self.ty.emit())
    }
}

// =============================================================================
// Declarations
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl TsTypeDef {
    /// Two spaces per `depth` level.
    pub fn emit_indented(&self, depth: usize) -> String {
        let indent = "  ".repeat(depth);
        let export = if self.is_export { "export " } else { "" };

        let TypeDefKind::Interface { properties } = &self.kind;
        let mut output = format!("{indent}{export}interface {} {{\n", self.name);
        for prop in properties {
            let _ = writeln!(output, "{indent}  {};", prop.emit());
        }
        let _ = writeln!(output, "{indent}}}");
        output
    }
}

impl Emit for TsNamespace {
    fn emit(&self) -> String {
        let mut output = format!("declare namespace {} {{\n", self.path.join("."));
        for (i, type_def) in self.types.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&type_def.emit_indented(1));
        }
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        format!("import type {{ {} }} from \"{}\";\n", self.names.join(", "), self.from)
    }
}

impl Emit for TsReExport {
    fn emit(&self) -> String {
        format!("export type {{ {} }} from \"{}\";\n", self.names.join(", "), self.from)
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        let mut sections: Vec<String> = Vec::new();

        if !self.header.is_empty() {
            sections.push(
                self.header
                    .iter()
                    .map(|line| format!("// {line}\n"))
                    .collect(),
            );
        }

        if !self.imports.is_empty() {
            sections.push(self.imports.iter().map(Emit::emit).collect());
        }

        for type_def in &self.types {
            sections.push(type_def.emit());
        }

        for namespace in &self.namespaces {
            sections.push(namespace.emit());
        }

        if !self.re_exports.is_empty() {
            sections.push(self.re_exports.iter().map(Emit::emit).collect());
        }

        // Sections are separated by one blank line; the file ends with one newline.
        sections.join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================
