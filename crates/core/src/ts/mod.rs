//! TypeScript IR and emission.
//!
//! Rendering builds IR values; emission turns them into text.
//!
//! - `types`: TypeScript IR (TsType, TsTypeDef, TsNamespace, TsModule)
//! - `emit`: IR -> code strings (via Emit trait)
//! - `utils`: identifier and key helpers

mod emit;
mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{
    TsImport, TsModule, TsNamespace, TsPrimitive, TsProp, TsReExport, TsType, TsTypeDef,
    TypeDefKind,
};
