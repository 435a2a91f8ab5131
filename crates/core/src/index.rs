//! Barrel file re-exporting every generated declaration.

use std::path::PathBuf;

use crate::config::Config;
use crate::descriptor::TypeName;
use crate::driver::RenderedUnit;
use crate::render::HEADER;
use crate::ts::{Emit, TsModule, TsReExport};

/// Base name of the index file.
pub const INDEX_FILE_STEM: &str = "index";

#[derive(Debug, Clone, Copy)]
pub struct IndexEmitter<'a> {
    config: &'a Config,
}

impl<'a> IndexEmitter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(format!("{INDEX_FILE_STEM}.{}", self.config.extension()))
    }

    /// One re-export per unit, in the order given. `None` in namespace mode.
    pub fn emit(&self, units: &[RenderedUnit]) -> Option<RenderedUnit> {
        if self.config.namespace.is_some() {
            return None;
        }

        let re_exports = units
            .iter()
            .filter_map(|unit| unit.serializer.as_deref())
            .map(|serializer| {
                let name = TypeName::from_serializer(serializer);
                TsReExport {
                    names: vec![name.ident()],
                    from: format!("./{}", name.module_path()),
                }
            })
            .collect();

        let module = TsModule {
            header: vec![HEADER.to_string()],
            re_exports,
            ..TsModule::default()
        };

        Some(RenderedUnit {
            target_path: self.path(),
            content: module.emit(),
            serializer: None,
        })
    }
}
