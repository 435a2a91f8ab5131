//! Which serializers get their own file, and where.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::descriptor::SerializerDescriptor;
use crate::discovery::Catalog;
use crate::error::{GenerateError, Result};
use crate::index::IndexEmitter;

/// A serializer must opt in by declaring `flag` itself.
pub fn is_eligible(descriptor: &SerializerDescriptor, flag: &str) -> bool {
    descriptor.has_flag(flag)
}

/// One eligible serializer and its output path, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUnit<'c> {
    pub descriptor: &'c SerializerDescriptor,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct ExportPlanner<'a> {
    config: &'a Config,
    visited: HashSet<String>,
    /// output path -> serializer that claimed it
    paths: HashMap<PathBuf, String>,
    /// interface name -> serializer that claimed it, default mode only
    idents: HashMap<String, String>,
}

impl<'a> ExportPlanner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            visited: HashSet::new(),
            paths: HashMap::new(),
            idents: HashMap::new(),
        }
    }

    pub fn is_eligible(&self, descriptor: &SerializerDescriptor) -> bool {
        is_eligible(descriptor, &self.config.export_flag)
    }

    /// `Nested::AlbumSerializer` -> `Nested/Album.ts`, under the namespace
    /// directory when one is configured.
    pub fn path_for(&self, descriptor: &SerializerDescriptor) -> PathBuf {
        let file = descriptor.type_name().file_path(self.config.extension());
        match self.config.namespace_dir() {
            Some(dir) => dir.join(file),
            None => file,
        }
    }

    /// Record a visit. Returns false when `descriptor` was already planned.
    pub fn visit(&mut self, descriptor: &SerializerDescriptor) -> bool {
        self.visited.insert(descriptor.name.clone())
    }

    /// Eligible descriptors in discovery order, each exactly once.
    pub fn plan<'c>(&mut self, catalog: &'c Catalog) -> Result<Vec<PlannedUnit<'c>>> {
        let mut units = Vec::new();
        let index_path = self
            .config
            .namespace
            .is_none()
            .then(|| IndexEmitter::new(self.config).path());

        for descriptor in catalog.iter() {
            if !self.is_eligible(descriptor) {
                debug!(serializer = %descriptor.name, "Skipping serializer without export flag.");
                continue;
            }
            if !self.visit(descriptor) {
                continue;
            }

            let path = self.path_for(descriptor);
            if index_path.as_ref() == Some(&path) {
                return Err(GenerateError::ReservedPath {
                    path,
                    serializer: descriptor.name.clone(),
                });
            }
            if let Some(first) = self.paths.get(&path) {
                return Err(GenerateError::PathCollision {
                    path,
                    first: first.clone(),
                    second: descriptor.name.clone(),
                });
            }
            self.paths.insert(path.clone(), descriptor.name.clone());

            // Imports and index re-exports bind the bare ident.
            if index_path.is_some() {
                self.claim_ident(descriptor)?;
            }

            debug!(serializer = %descriptor.name, path = %path.display(), "Planned output file.");
            units.push(PlannedUnit { descriptor, path });
        }

        Ok(units)
    }

    fn claim_ident(&mut self, descriptor: &SerializerDescriptor) -> Result<()> {
        let name = descriptor.type_name().ident();
        if let Some(first) = self.idents.get(&name) {
            return Err(GenerateError::NameCollision {
                name,
                first: first.clone(),
                second: descriptor.name.clone(),
            });
        }
        self.idents.insert(name, descriptor.name.clone());
        Ok(())
    }
}
