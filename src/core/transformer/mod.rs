#![allow(clippy::result_large_err)] // Transformer surface returns AppError for structured diagnostics.

//! Transformation pipeline.
//!
//! A [`Transformer`] owns one run: the enriched structure document, the
//! validated target directory, the catalog of transformations and the writer
//! registry. The lifecycle is `set_source` → `set_target` → catalog calls →
//! `execute`.

use crate::core::config::DocweaveConfig;
use crate::core::document::{MetadataEnricher, StructureDocument};
use crate::core::error::AppError;
use crate::core::writer::WriterRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod catalog;
mod executor;
mod paths;
mod transformation;

pub use crate::core::document::generate_filename;
pub use catalog::TransformationCatalog;
pub use executor::{ExecutionReport, Executor, TraceEntry};
pub use paths::{resolve_source, resolve_target};
pub use transformation::{Transformation, TransformationSpec, MANDATORY_FIELDS};

pub struct Transformer {
    catalog: TransformationCatalog,
    registry: WriterRegistry,
    enricher: MetadataEnricher,
    document: Option<StructureDocument>,
    source: Option<PathBuf>,
    target: Option<PathBuf>,
}

impl Transformer {
    pub fn new(config: DocweaveConfig, registry: WriterRegistry) -> Self {
        Self::with_shared_config(Arc::new(config), registry)
    }

    pub fn with_shared_config(config: Arc<DocweaveConfig>, registry: WriterRegistry) -> Self {
        Self {
            catalog: TransformationCatalog::new(config),
            registry,
            enricher: MetadataEnricher::new(),
            document: None,
            source: None,
            target: None,
        }
    }

    /// Validate the structure document path, parse it and enrich it. Only the
    /// enriched document is kept.
    pub fn set_source(&mut self, path: &Path) -> Result<(), AppError> {
        let resolved = resolve_source(path)?;
        let mut document = StructureDocument::from_path(&resolved)?;
        let stats = self.enricher.enrich(&mut document);
        tracing::info!(
            source = %resolved.display(),
            files = stats.files,
            links = stats.links,
            "structure document loaded"
        );
        self.document = Some(document);
        self.source = Some(resolved);
        Ok(())
    }

    /// Validate the output directory.
    pub fn set_target(&mut self, path: &Path) -> Result<(), AppError> {
        let resolved = resolve_target(path)?;
        tracing::debug!(target = %resolved.display(), "target directory set");
        self.target = Some(resolved);
        Ok(())
    }

    pub fn set_templates<I, S>(&mut self, names: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.catalog.set_templates(names)
    }

    pub fn add_template(&mut self, name: &str) -> Result<(), AppError> {
        self.catalog.add_template(name)
    }

    pub fn add_transformation(
        &mut self,
        spec: impl Into<TransformationSpec>,
    ) -> Result<&Transformation, AppError> {
        self.catalog.add_transformation(spec)
    }

    pub fn load_transformations<I, S>(
        &mut self,
        templates: I,
        transformations: Vec<TransformationSpec>,
    ) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.catalog.load_transformations(templates, transformations)
    }

    /// Run every cataloged transformation once, in order.
    pub fn execute(&self) -> Result<ExecutionReport, AppError> {
        let document = self.document.as_ref().ok_or_else(|| {
            AppError::configuration("no structure document loaded; call set_source first")
                .with_code("DW-EXEC-001")
        })?;
        let target = self.target.as_deref().ok_or_else(|| {
            AppError::configuration("no target directory set; call set_target first")
                .with_code("DW-EXEC-002")
        })?;
        Executor::new(&self.registry).run(self.catalog.transformations(), document, target)
    }

    pub fn catalog(&self) -> &TransformationCatalog {
        &self.catalog
    }

    pub fn document(&self) -> Option<&StructureDocument> {
        self.document.as_ref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    pub fn registry(&self) -> &WriterRegistry {
        &self.registry
    }
}
