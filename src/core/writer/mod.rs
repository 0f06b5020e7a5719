#![allow(clippy::result_large_err)] // Writer trait and registry return AppError directly for structured diagnostics without boxing.

use crate::core::document::StructureDocument;
use crate::core::error::AppError;
use crate::core::transformer::Transformation;
use crate::core::types::ErrorCategory;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

mod file_io;
mod page;
mod structure;

pub use file_io::FileIoWriter;
pub use page::PageWriter;
pub use structure::StructureWriter;

/// Context provided to each writer invocation.
#[derive(Clone, Copy, Debug)]
pub struct WriterContext<'a> {
    /// Validated, writable output directory.
    pub target: &'a Path,
    /// Zero-based position of the transformation in the catalog.
    pub position: usize,
}

/// Rendering strategy bound to transformations by name.
///
/// Writers receive the whole enriched document and apply the transformation's
/// own `source`/`query` selectors. They must not mutate the document.
pub trait Writer: Send + Sync + 'static {
    /// Writer name used in transformation definitions.
    fn name(&self) -> &'static str;

    /// Produce the artifact described by `transformation` below `ctx.target`.
    fn write(
        &self,
        document: &StructureDocument,
        transformation: &Transformation,
        ctx: &WriterContext<'_>,
    ) -> Result<(), AppError>;
}

/// Builder used to register writers before execution.
pub struct WriterRegistryBuilder {
    writers: BTreeMap<String, Arc<dyn Writer>>,
}

impl Default for WriterRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterRegistryBuilder {
    pub fn new() -> Self {
        Self {
            writers: BTreeMap::new(),
        }
    }

    pub fn register<T: Writer>(&mut self, writer: T) -> &mut Self {
        let name = writer.name();
        if self.writers.contains_key(name) {
            panic!("duplicate writer registered: {}", name);
        }
        self.writers.insert(name.to_string(), Arc::new(writer));
        self
    }

    /// Register the built-in writers.
    pub fn with_defaults(&mut self) -> &mut Self {
        self.register(FileIoWriter)
            .register(StructureWriter)
            .register(PageWriter)
    }

    pub fn build(self) -> WriterRegistry {
        WriterRegistry {
            inner: Arc::new(self.writers),
        }
    }
}

/// Immutable registry available during execution.
#[derive(Clone)]
pub struct WriterRegistry {
    inner: Arc<BTreeMap<String, Arc<dyn Writer>>>,
}

impl Default for WriterRegistry {
    fn default() -> Self {
        let mut builder = WriterRegistryBuilder::new();
        builder.with_defaults();
        builder.build()
    }
}

impl std::fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("writers", &self.names())
            .finish()
    }
}

impl WriterRegistry {
    pub fn builder() -> WriterRegistryBuilder {
        WriterRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Writer>> {
        self.inner.get(name).cloned()
    }

    /// Registered writer names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.inner.keys().map(String::as_str).collect()
    }
}

/// Create the parent directories of `path` and write `contents` to it.
pub(crate) fn write_artifact(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| writer_io_error("create directory", parent, err))?;
    }
    fs::write(path, contents).map_err(|err| writer_io_error("write artifact", path, err))
}

pub(crate) fn writer_io_error(action: &str, path: &Path, err: std::io::Error) -> AppError {
    AppError::with_source(
        ErrorCategory::WriterError,
        format!("failed to {} {}: {}", action, path.display(), err),
        Box::new(err),
    )
    .with_code("DW-WRT-002")
}
