#![allow(clippy::result_large_err)] // Executor returns the writer's AppError untouched so callers see the original failure.

use super::transformation::Transformation;
use crate::core::document::StructureDocument;
use crate::core::error::AppError;
use crate::core::writer::{WriterContext, WriterRegistry};
use std::path::Path;
use std::time::Instant;

/// Trace entry recorded before a transformation's writer is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub position: usize,
    pub query: String,
    pub writer: String,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub trace: Vec<TraceEntry>,
    pub duration_ms: u64,
}

/// Runs transformations sequentially, in catalog order, against one document.
///
/// There is no isolation between transformations and no recovery: the first
/// error aborts the run and is returned as produced by the writer.
pub struct Executor<'a> {
    registry: &'a WriterRegistry,
}

impl<'a> Executor<'a> {
    pub fn new(registry: &'a WriterRegistry) -> Self {
        Self { registry }
    }

    pub fn run(
        &self,
        transformations: &[Transformation],
        document: &StructureDocument,
        target: &Path,
    ) -> Result<ExecutionReport, AppError> {
        let started = Instant::now();
        let mut report = ExecutionReport::default();

        for (position, transformation) in transformations.iter().enumerate() {
            let entry = TraceEntry {
                position,
                query: transformation.query.clone(),
                writer: transformation.writer.clone(),
            };
            tracing::info!(
                position,
                query = %entry.query,
                writer = %entry.writer,
                artifact = %transformation.artifact,
                "applying transformation"
            );
            report.trace.push(entry);

            let writer = self.registry.get(&transformation.writer).ok_or_else(|| {
                AppError::configuration(format!(
                    "unknown writer '{}' (registered: {})",
                    transformation.writer,
                    self.registry.names().join(", ")
                ))
                .with_code("DW-WRT-001")
                .with_context("writer", transformation.writer.as_str())
            })?;
            let ctx = WriterContext { target, position };
            writer.write(document, transformation, &ctx)?;
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            transformations = report.trace.len(),
            duration_ms = report.duration_ms,
            "transformation run completed"
        );
        Ok(report)
    }
}
