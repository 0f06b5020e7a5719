use super::{write_artifact, Writer, WriterContext};
use crate::core::document::StructureDocument;
use crate::core::error::AppError;
use crate::core::transformer::Transformation;

/// Dumps the enriched structure document as pretty-printed JSON at `artifact`.
pub struct StructureWriter;

impl Writer for StructureWriter {
    fn name(&self) -> &'static str {
        "Structure"
    }

    fn write(
        &self,
        document: &StructureDocument,
        transformation: &Transformation,
        ctx: &WriterContext<'_>,
    ) -> Result<(), AppError> {
        let destination = transformation.artifact_path(ctx.target)?;
        let json = document.to_json_pretty()?;
        write_artifact(&destination, json.as_bytes())
    }
}
