use super::{writer_io_error, Writer, WriterContext};
use crate::core::document::StructureDocument;
use crate::core::error::AppError;
use crate::core::transformer::Transformation;
use crate::core::types::ErrorCategory;
use std::fs;
use std::path::Path;

/// Copies template assets (stylesheets, scripts, images) into the target.
///
/// Only the `copy` query is understood. `source` is a file or directory path,
/// resolved against the contributing template; `artifact` is the destination
/// below the target directory.
pub struct FileIoWriter;

impl Writer for FileIoWriter {
    fn name(&self) -> &'static str {
        "FileIo"
    }

    fn write(
        &self,
        _document: &StructureDocument,
        transformation: &Transformation,
        ctx: &WriterContext<'_>,
    ) -> Result<(), AppError> {
        if transformation.query != "copy" {
            return Err(AppError::new(
                ErrorCategory::WriterError,
                format!(
                    "FileIo writer does not support query '{}' (expected 'copy')",
                    transformation.query
                ),
            )
            .with_code("DW-WRT-003"));
        }

        let source = transformation.source_path();
        let destination = transformation.artifact_path(ctx.target)?;
        if source.is_dir() {
            copy_dir(&source, &destination)
        } else if source.is_file() {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)
                    .map_err(|err| writer_io_error("create directory", parent, err))?;
            }
            fs::copy(&source, &destination)
                .map(|_| ())
                .map_err(|err| writer_io_error("copy", &source, err))
        } else {
            Err(AppError::new(
                ErrorCategory::WriterError,
                format!("FileIo source {} does not exist", source.display()),
            )
            .with_code("DW-WRT-004"))
        }
    }
}

fn copy_dir(from: &Path, to: &Path) -> Result<(), AppError> {
    fs::create_dir_all(to).map_err(|err| writer_io_error("create directory", to, err))?;
    let entries = fs::read_dir(from).map_err(|err| writer_io_error("read directory", from, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| writer_io_error("read directory", from, err))?;
        let path = entry.path();
        let destination = to.join(entry.file_name());
        if path.is_dir() {
            copy_dir(&path, &destination)?;
        } else {
            fs::copy(&path, &destination).map_err(|err| writer_io_error("copy", &path, err))?;
        }
    }
    Ok(())
}
