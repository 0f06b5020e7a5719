#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Canonicalize `path` and require an existing, writable directory.
pub fn resolve_target(path: &Path) -> Result<PathBuf, AppError> {
    let resolved = path.canonicalize().map_err(|err| {
        AppError::configuration(format!(
            "target directory {} does not exist: {}",
            path.display(),
            err
        ))
        .with_code("DW-TARGET-001")
    })?;

    if !resolved.is_dir() {
        return Err(AppError::configuration(format!(
            "target {} is not a directory",
            resolved.display()
        ))
        .with_code("DW-TARGET-002"));
    }

    let readonly = fs::metadata(&resolved)
        .map(|meta| meta.permissions().readonly())
        .unwrap_or(true);
    let probe = tempfile::Builder::new()
        .prefix(".docweave-probe")
        .tempfile_in(&resolved);
    if readonly || probe.is_err() {
        return Err(AppError::configuration(format!(
            "target directory {} is not writable",
            resolved.display()
        ))
        .with_code("DW-TARGET-003"));
    }

    Ok(resolved)
}

/// Canonicalize `path` and require an existing, readable regular file.
pub fn resolve_source(path: &Path) -> Result<PathBuf, AppError> {
    let resolved = path.canonicalize().map_err(|err| {
        AppError::configuration(format!(
            "structure document {} does not exist: {}",
            path.display(),
            err
        ))
        .with_code("DW-SOURCE-001")
    })?;

    if !resolved.is_file() {
        return Err(AppError::configuration(format!(
            "structure document {} is not a regular file",
            resolved.display()
        ))
        .with_code("DW-SOURCE-002"));
    }

    File::open(&resolved).map_err(|err| {
        AppError::configuration(format!(
            "structure document {} is not readable: {}",
            resolved.display(),
            err
        ))
        .with_code("DW-SOURCE-003")
    })?;

    Ok(resolved)
}
