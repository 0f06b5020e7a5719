#![allow(clippy::result_large_err)]

use super::{DocweaveConfig, TemplateDefinition};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "docweave.toml";

/// Manifest file describing a template bundle directory.
pub const TEMPLATE_FILE_NAME: &str = "template.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from workspace root (workspace/docweave.toml)
    /// Environment variables override config file values
    /// Falls back to defaults when the file doesn't exist
    pub fn load_from_workspace(workspace_path: &Path) -> Result<DocweaveConfig, AppError> {
        let config_path = workspace_path.join(CONFIG_FILE_NAME);
        let config = Self::load_from_file(&config_path)?.unwrap_or_default();
        Self::finish(config, workspace_path)
    }

    /// Load an explicitly named config file, which must exist.
    pub fn load(path: &Path) -> Result<DocweaveConfig, AppError> {
        let config = Self::load_from_file(path)?.ok_or_else(|| {
            AppError::configuration(format!("config file {} does not exist", path.display()))
                .with_code("DW-CFG-001")
        })?;
        let base = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::finish(config, &base)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<DocweaveConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: DocweaveConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
            .with_code("DW-CFG-002")
        })?;

        Ok(Some(config))
    }

    fn finish(mut config: DocweaveConfig, base: &Path) -> Result<DocweaveConfig, AppError> {
        config.paths.resolve_relative_to(base);
        Self::apply_env_overrides(&mut config)?;
        Self::discover_templates(&mut config)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    /// Environment variables take precedence over config file values.
    /// Relative paths from the environment resolve against the current directory.
    fn apply_env_overrides(config: &mut DocweaveConfig) -> Result<(), AppError> {
        if let Ok(source) = env::var("DOCWEAVE_SOURCE") {
            if !source.trim().is_empty() {
                config.paths.source = Some(from_current_dir(PathBuf::from(source))?);
            }
        }

        if let Ok(target) = env::var("DOCWEAVE_TARGET") {
            if !target.trim().is_empty() {
                config.paths.target = Some(from_current_dir(PathBuf::from(target))?);
            }
        }

        if let Some(template_path) = env::var_os("DOCWEAVE_TEMPLATE_PATH") {
            for dir in env::split_paths(&template_path).filter(|p| !p.as_os_str().is_empty()) {
                config.paths.templates.push(from_current_dir(dir)?);
            }
        }
        Ok(())
    }

    /// Register every `<dir>/<name>/template.toml` bundle found in the template
    /// search directories. Templates declared in the config file win on name clashes.
    fn discover_templates(config: &mut DocweaveConfig) -> Result<(), AppError> {
        for dir in config.paths.templates.clone() {
            if !dir.is_dir() {
                return Err(AppError::configuration(format!(
                    "template directory {} does not exist or is not a directory",
                    dir.display()
                ))
                .with_code("DW-CFG-003"));
            }

            let mut bundles = fs::read_dir(&dir)?
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| path.join(TEMPLATE_FILE_NAME).is_file())
                .collect::<Vec<_>>();
            bundles.sort();

            for bundle in bundles {
                let Some(name) = bundle.file_name().and_then(|n| n.to_str()).map(str::to_string)
                else {
                    continue;
                };
                if config.templates.contains_key(&name) {
                    tracing::debug!(template = %name, "template bundle shadowed by config entry");
                    continue;
                }
                let definition = Self::load_template_bundle(&bundle)?;
                tracing::debug!(template = %name, path = %bundle.display(), "discovered template bundle");
                config.templates.insert(name, definition);
            }
        }
        Ok(())
    }

    fn load_template_bundle(bundle: &Path) -> Result<TemplateDefinition, AppError> {
        let manifest = bundle.join(TEMPLATE_FILE_NAME);
        let content = fs::read_to_string(&manifest).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read template {}: {}", manifest.display(), e),
            )
        })?;
        let mut definition: TemplateDefinition = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("Failed to parse template {}: {}", manifest.display(), e),
            )
            .with_code("DW-CFG-002")
        })?;
        definition.root = Some(bundle.to_path_buf());
        Ok(definition)
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "DOCWEAVE_SOURCE - Override the structure document path",
            "DOCWEAVE_TARGET - Override the output directory",
            "DOCWEAVE_TEMPLATE_PATH - Additional template search directories (path-list separated)",
        ]
    }

    /// Validate configuration values
    pub fn validate_config(config: &DocweaveConfig) -> Result<(), AppError> {
        if let Some(name) = config.templates.keys().find(|name| name.trim().is_empty()) {
            return Err(AppError::validation(format!(
                "Template names cannot be empty (got '{}')",
                name
            ))
            .with_code("DW-CFG-004"));
        }

        if config
            .paths
            .templates
            .iter()
            .any(|dir| dir.as_os_str().is_empty())
        {
            return Err(AppError::validation(
                "Template search directories cannot be empty".to_string(),
            )
            .with_code("DW-CFG-004"));
        }

        Ok(())
    }
}

fn from_current_dir(path: PathBuf) -> Result<PathBuf, AppError> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(env::current_dir()?.join(path))
}
