#![allow(clippy::result_large_err)]

use super::transformation::{Transformation, TransformationSpec};
use crate::core::config::{DocweaveConfig, TransformationEntry};
use crate::core::error::AppError;
use std::sync::Arc;

/// Ordered set of transformations for one run, plus the templates that
/// contributed them.
#[derive(Debug, Clone)]
pub struct TransformationCatalog {
    config: Arc<DocweaveConfig>,
    templates: Vec<String>,
    transformations: Vec<Transformation>,
}

impl TransformationCatalog {
    pub fn new(config: Arc<DocweaveConfig>) -> Self {
        Self {
            config,
            templates: Vec::new(),
            transformations: Vec::new(),
        }
    }

    pub fn config(&self) -> &DocweaveConfig {
        &self.config
    }

    /// Names of the loaded templates, in load order.
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Transformations in the order they will execute.
    pub fn transformations(&self) -> &[Transformation] {
        &self.transformations
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    /// Drop every loaded template and transformation, then load `names` in order.
    pub fn set_templates<I, S>(&mut self, names: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.templates.clear();
        self.transformations.clear();
        for name in names {
            self.add_template(name.as_ref())?;
        }
        Ok(())
    }

    /// Load a template from the configuration. Loading a known template again
    /// does nothing. Every record is validated before the catalog changes.
    pub fn add_template(&mut self, name: &str) -> Result<(), AppError> {
        if self.templates.iter().any(|loaded| loaded == name) {
            tracing::debug!(template = %name, "template already loaded");
            return Ok(());
        }

        let config = Arc::clone(&self.config);
        let definition = config.templates.get(name).ok_or_else(|| {
            AppError::configuration(format!("template '{}' is not defined", name))
                .with_code("DW-TPL-001")
                .with_context("template", name)
        })?;

        let records = definition.transformation_records();
        let mut resolved = Vec::with_capacity(records.len());
        for record in records {
            let mut transformation = TransformationSpec::Record(record)
                .resolve()
                .map_err(|err| err.with_context("template", name))?;
            if transformation.template_root.is_none() {
                transformation.template_root = definition.root.clone();
            }
            resolved.push(transformation);
        }

        tracing::debug!(
            template = %name,
            transformations = resolved.len(),
            "loading template"
        );
        self.templates.push(name.to_string());
        for transformation in resolved {
            self.append(transformation);
        }
        Ok(())
    }

    /// Validate `spec` and append the resulting transformation.
    pub fn add_transformation(
        &mut self,
        spec: impl Into<TransformationSpec>,
    ) -> Result<&Transformation, AppError> {
        let transformation = spec.into().resolve()?;
        Ok(self.append(transformation))
    }

    fn append(&mut self, transformation: Transformation) -> &Transformation {
        tracing::debug!(
            query = %transformation.query,
            writer = %transformation.writer,
            artifact = %transformation.artifact,
            "transformation added"
        );
        self.transformations.push(transformation);
        let index = self.transformations.len() - 1;
        &self.transformations[index]
    }

    /// Seed from the configuration's `[transformations]` section, then append
    /// the explicit `templates` and `transformations`.
    pub fn load_transformations<I, S>(
        &mut self,
        templates: I,
        transformations: Vec<TransformationSpec>,
    ) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in self.config.transformations.entries() {
            match entry {
                TransformationEntry::Template {
                    name: Some(name), ..
                } => self.add_template(&name)?,
                TransformationEntry::Template { name: None, record } => {
                    return Err(AppError::validation(format!(
                        "template reference requires a 'name' field: {}",
                        record
                    ))
                    .with_code("DW-TPL-002"));
                }
                TransformationEntry::Raw(record) => {
                    self.add_transformation(record)?;
                }
            }
        }

        for name in templates {
            self.add_template(name.as_ref())?;
        }
        for spec in transformations {
            self.add_transformation(spec)?;
        }
        Ok(())
    }
}
