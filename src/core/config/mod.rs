use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Main docweave configuration loaded from docweave.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocweaveConfig {
    /// Input document, output directory and template search paths
    #[serde(default)]
    pub paths: PathsConfig,

    /// Transformations applied on every run
    #[serde(default)]
    pub transformations: TransformationsSection,

    /// Template bundles keyed by name
    #[serde(default)]
    pub templates: IndexMap<String, TemplateDefinition>,
}

/// Paths configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    /// Structure document to transform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Directory receiving the rendered artifacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    /// Directories searched for `<name>/template.toml` bundles
    #[serde(default)]
    pub templates: Vec<PathBuf>,
}

impl PathsConfig {
    /// Anchor relative paths at `base` (normally the directory of the config file).
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(source) = self.source.as_mut() {
            anchor(source);
        }
        if let Some(target) = self.target.as_mut() {
            anchor(target);
        }
        self.templates.iter_mut().for_each(anchor);
    }
}

/// A configuration value that may be written as a single table or a list of tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// `[transformations]` section: ordered template references and raw transformations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransformationsSection {
    #[serde(default)]
    pub transformation: OneOrMany<Value>,
}

impl TransformationsSection {
    /// Entries in declaration order, classified by the presence of a `writer` field.
    pub fn entries(&self) -> Vec<TransformationEntry> {
        self.transformation
            .as_slice()
            .iter()
            .cloned()
            .map(TransformationEntry::classify)
            .collect()
    }
}

/// One entry of the `[transformations]` section.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformationEntry {
    /// Entry without a `writer`: names a template to load.
    Template { name: Option<String>, record: Value },
    /// Entry with a `writer`: a transformation record.
    Raw(Value),
}

impl TransformationEntry {
    pub fn classify(value: Value) -> Self {
        match value.as_object() {
            Some(record) if !record.contains_key("writer") => TransformationEntry::Template {
                name: record.get("name").and_then(Value::as_str).map(str::to_string),
                record: value,
            },
            _ => TransformationEntry::Raw(value),
        }
    }
}

/// Template bundle definition.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TemplateDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformations: Option<TemplateTransformations>,

    /// Directory the template was discovered in, when loaded from a bundle.
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

impl TemplateDefinition {
    /// Transformation records contributed by this template, in declaration order.
    pub fn transformation_records(&self) -> Vec<Value> {
        self.transformations
            .as_ref()
            .map(|section| section.transformation.as_slice().to_vec())
            .unwrap_or_default()
    }
}

/// `transformations.transformation` sub-tree of a template.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TemplateTransformations {
    #[serde(default)]
    pub transformation: OneOrMany<Value>,
}

pub mod loader;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME, TEMPLATE_FILE_NAME};
