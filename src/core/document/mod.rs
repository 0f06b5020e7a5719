//! Structure document model.
//!
//! The structure document is the element tree produced by the upstream
//! analyzer: a `project` root holding `file` elements, which in turn hold
//! `class`/`interface` elements and their docblocks. It is serialized as JSON
//! or YAML, one object per element:
//!
//! ```text
//! { "name": "file", "attributes": { "path": "src/Foo.php" }, "children": [...] }
//! ```

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

mod enricher;
mod filename;

pub use enricher::{ClassPathIndex, EnrichmentStats, MetadataEnricher, EXCERPT_LENGTH};
pub use filename::generate_filename;

/// Failures raised while reading a structure document from disk.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read structure document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON structure document {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid YAML structure document {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        let message = err.to_string();
        AppError::with_source(ErrorCategory::SerializationError, message, Box::new(err))
            .with_code("DW-DOC-001")
    }
}

/// Single element of the structure document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Insert or replace an attribute. Existing attributes keep their position.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Concatenated text of this element and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Descendants named `name`, in document order, excluding `self`.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Node> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_named(name, &mut found);
        }
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Node>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect_named(name, found);
        }
    }
}

/// Parsed structure document. Exactly one exists per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureDocument {
    root: Node,
}

impl StructureDocument {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Read a document from disk, choosing the format from the file extension.
    /// Anything other than `.yaml`/`.yml` is read as JSON.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            serde_yaml::from_str(&content).map_err(|source| DocumentError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&content).map_err(|source| DocumentError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(|err| {
            AppError::with_source(
                ErrorCategory::SerializationError,
                format!("failed to serialize structure document: {}", err),
                Box::new(err),
            )
        })
    }

    /// Resolve a `source` selector and run a `query` beneath it.
    ///
    /// `source` is a slash separated element path starting at the root
    /// (`project`, `project/file`); an empty selector or `/` scopes the whole
    /// document. `query` names the elements to collect below each scope node.
    pub fn select(&self, source: &str, query: &str) -> Vec<&Node> {
        let mut scope: Vec<&Node> = vec![&self.root];
        let mut segments = source
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty() && *segment != ".");
        if let Some(first) = segments.next() {
            if first != self.root.name {
                return Vec::new();
            }
        }
        for segment in segments {
            let mut next = Vec::new();
            for node in scope {
                next.extend(node.children.iter().filter(|child| child.name == segment));
            }
            scope = next;
        }
        scope
            .into_iter()
            .flat_map(|node| node.descendants_named(query))
            .collect()
    }

    /// All `file` elements in document order.
    pub fn files(&self) -> Vec<&Node> {
        self.root.descendants_named("file")
    }
}
