use super::{generate_filename, Node, StructureDocument};
use std::collections::HashMap;

/// Characters kept in a reference excerpt before `...` is appended.
pub const EXCERPT_LENGTH: usize = 15;

const GENERATED_PATH: &str = "generated-path";
const LINK: &str = "link";
const EXCERPT: &str = "excerpt";

/// Fully-qualified class/interface name mapped to the path of the declaring file.
///
/// Built from a read-only pass over the document and dropped once enrichment
/// completes.
#[derive(Debug, Default, Clone)]
pub struct ClassPathIndex {
    paths: HashMap<String, String>,
}

impl ClassPathIndex {
    pub fn build(document: &StructureDocument) -> Self {
        let mut index = Self::default();
        index.visit(document.root(), None);
        index
    }

    fn visit(&mut self, node: &Node, file_path: Option<&str>) {
        let file_path = match (node.name.as_str(), node.attribute("path")) {
            ("file", Some(path)) => Some(path),
            _ => file_path,
        };
        if matches!(node.name.as_str(), "class" | "interface") {
            if let (Some(full_name), Some(path)) = (node.child("full_name"), file_path) {
                let full_name = full_name.text_content();
                let full_name = full_name.trim();
                if !full_name.is_empty() {
                    self.paths.insert(full_name.to_string(), path.to_string());
                }
            }
        }
        for child in &node.children {
            self.visit(child, file_path);
        }
    }

    pub fn get(&self, full_name: &str) -> Option<&str> {
        self.paths.get(full_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// `<generated filename of the declaring file>#<anchor>`, when `name` is indexed.
    fn link(&self, name: &str, anchor: &str) -> Option<String> {
        self.get(name)
            .map(|path| format!("{}#{}", generate_filename(path), anchor))
    }
}

/// Counters reported after an enrichment pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub files: usize,
    pub indexed: usize,
    pub links: usize,
    pub excerpts: usize,
}

/// Annotates a structure document with generated paths, cross-reference links
/// and excerpts. Only attributes are added; nodes are never removed or moved.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataEnricher;

impl MetadataEnricher {
    pub fn new() -> Self {
        Self
    }

    pub fn enrich(&self, document: &mut StructureDocument) -> EnrichmentStats {
        let index = ClassPathIndex::build(document);
        let mut stats = EnrichmentStats {
            indexed: index.len(),
            ..EnrichmentStats::default()
        };
        annotate(document.root_mut(), None, None, &index, &mut stats);
        tracing::debug!(
            files = stats.files,
            indexed = stats.indexed,
            links = stats.links,
            excerpts = stats.excerpts,
            "structure document enriched"
        );
        stats
    }
}

fn annotate(
    node: &mut Node,
    parent: Option<&str>,
    grandparent: Option<&str>,
    index: &ClassPathIndex,
    stats: &mut EnrichmentStats,
) {
    if node.name == "file" {
        if let Some(generated) = node.attribute("path").map(generate_filename) {
            node.set_attribute(GENERATED_PATH, generated);
            stats.files += 1;
        }
    }

    let in_docblock_tag = node.name == "tag" && parent == Some("docblock");
    let reference = if in_docblock_tag {
        node.attribute("type").map(str::to_string)
    } else if (node.name == "type" && parent == Some("tag") && grandparent == Some("docblock"))
        || node.name == "extends"
        || node.name == "implements"
    {
        Some(node.text_content())
    } else {
        None
    };

    if let Some(reference) = reference {
        let name = strip_array_marker(&reference);
        if let Some(link) = index.link(name, name) {
            node.set_attribute(LINK, link);
            stats.links += 1;
        }
        node.set_attribute(EXCERPT, excerpt(reference.trim()));
        stats.excerpts += 1;
    }

    if in_docblock_tag && matches!(node.attribute("name"), Some("see" | "throw" | "throws")) {
        let text = node.text_content();
        let leading = text.split("::").next().unwrap_or_default().trim();
        if let Some(link) = index.link(leading, &text) {
            node.set_attribute(LINK, link);
            stats.links += 1;
        }
    }

    let name = node.name.clone();
    for child in node.children.iter_mut() {
        annotate(child, Some(&name), parent, index, stats);
    }
}

fn strip_array_marker(reference: &str) -> &str {
    reference.trim().trim_end_matches("[]")
}

/// First [`EXCERPT_LENGTH`] characters of `text`, with `...` appended when truncated.
pub(crate) fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_LENGTH {
        let head: String = text.chars().take(EXCERPT_LENGTH).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
