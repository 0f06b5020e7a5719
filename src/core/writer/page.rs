use super::{write_artifact, Writer, WriterContext};
use crate::core::document::{Node, StructureDocument};
use crate::core::error::AppError;
use crate::core::transformer::Transformation;
use crate::core::types::ErrorCategory;
use serde::Serialize;
use tera::{Context, Tera};

const PAGE_TEMPLATE_NAME: &str = "page.html";

// Names ending in `.html` are autoescaped by Tera.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ heading }}</title>
</head>
<body>
<h1>{{ path }}</h1>
{% for section in sections -%}
<section class="{{ section.kind }}" id="{{ section.full_name }}">
<h2>{{ section.full_name }}</h2>
{% if section.references -%}
<ul>
{% for reference in section.references -%}
<li>{{ reference.label }}: {% if reference.link %}<a href="{{ reference.link }}">{{ reference.text }}</a>{% else %}<code>{{ reference.text }}</code>{% endif %}</li>
{% endfor -%}
</ul>
{% endif -%}
</section>
{% endfor -%}
</body>
</html>
"#;

/// Renders one HTML page per selected file element.
///
/// Pages land at `<target>/<artifact>/<generated-path>`; selected elements
/// without a `generated-path` attribute are skipped. The optional `title`
/// parameter prefixes every page title.
pub struct PageWriter;

impl Writer for PageWriter {
    fn name(&self) -> &'static str {
        "Page"
    }

    fn write(
        &self,
        document: &StructureDocument,
        transformation: &Transformation,
        ctx: &WriterContext<'_>,
    ) -> Result<(), AppError> {
        let directory = transformation.artifact_path(ctx.target)?;
        let title = transformation
            .parameter("title")
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        let tera = page_templates()?;

        let mut written = 0usize;
        for node in document.select(&transformation.source, &transformation.query) {
            let Some(generated) = node.attribute("generated-path") else {
                tracing::debug!(element = %node.name, "skipping element without generated-path");
                continue;
            };
            let html = render_page(&tera, &PageView::from_file(node, title))?;
            write_artifact(&directory.join(generated), html.as_bytes())?;
            written += 1;
        }
        tracing::debug!(pages = written, directory = %directory.display(), "pages written");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct PageView {
    heading: String,
    path: String,
    sections: Vec<SectionView>,
}

#[derive(Debug, Serialize)]
struct SectionView {
    kind: String,
    full_name: String,
    references: Vec<ReferenceView>,
}

#[derive(Debug, Serialize)]
struct ReferenceView {
    label: String,
    link: Option<String>,
    text: String,
}

impl PageView {
    fn from_file(file: &Node, title: &str) -> Self {
        let path = file.attribute("path").unwrap_or_default().to_string();
        let heading = if title.is_empty() {
            path.clone()
        } else {
            format!("{} - {}", title, path)
        };
        let sections = file
            .children
            .iter()
            .filter(|child| matches!(child.name.as_str(), "class" | "interface"))
            .map(SectionView::from_element)
            .collect();
        Self {
            heading,
            path,
            sections,
        }
    }
}

impl SectionView {
    fn from_element(element: &Node) -> Self {
        let mut references = Vec::new();
        collect_references(element, &mut references);
        Self {
            kind: element.name.clone(),
            full_name: element
                .child("full_name")
                .map(Node::text_content)
                .unwrap_or_default(),
            references,
        }
    }
}

impl ReferenceView {
    fn from_node(node: &Node) -> Self {
        Self {
            label: node
                .attribute("name")
                .map(|name| format!("@{}", name))
                .unwrap_or_else(|| node.name.clone()),
            link: node.attribute("link").map(str::to_string),
            text: node
                .attribute("excerpt")
                .map(str::to_string)
                .unwrap_or_else(|| node.text_content()),
        }
    }
}

fn collect_references(node: &Node, out: &mut Vec<ReferenceView>) {
    for child in &node.children {
        if child.attribute("excerpt").is_some() || child.attribute("link").is_some() {
            out.push(ReferenceView::from_node(child));
        }
        collect_references(child, out);
    }
}

fn page_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
        .map_err(template_error)?;
    Ok(tera)
}

fn render_page(tera: &Tera, page: &PageView) -> Result<String, AppError> {
    let context = Context::from_serialize(page).map_err(template_error)?;
    tera.render(PAGE_TEMPLATE_NAME, &context)
        .map_err(template_error)
}

fn template_error(err: tera::Error) -> AppError {
    AppError::with_source(
        ErrorCategory::WriterError,
        format!("failed to render page template: {}", err),
        Box::new(err),
    )
    .with_code("DW-WRT-005")
}
