use docweave::core::writer::{FileIoWriter, PageWriter, StructureWriter};
use docweave::core::{
    MetadataEnricher, Node, StructureDocument, Transformation, Writer, WriterContext,
    WriterRegistry,
};
use serde_json::{json, Map};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn enriched_document() -> StructureDocument {
    let mut doc = StructureDocument::new(
        Node::new("project")
            .with_child(
                Node::new("file")
                    .with_attribute("path", "src/Foo/Bar.php")
                    .with_child(
                        Node::new("class")
                            .with_child(Node::new("full_name").with_text("Foo\\Bar"))
                            .with_child(Node::new("extends").with_text("Foo\\Base")),
                    ),
            )
            .with_child(
                Node::new("file")
                    .with_attribute("path", "src/Foo/Base.php")
                    .with_child(
                        Node::new("class").with_child(Node::new("full_name").with_text("Foo\\Base")),
                    ),
            ),
    );
    MetadataEnricher::new().enrich(&mut doc);
    doc
}

fn ctx(target: &Path) -> WriterContext<'_> {
    WriterContext {
        target,
        position: 0,
    }
}

#[test]
fn default_registry_lists_builtin_writers() {
    assert_eq!(
        WriterRegistry::default().names(),
        vec!["FileIo", "Page", "Structure"]
    );
}

#[test]
fn structure_writer_dumps_enriched_document() {
    let target = TempDir::new().unwrap();
    let doc = enriched_document();
    StructureWriter
        .write(
            &doc,
            &Transformation::new("project", "Structure", "", "data/structure.json"),
            &ctx(target.path()),
        )
        .unwrap();

    let written = fs::read_to_string(target.path().join("data/structure.json")).unwrap();
    let parsed: StructureDocument = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, doc);
    assert!(written.contains("\"generated-path\": \"Bar.html\""));
}

#[test]
fn page_writer_renders_one_page_per_file() {
    let target = TempDir::new().unwrap();
    let doc = enriched_document();
    let mut parameters = Map::new();
    parameters.insert("title".to_string(), json!("API"));
    let transformation =
        Transformation::new("file", "Page", "project", "api").with_parameters(parameters);
    PageWriter
        .write(&doc, &transformation, &ctx(target.path()))
        .unwrap();

    let bar = fs::read_to_string(target.path().join("api/Bar.html")).unwrap();
    assert!(bar.contains("<title>API - src&#x2F;Foo&#x2F;Bar.php</title>"));
    assert!(bar.contains("<a href=\"Base.html#Foo\\Base\">Foo\\Base</a>"));
    assert!(target.path().join("api/Base.html").is_file());
}

#[test]
fn page_writer_with_unmatched_source_writes_nothing() {
    let target = TempDir::new().unwrap();
    PageWriter
        .write(
            &enriched_document(),
            &Transformation::new("file", "Page", "library", "api"),
            &ctx(target.path()),
        )
        .unwrap();
    assert!(!target.path().join("api").exists());
}

#[test]
fn file_io_copies_template_directory() {
    let template = TempDir::new().unwrap();
    fs::create_dir_all(template.path().join("css/vendor")).unwrap();
    fs::write(template.path().join("css/site.css"), "body {}").unwrap();
    fs::write(template.path().join("css/vendor/reset.css"), "* {}").unwrap();

    let mut transformation = Transformation::new("copy", "FileIo", "css", "assets/css");
    transformation.template_root = Some(template.path().to_path_buf());

    let target = TempDir::new().unwrap();
    FileIoWriter
        .write(&enriched_document(), &transformation, &ctx(target.path()))
        .unwrap();
    assert_eq!(
        fs::read_to_string(target.path().join("assets/css/site.css")).unwrap(),
        "body {}"
    );
    assert!(target.path().join("assets/css/vendor/reset.css").is_file());
}

#[test]
fn file_io_copies_single_file() {
    let template = TempDir::new().unwrap();
    fs::write(template.path().join("logo.svg"), "<svg/>").unwrap();
    let mut transformation = Transformation::new("copy", "FileIo", "logo.svg", "img/logo.svg");
    transformation.template_root = Some(template.path().to_path_buf());

    let target = TempDir::new().unwrap();
    FileIoWriter
        .write(&enriched_document(), &transformation, &ctx(target.path()))
        .unwrap();
    assert!(target.path().join("img/logo.svg").is_file());
}

#[test]
fn file_io_rejects_unknown_query_and_missing_source() {
    let target = TempDir::new().unwrap();
    let doc = enriched_document();

    let err = FileIoWriter
        .write(
            &doc,
            &Transformation::new("move", "FileIo", "css", "css"),
            &ctx(target.path()),
        )
        .unwrap_err();
    assert_eq!(err.code, "DW-WRT-003");

    let missing = target.path().join("does-not-exist");
    let err = FileIoWriter
        .write(
            &doc,
            &Transformation::new("copy", "FileIo", missing.to_str().unwrap(), "css"),
            &ctx(target.path()),
        )
        .unwrap_err();
    assert_eq!(err.code, "DW-WRT-004");
}

#[test]
fn artifacts_may_not_escape_the_target() {
    let target = TempDir::new().unwrap();
    let err = StructureWriter
        .write(
            &enriched_document(),
            &Transformation::new("project", "Structure", "", "../escape.json"),
            &ctx(target.path()),
        )
        .unwrap_err();
    assert_eq!(err.code, "DW-TRN-003");
}
