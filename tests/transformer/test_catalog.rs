use docweave::core::config::DocweaveConfig;
use docweave::core::{ErrorCategory, Transformation, TransformationCatalog, TransformationSpec};
use serde_json::json;
use std::sync::Arc;

const CONFIG: &str = r#"
[[transformations.transformation]]
name = "assets"

[[transformations.transformation]]
query = "project"
writer = "Structure"
source = ""
artifact = "structure.json"

[templates.assets.transformations.transformation]
query = "copy"
writer = "FileIo"
source = "css"
artifact = "css"

[templates.pages]
author = "docs team"

[[templates.pages.transformations.transformation]]
query = "file"
writer = "Page"
source = "project"
artifact = "."
parameters = { title = "API" }

[[templates.pages.transformations.transformation]]
query = "copy"
writer = "FileIo"
source = "js"
artifact = "js"

[templates.empty]
description = "declares no transformations"

[[templates.broken.transformations.transformation]]
query = "copy"
writer = "FileIo"
source = "img"
artifact = "img"

[[templates.broken.transformations.transformation]]
query = "file"
writer = "Page"
source = "project"
"#;

fn catalog() -> TransformationCatalog {
    let config: DocweaveConfig = toml::from_str(CONFIG).expect("config");
    TransformationCatalog::new(Arc::new(config))
}

fn writers(catalog: &TransformationCatalog) -> Vec<&str> {
    catalog
        .transformations()
        .iter()
        .map(|t| t.writer.as_str())
        .collect()
}

#[test]
fn add_template_is_idempotent() {
    let mut catalog = catalog();
    catalog.add_template("pages").unwrap();
    catalog.add_template("pages").unwrap();
    assert_eq!(catalog.templates(), ["pages".to_string()]);
    assert_eq!(catalog.len(), 2);
}

#[test]
fn single_and_list_template_forms_are_equivalent() {
    let mut catalog = catalog();
    catalog.add_template("assets").unwrap();
    catalog.add_template("pages").unwrap();
    catalog.add_template("empty").unwrap();
    assert_eq!(writers(&catalog), vec!["FileIo", "Page", "FileIo"]);
    assert_eq!(catalog.templates().len(), 3);
    assert_eq!(
        catalog.transformations()[1].parameter("title"),
        Some(&json!("API"))
    );
}

#[test]
fn unknown_template_is_a_configuration_error() {
    let mut catalog = catalog();
    let err = catalog.add_template("missing").unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigurationError);
    assert_eq!(err.code, "DW-TPL-001");
    assert!(err.message.contains("missing"));
    assert!(catalog.templates().is_empty());
}

#[test]
fn set_templates_resets_previous_state() {
    let mut catalog = catalog();
    catalog.add_template("pages").unwrap();
    catalog
        .add_transformation(Transformation::new("q", "Structure", "", "out.json"))
        .unwrap();
    assert_eq!(catalog.len(), 3);

    catalog.set_templates(["assets"]).unwrap();
    assert_eq!(catalog.templates(), ["assets".to_string()]);
    assert_eq!(writers(&catalog), vec!["FileIo"]);

    catalog.set_templates(Vec::<String>::new()).unwrap();
    assert!(catalog.templates().is_empty());
    assert!(catalog.is_empty());
}

#[test]
fn record_missing_any_mandatory_field_is_rejected() {
    let complete = json!({
        "query": "copy",
        "writer": "FileIo",
        "source": "css",
        "artifact": "css"
    });
    for field in ["query", "writer", "source", "artifact"] {
        let mut record = complete.clone();
        record.as_object_mut().unwrap().remove(field);
        let mut catalog = catalog();
        let err = catalog.add_transformation(record).unwrap_err();
        assert_eq!(err.category, ErrorCategory::ValidationError, "field {}", field);
        assert_eq!(err.code, "DW-TRN-001");
        assert!(err.message.contains(field));
        assert!(err.message.contains("\"writer\"") || field == "writer");
        assert!(catalog.is_empty());
    }
}

#[test]
fn complete_record_is_mirrored_with_parameters() {
    let mut catalog = catalog();
    let added = catalog
        .add_transformation(json!({
            "query": "file",
            "writer": "Page",
            "source": "project",
            "artifact": "api",
            "parameters": { "title": "Reference", "depth": 2 }
        }))
        .unwrap()
        .clone();
    assert_eq!(added.query, "file");
    assert_eq!(added.writer, "Page");
    assert_eq!(added.source, "project");
    assert_eq!(added.artifact, "api");
    assert_eq!(added.parameter("title"), Some(&json!("Reference")));
    assert_eq!(added.parameter("depth"), Some(&json!(2)));
}

#[test]
fn built_transformation_is_accepted_unchanged() {
    let mut catalog = catalog();
    let built = Transformation::new("copy", "FileIo", "img", "img");
    catalog
        .add_transformation(TransformationSpec::Built(built.clone()))
        .unwrap();
    assert_eq!(catalog.transformations(), [built]);
}

#[test]
fn non_record_argument_is_a_type_error() {
    let mut catalog = catalog();
    let err = catalog.add_transformation(json!("copy")).unwrap_err();
    assert_eq!(err.category, ErrorCategory::TypeError);
    assert!(err.message.contains("string"));
}

#[test]
fn load_transformations_preserves_append_order() {
    let mut catalog = catalog();
    catalog
        .load_transformations(
            ["pages", "assets"],
            vec![TransformationSpec::Built(Transformation::new(
                "copy", "FileIo", "fonts", "fonts",
            ))],
        )
        .unwrap();

    assert_eq!(
        catalog.templates(),
        ["assets".to_string(), "pages".to_string()]
    );
    let sources: Vec<&str> = catalog
        .transformations()
        .iter()
        .map(|t| t.source.as_str())
        .collect();
    // config section (assets template, raw Structure), explicit pages, assets already loaded, explicit raw
    assert_eq!(sources, vec!["css", "", "project", "js", "fonts"]);
}

#[test]
fn template_with_invalid_record_leaves_catalog_untouched() {
    let mut catalog = catalog();
    catalog.add_template("assets").unwrap();

    let err = catalog.add_template("broken").unwrap_err();
    assert_eq!(err.category, ErrorCategory::ValidationError);
    assert_eq!(err.context.get("template").map(String::as_str), Some("broken"));
    assert_eq!(catalog.templates(), ["assets".to_string()]);
    assert_eq!(writers(&catalog), vec!["FileIo"]);

    // a failed template is not remembered, so loading it again fails again
    let err = catalog.add_template("broken").unwrap_err();
    assert_eq!(err.code, "DW-TRN-001");
    assert_eq!(catalog.len(), 1);
}
