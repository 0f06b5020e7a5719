use docweave::core::config::DocweaveConfig;
use docweave::core::writer::WriterRegistryBuilder;
use docweave::core::{
    AppError, ErrorCategory, Node, StructureDocument, Transformation, Transformer, Writer,
    WriterContext,
};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Calls = Arc<Mutex<Vec<String>>>;

struct RecordingWriter {
    name: &'static str,
    calls: Calls,
    fail: bool,
}

impl Writer for RecordingWriter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn write(
        &self,
        _document: &StructureDocument,
        transformation: &Transformation,
        ctx: &WriterContext<'_>,
    ) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", self.name, transformation.query, ctx.position));
        if self.fail {
            return Err(AppError::new(ErrorCategory::WriterError, "writer B exploded")
                .with_code("TEST-B"));
        }
        Ok(())
    }
}

struct Workspace {
    _dir: TempDir,
    source: std::path::PathBuf,
    target: std::path::PathBuf,
}

fn workspace() -> Workspace {
    let dir = TempDir::new().unwrap();
    let document = StructureDocument::new(
        Node::new("project").with_child(Node::new("file").with_attribute("path", "src/A.php")),
    );
    let source = dir.path().join("structure.json");
    fs::write(&source, document.to_json_pretty().unwrap()).unwrap();
    let target = dir.path().join("out");
    fs::create_dir(&target).unwrap();
    Workspace {
        _dir: dir,
        source,
        target,
    }
}

fn transformer(calls: &Calls, failing: Option<&'static str>) -> Transformer {
    let mut builder = WriterRegistryBuilder::new();
    for name in ["A", "B", "C"] {
        builder.register(RecordingWriter {
            name,
            calls: Arc::clone(calls),
            fail: failing == Some(name),
        });
    }
    Transformer::new(DocweaveConfig::default(), builder.build())
}

fn add_abc(transformer: &mut Transformer) {
    for (query, writer) in [("first", "A"), ("second", "B"), ("third", "C")] {
        transformer
            .add_transformation(Transformation::new(query, writer, "project", "out"))
            .unwrap();
    }
}

#[test]
fn transformations_run_in_catalog_order() {
    let ws = workspace();
    let calls = Calls::default();
    let mut transformer = transformer(&calls, None);
    transformer.set_source(&ws.source).unwrap();
    transformer.set_target(&ws.target).unwrap();
    add_abc(&mut transformer);

    let report = transformer.execute().unwrap();
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["A:first:0", "B:second:1", "C:third:2"]
    );
    let writers: Vec<&str> = report.trace.iter().map(|e| e.writer.as_str()).collect();
    assert_eq!(writers, vec!["A", "B", "C"]);
}

#[test]
fn failing_writer_stops_the_run_and_surfaces_its_error() {
    let ws = workspace();
    let calls = Calls::default();
    let mut transformer = transformer(&calls, Some("B"));
    transformer.set_source(&ws.source).unwrap();
    transformer.set_target(&ws.target).unwrap();
    add_abc(&mut transformer);

    let err = transformer.execute().unwrap_err();
    assert_eq!(err.code, "TEST-B");
    assert_eq!(err.category, ErrorCategory::WriterError);
    assert_eq!(*calls.lock().unwrap(), vec!["A:first:0", "B:second:1"]);
}

#[test]
fn unknown_writer_is_reported_when_reached() {
    let ws = workspace();
    let calls = Calls::default();
    let mut transformer = transformer(&calls, None);
    transformer.set_source(&ws.source).unwrap();
    transformer.set_target(&ws.target).unwrap();
    transformer
        .add_transformation(Transformation::new("q", "A", "", "a"))
        .unwrap();
    transformer
        .add_transformation(Transformation::new("q", "Missing", "", "m"))
        .unwrap();

    let err = transformer.execute().unwrap_err();
    assert_eq!(err.code, "DW-WRT-001");
    assert!(err.message.contains("Missing"));
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn execute_requires_source_and_target() {
    let ws = workspace();
    let calls = Calls::default();
    let mut transformer = transformer(&calls, None);
    assert_eq!(transformer.execute().unwrap_err().code, "DW-EXEC-001");

    transformer.set_source(&ws.source).unwrap();
    assert_eq!(transformer.execute().unwrap_err().code, "DW-EXEC-002");
}

#[test]
fn empty_catalog_executes_nothing() {
    let ws = workspace();
    let calls = Calls::default();
    let mut transformer = transformer(&calls, None);
    transformer.set_source(&ws.source).unwrap();
    transformer.set_target(&ws.target).unwrap();

    let report = transformer.execute().unwrap();
    assert!(report.trace.is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
#[should_panic(expected = "duplicate writer registered: A")]
fn duplicate_writer_registration_panics() {
    let calls = Calls::default();
    let mut builder = WriterRegistryBuilder::new();
    for _ in 0..2 {
        builder.register(RecordingWriter {
            name: "A",
            calls: Arc::clone(&calls),
            fail: false,
        });
    }
}
