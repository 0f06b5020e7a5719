use crate::core::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};

/// Fields every transformation record must carry.
pub const MANDATORY_FIELDS: [&str; 4] = ["query", "writer", "source", "artifact"];

/// One unit of work: a query over the structure document, rendered by a writer
/// into an artifact below the target directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transformation {
    pub query: String,
    pub writer: String,
    pub source: String,
    pub artifact: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    /// Names of other transformations this one expects to have run. Carried for
    /// configuration compatibility; the executor never reorders on it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Directory of the template that contributed this transformation.
    #[serde(skip)]
    pub template_root: Option<PathBuf>,
}

impl Transformation {
    pub fn new(
        query: impl Into<String>,
        writer: impl Into<String>,
        source: impl Into<String>,
        artifact: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            writer: writer.into(),
            source: source.into(),
            artifact: artifact.into(),
            parameters: Map::new(),
            dependencies: Vec::new(),
            template_root: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.set_parameters(parameters);
        self
    }

    pub fn set_parameters(&mut self, parameters: Map<String, Value>) {
        self.parameters = parameters;
    }

    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Build a transformation from a configuration record.
    ///
    /// Fails with a type error when `record` is not an object, and with a
    /// validation error naming the record when a mandatory field is missing.
    pub fn from_record(record: &Value) -> Result<Self, AppError> {
        let Some(fields) = record.as_object() else {
            return Err(AppError::type_error(format!(
                "expected a transformation or a transformation record, received {}",
                json_type_name(record)
            ))
            .with_code("DW-TRN-002"));
        };

        let mut values = Vec::with_capacity(MANDATORY_FIELDS.len());
        for field in MANDATORY_FIELDS {
            let value = match fields.get(field) {
                None | Some(Value::Null) => {
                    return Err(AppError::validation(format!(
                        "transformation record is missing mandatory field '{}': {}",
                        field,
                        dump(record)
                    ))
                    .with_code("DW-TRN-001"));
                }
                Some(Value::String(text)) => text.clone(),
                Some(Value::Number(number)) => number.to_string(),
                Some(Value::Bool(flag)) => flag.to_string(),
                Some(_) => {
                    return Err(AppError::validation(format!(
                        "transformation field '{}' must be a string: {}",
                        field,
                        dump(record)
                    ))
                    .with_code("DW-TRN-001"));
                }
            };
            values.push(value);
        }
        let [query, writer, source, artifact]: [String; 4] = values
            .try_into()
            .map_err(|_| AppError::validation("transformation record is incomplete"))?;

        let mut transformation = Transformation::new(query, writer, source, artifact);
        match fields.get("parameters") {
            Some(Value::Object(parameters)) => transformation.set_parameters(parameters.clone()),
            Some(Value::Null) | None => {}
            Some(other) => tracing::debug!(
                parameters = %other,
                "ignoring transformation parameters that are not a record"
            ),
        }
        transformation.dependencies = match fields.get("dependencies") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(name)) => vec![name.clone()],
            Some(Value::Array(names)) => names
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid_dependencies(record))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(invalid_dependencies(record)),
        };
        Ok(transformation)
    }

    /// Filesystem location of `source`: absolute paths are kept, relative ones
    /// resolve against the contributing template directory when it holds them.
    pub fn source_path(&self) -> PathBuf {
        let source = Path::new(&self.source);
        if source.is_absolute() {
            return source.to_path_buf();
        }
        match &self.template_root {
            Some(root) if root.join(source).exists() => root.join(source),
            _ => source.to_path_buf(),
        }
    }

    /// Location of the artifact below `target`. Artifacts may not escape it.
    pub fn artifact_path(&self, target: &Path) -> Result<PathBuf, AppError> {
        let artifact = Path::new(&self.artifact);
        let escapes = artifact.is_absolute()
            || artifact
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(AppError::validation(format!(
                "artifact '{}' must be a relative path inside the target directory",
                self.artifact
            ))
            .with_code("DW-TRN-003"));
        }
        Ok(target.join(artifact))
    }
}

/// Argument accepted by the catalog: either a ready transformation or a raw
/// configuration record still to be validated.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformationSpec {
    Built(Transformation),
    Record(Value),
}

impl TransformationSpec {
    pub fn resolve(self) -> Result<Transformation, AppError> {
        match self {
            TransformationSpec::Built(transformation) => Ok(transformation),
            TransformationSpec::Record(record) => Transformation::from_record(&record),
        }
    }
}

impl From<Transformation> for TransformationSpec {
    fn from(transformation: Transformation) -> Self {
        TransformationSpec::Built(transformation)
    }
}

impl From<Value> for TransformationSpec {
    fn from(record: Value) -> Self {
        TransformationSpec::Record(record)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid_dependencies(record: &Value) -> AppError {
    AppError::validation(format!(
        "transformation dependencies must be a name or a list of names: {}",
        dump(record)
    ))
    .with_code("DW-TRN-004")
}

fn dump(record: &Value) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| format!("{:?}", record))
}
