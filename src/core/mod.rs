pub mod config;
pub mod document;
pub mod error;
pub mod transformer;
pub mod types;
pub mod writer;

pub use config::{ConfigLoader, DocweaveConfig};
pub use document::{generate_filename, MetadataEnricher, Node, StructureDocument};
pub use error::AppError;
pub use transformer::{
    ExecutionReport, Transformation, TransformationCatalog, TransformationSpec, Transformer,
};
pub use types::{ErrorCategory, ErrorSeverity};
pub use writer::{Writer, WriterContext, WriterRegistry};
