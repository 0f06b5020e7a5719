use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct TransformArgs {
    /// Workspace containing docweave.toml (defaults to current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Explicit configuration file instead of <PATH>/docweave.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Structure document to transform (overrides paths.source)
    #[arg(long, value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Existing, writable output directory (overrides paths.target)
    #[arg(long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Additional template to apply; may be repeated
    #[arg(long = "template", value_name = "NAME")]
    pub templates: Vec<String>,
}

#[derive(Args, Clone, Debug)]
pub struct TemplatesArgs {
    /// Workspace containing docweave.toml (defaults to current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Explicit configuration file instead of <PATH>/docweave.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct WritersArgs {}
