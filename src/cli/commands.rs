use crate::{
    cli::args::{TemplatesArgs, TransformArgs, WritersArgs},
    core::{ConfigLoader, DocweaveConfig, Transformer, WriterRegistry},
    Result,
};
use anyhow::{anyhow, Context};
use std::env;
use std::path::{Path, PathBuf};

/// Handles `docweave transform`.
pub fn transform(args: TransformArgs) -> Result<()> {
    let workspace = workspace_path(args.path.as_deref())?;
    let config = load_config(&workspace, args.config.as_deref())?;

    let source = args
        .source
        .or_else(|| config.paths.source.clone())
        .ok_or_else(|| anyhow!("no structure document given; pass --source or set paths.source"))?;
    let target = args
        .target
        .or_else(|| config.paths.target.clone())
        .ok_or_else(|| anyhow!("no target directory given; pass --target or set paths.target"))?;

    let mut transformer = Transformer::new(config, WriterRegistry::default());
    transformer.set_source(&source)?;
    transformer.set_target(&target)?;
    transformer.load_transformations(&args.templates, Vec::new())?;

    if transformer.catalog().is_empty() {
        tracing::warn!("no transformations configured; nothing to do");
    }

    let report = transformer.execute()?;
    println!(
        "Applied {} transformation(s) in {} ms to {}",
        report.trace.len(),
        report.duration_ms,
        transformer
            .target()
            .map(|target| target.display().to_string())
            .unwrap_or_default()
    );
    Ok(())
}

/// Handles `docweave templates`.
pub fn templates(args: TemplatesArgs) -> Result<()> {
    let workspace = workspace_path(args.path.as_deref())?;
    let config = load_config(&workspace, args.config.as_deref())?;

    if config.templates.is_empty() {
        println!("No templates configured.");
        return Ok(());
    }

    for (name, template) in &config.templates {
        let mut line = format!(
            "{} ({} transformation(s))",
            name,
            template.transformation_records().len()
        );
        if let Some(version) = &template.version {
            line.push_str(&format!(" v{}", version));
        }
        if let Some(author) = &template.author {
            line.push_str(&format!(" by {}", author));
        }
        println!("{}", line);
        if let Some(description) = &template.description {
            println!("    {}", description);
        }
    }
    Ok(())
}

/// Handles `docweave writers`.
pub fn writers(_args: WritersArgs) -> Result<()> {
    for name in WriterRegistry::default().names() {
        println!("{}", name);
    }
    Ok(())
}

fn workspace_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => env::current_dir().context("failed to determine current directory"),
    }
}

fn load_config(workspace: &Path, explicit: Option<&Path>) -> Result<DocweaveConfig> {
    let config = match explicit {
        Some(file) => ConfigLoader::load(file)?,
        None => ConfigLoader::load_from_workspace(workspace)?,
    };
    Ok(config)
}
