pub mod args;
pub mod commands;

pub use args::{TemplatesArgs, TransformArgs, WritersArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "docweave")]
#[command(version = crate::VERSION)]
#[command(about = "Render documentation artifacts from an analyzed structure document")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: list the configured templates, then transform a structure document into a target directory."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Apply the configured transformations",
        long_about = "Transform loads and enriches the structure document, validates the target directory, collects transformations from the configuration and any --template flags, and runs them in order.",
        after_help = "Example:\n    docweave transform . --source build/structure.json --target build/docs --template default"
    )]
    Transform(TransformArgs),
    #[command(
        about = "List the templates known to the configuration",
        long_about = "Templates prints every template defined in docweave.toml or discovered in the template search directories.",
        after_help = "Example:\n    docweave templates ./docs"
    )]
    Templates(TemplatesArgs),
    #[command(
        about = "List the registered writers",
        after_help = "Example:\n    docweave writers"
    )]
    Writers(WritersArgs),
}

pub fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Transform(transform_args) => commands::transform(transform_args),
        Command::Templates(templates_args) => commands::templates(templates_args),
        Command::Writers(writers_args) => commands::writers(writers_args),
    }
}
