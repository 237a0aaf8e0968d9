use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stoich_checker::VisualizationFormat;

#[derive(Parser, Debug)]
#[command(
    name = "stoich",
    about = "Mark chemical and nuclear equations against a model answer",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mark a candidate statement against a reference statement
    Mark(MarkArgs),

    /// Render a statement tree as a graph
    Graph(GraphArgs),
}

#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Reference statement (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub reference: PathBuf,

    /// Candidate statement (JSON), or a JSON array of statements
    #[arg(short, long, value_name = "FILE")]
    pub candidate: PathBuf,

    /// Marking configuration (YAML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Statement to render (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", default_value = "ascii")]
    pub format: GraphFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFormat {
    Dot,
    Mermaid,
    Ascii,
}

impl From<GraphFormat> for VisualizationFormat {
    fn from(format: GraphFormat) -> Self {
        match format {
            GraphFormat::Dot => VisualizationFormat::Dot,
            GraphFormat::Mermaid => VisualizationFormat::Mermaid,
            GraphFormat::Ascii => VisualizationFormat::AsciiTree,
        }
    }
}
