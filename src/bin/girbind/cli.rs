//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// girbind - interop signature generator for introspected C libraries
#[derive(Parser)]
#[command(name = "girbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve descriptions and emit interop signatures
    Generate(GenerateArgs),

    /// Print the classification of native type spellings
    Classify(ClassifyArgs),

    /// Print the namespace build order and includes
    Graph(GraphArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Description files or glob patterns (JSON or TOML)
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Configuration file (defaults to ./girbind.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory for the generated declarations
    #[arg(short, long, env = "GIRBIND_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Abort on the first declaration that cannot be generated
    #[arg(long)]
    pub strict: bool,

    /// Declaration that must be generated (repeatable)
    #[arg(long = "require", value_name = "ID")]
    pub require: Vec<String>,

    /// Only emit these namespaces (repeatable)
    #[arg(long = "namespace", value_name = "NAME")]
    pub namespaces: Vec<String>,

    /// Number of worker threads
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Native spellings, e.g. `const gchar*`
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

#[derive(Args)]
pub struct GraphArgs {
    /// Description files or glob patterns (JSON or TOML)
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Show what one namespace includes and what includes it
    #[arg(long, value_name = "NAME")]
    pub namespace: Option<String>,
}
