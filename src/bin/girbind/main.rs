//! girbind CLI - interop signature generation from interface descriptions

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("girbind=debug")
    } else {
        EnvFilter::new("girbind=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let color = !cli.no_color;
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, color),
        Commands::Classify(args) => commands::classify::execute(args),
        Commands::Graph(args) => commands::graph::execute(args, color),
    }
}
