//! `girbind graph` command

use anyhow::{anyhow, Result};

use crate::cli::GraphArgs;
use girbind::description::load_all;
use girbind::ops::find_namespace;
use girbind::resolver::RepositoryGraph;

pub fn execute(args: GraphArgs, color: bool) -> Result<()> {
    let descriptions = load_all(&args.inputs)?;

    let graph = RepositoryGraph::build(&descriptions)
        .map_err(|e| super::report_error(anyhow::Error::new(e), color))?;

    if let Some(name) = &args.namespace {
        let id = find_namespace(&graph, name)
            .ok_or_else(|| anyhow!("namespace `{}` is not among the inputs", name))?;

        println!("{}", graph.repository(id).key());
        println!("  includes:");
        for dep in graph.dependencies(id) {
            println!("    {}", graph.repository(dep).key());
        }
        println!("  included by:");
        for dep in graph.dependents(id) {
            println!("    {}", graph.repository(dep).key());
        }
        return Ok(());
    }

    for (position, &id) in graph.build_order().iter().enumerate() {
        let repository = graph.repository(id);
        println!(
            "{}. {} ({} symbols)",
            position + 1,
            repository.key(),
            repository.namespace.symbol_count()
        );

        for include in &repository.includes {
            println!("   └── {}", include.canonical_name());
        }
    }

    Ok(())
}
