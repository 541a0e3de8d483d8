//! `girbind generate` command

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::cli::GenerateArgs;
use girbind::description::load_all;
use girbind::ops::{generate_from_descriptions, write_report};
use girbind::util::config::{load_config, GenerateConfig};
use girbind::util::diagnostic::{self, Diagnostic};
use girbind::util::Config;

/// Output directory when neither the CLI nor the config names one.
const DEFAULT_OUTPUT: &str = "bindings";

pub fn execute(args: GenerateArgs, color: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let mut config = load_config(args.config.as_deref(), &cwd)?;

    // CLI overrides config
    config.merge(Config {
        generate: GenerateConfig {
            best_effort: args.strict.then_some(false),
            mandatory: args.require,
            namespaces: args.namespaces,
            jobs: args.jobs,
            output: args.output,
        },
    });

    let descriptions = load_all(&args.inputs)?;
    tracing::info!("Loaded {} descriptions", descriptions.len());

    let options = config.generate_options();
    let report = generate_from_descriptions(&descriptions, &options)
        .map_err(|e| super::report_error(e, color))?;

    for skipped in &report.skipped {
        let mut diag = Diagnostic::warning(format!("skipped `{}`", skipped.identifier))
            .with_context(skipped.reason.clone());
        if let Some(code) = &skipped.code {
            diag = diag.with_context(format!("code: {}", code));
        }
        diagnostic::emit(&diag, color);
    }

    let output = config
        .generate
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let written = write_report(&report, &output)?;

    println!(
        "Generated {} declarations in {} namespaces ({} skipped)",
        report.declaration_count(),
        report.namespaces.len(),
        report.skipped.len()
    );
    for path in &written {
        println!("  wrote {}", path.display());
    }

    if !report.is_complete() {
        bail!(
            "mandatory declarations were not generated: {}",
            report.missing_mandatory.join(", ")
        );
    }

    Ok(())
}
